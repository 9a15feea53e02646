//! ECS Components для агентов
//!
//! Организация по доменам:
//! - actor: Agent, Stamina, ResourceExempt
//! - movement: Orientation, PhysicsBody, MobilityInput, MovementConditions, MobilityStatus
//! - equipment: MobilityGear, Durability
//! - world: SolidCells (reference World Probe)

pub mod actor;
pub mod equipment;
pub mod movement;
pub mod world;

pub use actor::*;
pub use equipment::*;
pub use movement::*;
pub use world::*;
