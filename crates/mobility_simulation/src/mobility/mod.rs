//! Mobility abilities, state machine + flight physics
//!
//! # Архитектура
//!
//! **Ядро (без ECS):**
//! - `kind`: AbilityKind / ContinuousMode (закрытые enum'ы)
//! - `state`: AbilityState + ChargeAccumulator
//! - `input`: JumpEdgeDetector (rising edge в воздухе)
//! - `dispatch`: Activation Dispatcher (preconditions → commit)
//! - `handlers`: continuous tick handlers
//! - `controller`: MobilityController: `on_input_edge` / `on_start_glide_signal` / `on_tick`
//! - `collaborators`: ResourcePool / WorldProbe / EquipmentInspector trait'ы
//!
//! **ECS layer:**
//! - `events`: AbilityActivated / AbilityRejected / ContinuousModeEnded / StartGlideIntent
//! - `systems`: adapters над компонентами + `run_mobility_tick`
//!
//! Формулы интеграторов, в `crate::physics`.

use bevy::prelude::*;

use crate::config::MobilityConfig;

pub mod collaborators;
pub mod controller;
pub mod dispatch;
pub mod events;
pub mod handlers;
pub mod input;
pub mod kind;
pub mod state;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod dispatch_tests;

pub use collaborators::{EmptyWorld, EquipmentInspector, ResourcePool, WorldProbe};
pub use controller::{AgentFrame, MobilityContext, MobilityController, ModeEnded, TickReport};
pub use dispatch::{ActivationOutcome, RejectReason};
pub use events::{AbilityActivated, AbilityRejected, ContinuousModeEnded, StartGlideIntent};
pub use handlers::EndReason;
pub use input::JumpEdgeDetector;
pub use kind::{AbilityKind, ContinuousMode};
pub use state::{AbilityState, ChargeAccumulator};
pub use systems::{latch_jump_press, AgentResources, GearSnapshot};

/// Фаза FixedUpdate, в которой работает ядро (host integration идёт после)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MobilitySet;

/// Mobility Plugin
///
/// Регистрирует конфиг (если host не вставил свой), события,
/// `latch_jump_press` в PreUpdate и `run_mobility_tick` в FixedUpdate.
pub struct MobilityPlugin;

impl Plugin for MobilityPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MobilityConfig>();

        app.register_type::<AbilityState>()
            .register_type::<JumpEdgeDetector>();

        app.add_event::<StartGlideIntent>()
            .add_event::<AbilityActivated>()
            .add_event::<AbilityRejected>()
            .add_event::<ContinuousModeEnded>();

        app.add_systems(PreUpdate, systems::latch_jump_press)
            .add_systems(FixedUpdate, systems::run_mobility_tick.in_set(MobilitySet));
    }
}
