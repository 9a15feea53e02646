//! Physics module
//!
//! - Интеграторы способностей (чистые функции, per tick): wing_suit, powered_glide, wall_rebound
//! - Kinematic host контроллер (default integration, которую glide подавляет) + Rapier компоненты

pub mod movement;
pub mod powered_glide;
pub mod wall_rebound;
pub mod wing_suit;

// Re-export основных типов
pub use movement::{
    agent_groups, spawn_agent, spawn_agent_in_world, KinematicController, KinematicControllerPlugin,
};
pub use powered_glide::powered_glide_velocity;
pub use wall_rebound::{air_control_force, clamp_horizontal_speed, detect_wall, rebound_velocity};
pub use wing_suit::wing_suit_velocity;
