//! Mobility Simulation Core
//!
//! Movement способности агентов на Bevy 0.16 (FixedUpdate, 20Hz):
//! Burst, ExtraJump, WingSuit, PoweredGlide, WallRebound.
//!
//! Слои:
//! - `mobility`: state machine способностей (ядро без ECS + ECS adapters)
//! - `physics`: интеграторы скорости + reference kinematic host
//! - `components`: ECS компоненты агента и мира
//! - `config`: баланс (MobilityConfig, JSON override)
//! - `logger`: глобальный LogPrinter

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod components;
pub mod config;
pub mod logger;
pub mod mobility;
pub mod physics;

// Re-export базовых типов для удобства
pub use components::*;
pub use config::{ConfigError, MobilityConfig};
pub use logger::*;
pub use mobility::{
    AbilityActivated, AbilityKind, AbilityRejected, AbilityState, ActivationOutcome,
    ContinuousMode, ContinuousModeEnded, EndReason, MobilityPlugin, MobilitySet, RejectReason,
    StartGlideIntent,
};
pub use physics::{spawn_agent, spawn_agent_in_world, KinematicController, KinematicControllerPlugin};

/// Tick rate симуляции (все скорости per tick)
pub const TICKS_PER_SECOND: f64 = 20.0;

/// Главный plugin симуляции (ядро + reference host)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Fixed timestep 20Hz, формулы интеграторов в единицах "за тик"
        app.insert_resource(Time::<Fixed>::from_hz(TICKS_PER_SECOND));

        // Детерминистичный RNG (seed по умолчанию, если headless app не задал свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_plugins((MobilityPlugin, KinematicControllerPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(TICKS_PER_SECOND));

    app
}

/// Прогнать `ticks` FixedUpdate тиков напрямую (без wall-clock времени)
pub fn run_fixed_ticks(app: &mut App, ticks: u32) {
    for _ in 0..ticks {
        app.world_mut().run_schedule(FixedUpdate);
    }
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
