//! Headless симуляция mobility способностей
//!
//! Пять агентов (по одному на способность) стартуют на высоте и прыгают по скрипту.
//! Рядом с WallRebound агентом, колонна для отскока.
//!
//! Stamina регенерирует скриптом (host забота, ядро только тратит).
//!
//! Запуск: `mobility_simulation [config.json]`, уровень логов через `MOBILITY_LOG=info|warning|...`

use bevy::prelude::*;
use rand::Rng;

use mobility_simulation::*;

const SEED: u64 = 42;
const TICKS: u32 = 200;
/// +1 stamina каждые N тиков
const STAMINA_REGEN_INTERVAL: u32 = 40;

fn main() {
    let mut app = create_headless_app(SEED);

    if let Ok(level) = std::env::var("MOBILITY_LOG") {
        match level.parse::<LogLevel>() {
            Ok(level) => set_log_level(level),
            Err(err) => log_warning(&format!("MOBILITY_LOG: {}, keeping default level", err)),
        }
    }

    let config = match std::env::args().nth(1) {
        Some(path) => match MobilityConfig::load_from_path(&path) {
            Ok(config) => config,
            Err(err) => {
                log_error(&format!("config {}: {}", path, err));
                std::process::exit(1);
            }
        },
        None => MobilityConfig::default(),
    };

    let mut world_cells = SolidCells::new();
    world_cells.fill_column(9, 0, 0, 40); // колонна рядом с WallRebound агентом

    app.insert_resource(config)
        .insert_resource(world_cells)
        .add_plugins(SimulationPlugin);

    let agents: Vec<(Entity, AbilityKind)> = AbilityKind::ALL
        .into_iter()
        .enumerate()
        .map(|(index, kind)| {
            // WallRebound, вплотную к колонне (detection достаёт до x = 9)
            let x = if kind == AbilityKind::WallRebound {
                8.65
            } else {
                index as f32 * 2.0 + 0.5
            };
            let entity = spawn_agent_in_world(app.world_mut(), index as u64, Vec3::new(x, 20.0, 0.5));
            app.world_mut().entity_mut(entity).insert((
                MobilityGear::with_ability(kind),
                PhysicsBody::with_velocity(Vec3::new(0.0, 0.0, 0.4)),
            ));
            (entity, kind)
        })
        .collect();

    log_info(&format!(
        "Starting mobility headless simulation (seed: {}, agents: {})",
        SEED,
        agents.len()
    ));

    for tick in 0..TICKS {
        script_inputs(&mut app, &agents, tick);
        run_fixed_ticks(&mut app, 1);

        if tick > 0 && tick % STAMINA_REGEN_INTERVAL == 0 {
            regenerate_stamina(&mut app, &agents);
        }

        if tick % 20 == 0 {
            report(&app, &agents, tick);
        }
    }

    log_info("Simulation complete!");
}

/// Прыжок на тиках 5 и 25 (edge), лёгкий шум yaw из DeterministicRng
fn script_inputs(app: &mut App, agents: &[(Entity, AbilityKind)], tick: u32) {
    let jump_held = matches!(tick, 5..=6 | 25..=26);
    let mut yaw_noise = Vec::with_capacity(agents.len());
    {
        let mut rng = app.world_mut().resource_mut::<DeterministicRng>();
        for _ in agents {
            yaw_noise.push(rng.rng.gen_range(-2.0f32..2.0));
        }
    }

    for (&(entity, kind), noise) in agents.iter().zip(yaw_noise) {
        let mut entity_mut = app.world_mut().entity_mut(entity);

        if let Some(mut input) = entity_mut.get_mut::<MobilityInput>() {
            input.jump_held = jump_held;
            input.move_input = if kind == AbilityKind::WallRebound && tick > 25 {
                Vec2::new(0.0, 1.0)
            } else {
                Vec2::ZERO
            };
        }
        if let Some(mut orientation) = entity_mut.get_mut::<Orientation>() {
            let pitch = if kind == AbilityKind::PoweredGlide { 15.0 } else { 0.0 };
            // WallRebound смотрит на колонну (+X)
            let yaw = if kind == AbilityKind::WallRebound { -90.0 } else { 0.0 };
            *orientation = Orientation::new(yaw + noise, pitch);
        }
    }

    if tick == 5 {
        if let Some(&(entity, _)) = agents.iter().find(|(_, kind)| *kind == AbilityKind::PoweredGlide) {
            app.world_mut().send_event(StartGlideIntent { entity });
        }
    }
}

fn regenerate_stamina(app: &mut App, agents: &[(Entity, AbilityKind)]) {
    for &(entity, _) in agents {
        if let Some(mut stamina) = app.world_mut().get_mut::<Stamina>(entity) {
            stamina.restore(1);
        }
    }
}

fn report(app: &App, agents: &[(Entity, AbilityKind)], tick: u32) {
    for &(entity, kind) in agents {
        let entity_ref = app.world().entity(entity);
        let (Some(transform), Some(body), Some(state)) = (
            entity_ref.get::<Transform>(),
            entity_ref.get::<PhysicsBody>(),
            entity_ref.get::<AbilityState>(),
        ) else {
            continue;
        };

        log_info(&format!(
            "Tick {:>3} {:<13} pos=({:6.2}, {:6.2}, {:6.2}) vel=({:5.2}, {:5.2}, {:5.2}) active={:?}",
            tick,
            kind.as_str(),
            transform.translation.x,
            transform.translation.y,
            transform.translation.z,
            body.velocity.x,
            body.velocity.y,
            body.velocity.z,
            state.active()
        ));
    }
}
