//! Kinematic host контроллер для агентов
//!
//! Архитектура:
//! - Rapier для коллизий с другими телами (RigidBody::KinematicPositionBased)
//! - Custom velocity integration (per tick, не используем Rapier forces)
//! - Default integration (gravity + drag) пропускается, если ядро
//!   выставило `MobilityStatus::suppress_default_integration`
//!
//! Порядок в FixedUpdate (после `MobilitySet`):
//! 1. apply_host_input: прыжок с земли + walk/air acceleration
//! 2. integrate_velocity_to_transform: position += velocity (блокировка стенами по X/Z)
//! 3. ground_detection: пол + твёрдые клетки, snap на поверхность
//! 4. apply_default_integration: gravity + drag
//! 5. sync_velocity_to_rapier: linvel для Rapier, сброс `velocity_modified`
//!
//! Детерминизм: fixed timestep 20Hz, все величины per tick.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::components::{
    Agent, MobilityInput, MobilityStatus, MovementConditions, Orientation, PhysicsBody, SolidCells,
};
use crate::config::MobilityConfig;
use crate::mobility::{MobilitySet, WorldProbe};

const GROUND_EPSILON: f32 = 1.0e-3;

/// Kinematic контроллер компонент (per-tick величины)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct KinematicController {
    /// Гравитация за тик (положительная)
    pub gravity: f32,
    /// Горизонтальный drag в воздухе
    pub air_drag_xz: f32,
    /// Вертикальный drag
    pub drag_y: f32,
    /// Горизонтальный drag на земле (трение)
    pub ground_friction: f32,
    /// Обычный прыжок с земли
    pub jump_velocity: f32,
    pub walk_acceleration: f32,
    pub air_acceleration: f32,
    /// Полуширина hitbox (для стен)
    pub half_width: f32,
    /// Бесконечный плоский пол (None = только SolidCells)
    pub floor_height: Option<f32>,
}

impl Default for KinematicController {
    fn default() -> Self {
        Self {
            gravity: 0.08,
            air_drag_xz: 0.91,
            drag_y: 0.98,
            ground_friction: 0.546, // 0.6 * 0.91
            jump_velocity: 0.42,
            walk_acceleration: 0.1,
            air_acceleration: 0.02,
            half_width: 0.3,
            floor_height: Some(0.0),
        }
    }
}

impl KinematicController {
    pub fn from_config(config: &MobilityConfig) -> Self {
        Self {
            gravity: config.gravity,
            half_width: config.wall_rebound.probe_half_width,
            ..Default::default()
        }
    }

    /// Gravity + drag одного тика
    pub fn integrate_default(&self, velocity: Vec3, grounded: bool) -> Vec3 {
        let horizontal_drag = if grounded {
            self.ground_friction
        } else {
            self.air_drag_xz
        };

        Vec3::new(
            velocity.x * horizontal_drag,
            (velocity.y - self.gravity) * self.drag_y,
            velocity.z * horizontal_drag,
        )
    }
}

/// Collision groups агентов: GROUP_1 = агенты, GROUP_2 = мир
pub fn agent_groups() -> CollisionGroups {
    CollisionGroups::new(Group::GROUP_1, Group::GROUP_1 | Group::GROUP_2)
}

/// Система: прыжок с земли и ускорение от movement input
///
/// Пока glide активен, ничего (ядро владеет velocity).
pub fn apply_host_input(
    mut query: Query<(
        &KinematicController,
        &MobilityInput,
        &MovementConditions,
        &MobilityStatus,
        &Orientation,
        &mut PhysicsBody,
    )>,
) {
    for (controller, input, conditions, status, orientation, mut body) in query.iter_mut() {
        if status.suppress_default_integration {
            continue;
        }

        let grounded = conditions.grounded;
        if grounded && input.jump_held {
            body.velocity.y = controller.jump_velocity;
        }

        if input.move_input.length_squared() > 0.0 {
            let acceleration = if grounded {
                controller.walk_acceleration
            } else {
                controller.air_acceleration
            };
            let direction = orientation.planar_to_world(input.move_input).normalize_or_zero();
            body.velocity += direction * acceleration;
        }
    }
}

/// Система: position += velocity (per tick), стены блокируют X/Z
pub fn integrate_velocity_to_transform(
    solid_cells: Option<Res<SolidCells>>,
    mut query: Query<(&KinematicController, &mut PhysicsBody, &mut Transform)>,
) {
    for (controller, mut body, mut transform) in query.iter_mut() {
        let mut position = transform.translation;
        let mut velocity = body.velocity;

        if let Some(cells) = solid_cells.as_deref() {
            for axis in [Vec3::X, Vec3::Z] {
                let step = axis * velocity.dot(axis);
                let candidate = position + step;
                if body_collides(cells, candidate, controller.half_width) {
                    velocity -= step; // упёрлись, обнуляем компоненту
                } else {
                    position = candidate;
                }
            }
        } else {
            position.x += velocity.x;
            position.z += velocity.z;
        }
        position.y += velocity.y;

        transform.translation = position;
        if body.velocity != velocity {
            body.velocity = velocity;
        }
    }
}

/// Hitbox агента (4 угла, 2 высоты) пересекает твёрдую клетку
pub fn body_collides(world: &dyn WorldProbe, feet: Vec3, half_width: f32) -> bool {
    const HEIGHTS: [f32; 2] = [0.2, 1.5];
    let corners = [
        Vec2::new(half_width, half_width),
        Vec2::new(half_width, -half_width),
        Vec2::new(-half_width, half_width),
        Vec2::new(-half_width, -half_width),
    ];

    HEIGHTS.iter().any(|&height| {
        corners
            .iter()
            .any(|corner| world.is_solid(Vec3::new(feet.x + corner.x, feet.y + height, feet.z + corner.y)))
    })
}

/// Высота опоры под ногами (None = воздух)
pub fn support_height(controller: &KinematicController, cells: Option<&SolidCells>, feet: Vec3) -> Option<f32> {
    let cell_top = cells.and_then(|cells| {
        let below = SolidCells::cell_of(feet - Vec3::Y * GROUND_EPSILON);
        cells.contains(below).then_some(below.y as f32 + 1.0)
    });

    let floor = controller
        .floor_height
        .filter(|&floor| feet.y <= floor + GROUND_EPSILON);

    match (cell_top, floor) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Система: ground detection + snap на поверхность
pub fn ground_detection(
    solid_cells: Option<Res<SolidCells>>,
    mut query: Query<(
        &KinematicController,
        &mut Transform,
        &mut PhysicsBody,
        &mut MovementConditions,
    )>,
) {
    for (controller, mut transform, mut body, mut conditions) in query.iter_mut() {
        let feet = transform.translation;
        let support = support_height(controller, solid_cells.as_deref(), feet)
            .filter(|_| body.velocity.y <= 0.0);

        let grounded = match support {
            Some(height) => {
                if feet.y != height {
                    transform.translation.y = height;
                }
                if body.velocity.y < 0.0 {
                    body.velocity.y = 0.0;
                }
                true
            }
            None => false,
        };

        if conditions.grounded != grounded {
            conditions.grounded = grounded;
        }
    }
}

/// Система: gravity + drag, если ядро не подавило default integration
pub fn apply_default_integration(
    mut query: Query<(
        &KinematicController,
        &MovementConditions,
        &MobilityStatus,
        &mut PhysicsBody,
    )>,
) {
    for (controller, conditions, status, mut body) in query.iter_mut() {
        if status.suppress_default_integration {
            continue;
        }
        body.velocity = controller.integrate_default(body.velocity, conditions.grounded);
    }
}

/// Система: PhysicsBody.velocity → Rapier linvel (per second), сброс флага
pub fn sync_velocity_to_rapier(
    config: Res<MobilityConfig>,
    mut query: Query<(&mut PhysicsBody, Option<&mut Velocity>), With<KinematicController>>,
) {
    let ticks_per_second = config.ticks_per_second as f32;

    for (mut body, rapier_velocity) in query.iter_mut() {
        if let Some(mut rapier_velocity) = rapier_velocity {
            rapier_velocity.linvel = body.velocity * ticks_per_second;
        }
        if body.velocity_modified {
            body.velocity_modified = false;
        }
    }
}

/// Plugin для kinematic контроллера
///
/// Системы идут ПОСЛЕ ядра (`MobilitySet`) и ДО rapier physics step.
pub struct KinematicControllerPlugin;

impl Plugin for KinematicControllerPlugin {
    fn build(&self, app: &mut App) {
        use bevy_rapier3d::plugin::PhysicsSet;

        app.init_resource::<MobilityConfig>()
            .register_type::<KinematicController>();

        app.add_systems(
            FixedUpdate,
            (
                apply_host_input,
                integrate_velocity_to_transform,
                ground_detection,
                apply_default_integration,
                sync_velocity_to_rapier,
            )
                .chain()
                .after(MobilitySet)
                .before(PhysicsSet::SyncBackend),
        );
    }
}

/// Spawn helper: агент с kinematic контроллером и Rapier компонентами
///
/// - Agent (Required: AbilityState, Stamina, PhysicsBody, ...)
/// - KinematicController из MobilityConfig
/// - Rapier: RigidBody + Collider (capsule 1.8m) + Velocity + CollisionGroups
pub fn spawn_agent(commands: &mut Commands, agent_id: u64, position: Vec3, config: &MobilityConfig) -> Entity {
    commands
        .spawn((
            Agent { agent_id },
            Transform::from_translation(position),
            KinematicController::from_config(config),
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.6, 0.3), // 0.6 * 2 + 0.3 * 2 = 1.8m
            Velocity::default(),
            agent_groups(),
        ))
        .id()
}

/// `spawn_agent` напрямую в World (headless прогоны, тесты)
///
/// KinematicController берётся из `MobilityConfig` resource, если он уже вставлен.
pub fn spawn_agent_in_world(world: &mut World, agent_id: u64, position: Vec3) -> Entity {
    let config = world.get_resource::<MobilityConfig>().cloned().unwrap_or_default();
    let entity = {
        let mut commands = world.commands();
        spawn_agent(&mut commands, agent_id, position, &config)
    };
    world.flush();
    entity
}
