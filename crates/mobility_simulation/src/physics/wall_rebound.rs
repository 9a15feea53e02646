//! WallRebound, детекция стены, launch vector, air control, clamp
//!
//! # Детекция
//! 4 кардинальных направления (±X, ±Z), по 2 probe точки (у ног и у головы)
//! на расстоянии `probe_half_width + detection_distance` от центра.
//! Хит в направлении `dir` → `normal += -dir`. Сумма нормализуется
//! (внутренний угол → диагональная нормаль).
//!
//! Position агента = точка ног (центр основания hitbox).

use bevy::prelude::*;

use crate::components::Orientation;
use crate::config::WallReboundConfig;
use crate::mobility::WorldProbe;

const CARDINALS: [Vec3; 4] = [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z];

/// Нормаль стены рядом с агентом (None = стены нет)
///
/// Противоположные стены (коридор) гасят друг друга → `Some(Vec3::ZERO)`,
/// launch тогда чисто вертикальный.
pub fn detect_wall(position: Vec3, config: &WallReboundConfig, world: &dyn WorldProbe) -> Option<Vec3> {
    let reach = config.probe_half_width + config.detection_distance;
    let mut normal_sum = Vec3::ZERO;
    let mut hits = 0u32;

    for dir in CARDINALS {
        let offset = dir * reach;
        let low = Vec3::new(position.x + offset.x, position.y + config.probe_low_height, position.z + offset.z);
        let high = Vec3::new(position.x + offset.x, position.y + config.probe_high_height, position.z + offset.z);

        if world.is_solid(high) || world.is_solid(low) {
            normal_sum -= dir;
            hits += 1;
        }
    }

    if hits == 0 {
        return None;
    }

    Some(normal_sum.normalize_or_zero())
}

/// Launch velocity: `normal * V·cos45` по XZ, `V·sin45` по Y
pub fn rebound_velocity(normal: Vec3, rebound_speed: f32) -> Vec3 {
    let angle = std::f32::consts::FRAC_PI_4;
    let horizontal = rebound_speed * angle.cos();
    let vertical = rebound_speed * angle.sin();
    Vec3::new(normal.x * horizontal, vertical, normal.z * horizontal)
}

/// Горизонтальная сила от movement input (None если input нулевой)
pub fn air_control_force(move_input: Vec2, orientation: &Orientation, strength: f32) -> Option<Vec3> {
    if move_input.length_squared() <= 0.0 {
        return None;
    }

    let direction = orientation.planar_to_world(move_input).normalize_or_zero();
    Some(direction * strength)
}

/// Scale-down горизонтальной скорости до `limit`, vertical не трогаем
///
/// Возвращает None если clamp не нужен.
pub fn clamp_horizontal_speed(velocity: Vec3, limit: f32) -> Option<Vec3> {
    let horizontal_speed = (velocity.x * velocity.x + velocity.z * velocity.z).sqrt();
    if horizontal_speed <= limit {
        return None;
    }

    let scale = limit / horizontal_speed;
    Some(Vec3::new(velocity.x * scale, velocity.y, velocity.z * scale))
}
