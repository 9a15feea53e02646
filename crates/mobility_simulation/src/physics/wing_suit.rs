//! WingSuit (Glide-A), "бумажный самолётик"
//!
//! Крыло всегда выровнено по velocity, поэтому lift зависит только от скорости:
//! `lift = speed² * lift_coefficient`, направление = world-up спроецированный
//! на плоскость ⟂ velocity, слегка наклонённый к world-up (bias).
//!
//! Порядок шага:
//! 1. gravity (`velocity.y -= gravity`)
//! 2. + lift
//! 3. анизотропный drag (XZ / Y)
//! 4. clamp скорости (uniform scale-down), если limit > 0
//!
//! Особые случаи:
//! - speed < EPSILON → только gravity + drag (нет направления для lift)
//! - velocity в dead zone конусе вокруг "строго вверх" → только gravity + clamp
//!   (иначе lift сингулярен около вертикали)

use bevy::prelude::*;

use crate::config::WingSuitConfig;

const EPSILON: f32 = 1.0e-6;

/// Per-tick velocity update для WingSuit
pub fn wing_suit_velocity(old_velocity: Vec3, gravity: f32, config: &WingSuitConfig) -> Vec3 {
    let speed = old_velocity.length();
    let after_gravity = old_velocity - Vec3::new(0.0, gravity, 0.0);

    if speed < EPSILON {
        return apply_drag(after_gravity, config);
    }

    let direction = old_velocity / speed;
    if is_within_dead_zone(direction, config.dead_zone_degrees) {
        return clamp_speed(after_gravity, config.speed_limit);
    }

    let lift_magnitude = speed * speed * config.lift_coefficient;
    let lift = lift_direction(direction, config.lift_upward_bias_degrees) * lift_magnitude;

    clamp_speed(apply_drag(after_gravity + lift, config), config.speed_limit)
}

/// Направление lift: world-up ⟂ velocity, всегда в верхней полусфере, с bias к world-up
pub fn lift_direction(velocity_dir: Vec3, bias_degrees: f32) -> Vec3 {
    let mut projected_up = Vec3::Y - velocity_dir * Vec3::Y.dot(velocity_dir);

    if projected_up.length_squared() < EPSILON {
        // Velocity вертикальна, любой горизонтальный перпендикуляр
        projected_up = velocity_dir.cross(Vec3::X);
        if projected_up.length_squared() < EPSILON {
            projected_up = velocity_dir.cross(Vec3::Z);
        }
    }

    let mut normalized = projected_up.normalize();
    if normalized.dot(Vec3::Y) < 0.0 {
        normalized = -normalized;
    }

    apply_upward_bias(normalized, bias_degrees)
}

fn apply_upward_bias(lift_direction: Vec3, bias_degrees: f32) -> Vec3 {
    if bias_degrees <= 0.0 {
        return lift_direction;
    }

    let t = (bias_degrees / 90.0).clamp(0.0, 1.0);
    let biased = lift_direction * (1.0 - t) + Vec3::Y * t;
    if biased.length_squared() < EPSILON {
        return lift_direction;
    }
    biased.normalize()
}

fn apply_drag(velocity: Vec3, config: &WingSuitConfig) -> Vec3 {
    velocity * Vec3::new(config.drag_xz, config.drag_y, config.drag_xz)
}

/// Uniform scale-down до `limit` (limit <= 0, clamp отключён)
pub fn clamp_speed(velocity: Vec3, limit: f32) -> Vec3 {
    if limit <= 0.0 {
        return velocity;
    }

    let speed_squared = velocity.length_squared();
    if speed_squared <= limit * limit {
        return velocity;
    }

    velocity * (limit / speed_squared.sqrt())
}

/// Direction (unit) внутри конуса `dead_zone_degrees` вокруг +Y
pub fn is_within_dead_zone(velocity_dir: Vec3, dead_zone_degrees: f32) -> bool {
    if dead_zone_degrees <= 0.0 {
        return false;
    }

    let dot = velocity_dir.dot(Vec3::Y);
    if dot <= 0.0 {
        return false;
    }

    dot >= dead_zone_degrees.to_radians().cos()
}
