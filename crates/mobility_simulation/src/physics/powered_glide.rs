//! PoweredGlide (Glide-B), baseline glide модель + lift multiplier `L`
//!
//! Фазы шага (θ = pitch, положительный = взгляд вниз):
//! 1. gravity + lift: `vy += g * (-1 + cos²θ * 0.75 * L)`
//! 2. падение (vy < 0) → часть вертикальной скорости уходит в горизонталь по взгляду
//! 3. взгляд выше горизонта (θ < 0) → горизонтальная скорость → подъём (×3.2 по Y), масштаб `L`
//! 4. steering: 10% к горизонтальному направлению взгляда с текущей скоростью
//! 5. анизотропный drag
//!
//! При `L = 1.0` результат бит-в-бит совпадает с baseline формулой.

use bevy::prelude::*;

use crate::components::Orientation;
use crate::config::PoweredGlideConfig;

/// Per-tick velocity update для PoweredGlide
pub fn powered_glide_velocity(
    old_velocity: Vec3,
    orientation: &Orientation,
    gravity: f32,
    config: &PoweredGlideConfig,
) -> Vec3 {
    let rotation = orientation.forward();
    let pitch = orientation.pitch_radians();
    let lift = config.lift_multiplier;

    let horizontal_rotation = (rotation.x * rotation.x + rotation.z * rotation.z).sqrt();
    let horizontal_speed = (old_velocity.x * old_velocity.x + old_velocity.z * old_velocity.z).sqrt();
    let cos_pitch = pitch.cos();
    let cos_squared = cos_pitch * cos_pitch;

    let mut velocity = old_velocity;
    velocity.y += gravity * (-1.0 + cos_squared * 0.75 * lift);

    if velocity.y < 0.0 && horizontal_rotation > 0.0 {
        let adjust = velocity.y * -0.1 * cos_squared;
        velocity.x += rotation.x * adjust / horizontal_rotation;
        velocity.y += adjust;
        velocity.z += rotation.z * adjust / horizontal_rotation;
    }

    if pitch < 0.0 && horizontal_rotation > 0.0 {
        let adjust = horizontal_speed * -pitch.sin() * 0.04 * lift;
        velocity.x += -rotation.x * adjust / horizontal_rotation;
        velocity.y += adjust * 3.2;
        velocity.z += -rotation.z * adjust / horizontal_rotation;
    }

    if horizontal_rotation > 0.0 {
        velocity.x += (rotation.x / horizontal_rotation * horizontal_speed - velocity.x) * 0.1;
        velocity.z += (rotation.z / horizontal_rotation * horizontal_speed - velocity.z) * 0.1;
    }

    velocity * Vec3::new(config.drag_xz, config.drag_y, config.drag_xz)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (old velocity, orientation, ожидаемая velocity после тика).
    /// Ожидания посчитаны отдельно, в f64, по исходной glide формуле
    /// (gravity 0.08, drag 0.99 / 0.98, multiplier 1.0).
    fn fixtures() -> Vec<(Vec3, Orientation, Vec3)> {
        vec![
            (
                Vec3::new(0.0, -0.5, 0.8),
                Orientation::new(0.0, 20.0),
                Vec3::new(0.0, -0.4708721, 0.8334644),
            ),
            (
                Vec3::new(0.3, 0.1, -0.6),
                Orientation::new(135.0, -35.0),
                Vec3::new(0.2300368, 0.1073205, -0.5718632),
            ),
            (
                Vec3::new(-1.2, -0.9, 0.4),
                Orientation::new(-60.0, 70.0),
                Vec3::new(-0.9519685, -0.9423676, 0.4240837),
            ),
            (
                Vec3::new(0.05, 0.0, 0.02),
                Orientation::new(10.0, 0.0),
                Vec3::new(0.0433148, -0.0176400, 0.0248252),
            ),
            (
                Vec3::ZERO,
                Orientation::new(200.0, -89.0),
                Vec3::new(0.0000007, -0.0783797, -0.0000020),
            ),
        ]
    }

    /// Покрывает разницу f32 / f64 и округление литералов
    const TOLERANCE: f32 = 1e-5;

    #[test]
    fn test_unit_multiplier_matches_reference_vectors() {
        let config = PoweredGlideConfig::default();
        assert_eq!(config.lift_multiplier, 1.0);

        for (velocity, orientation, expected) in fixtures() {
            let result = powered_glide_velocity(velocity, &orientation, 0.08, &config);

            assert!(
                (result - expected).abs().max_element() < TOLERANCE,
                "{:?} at {:?}: got {:?}, expected {:?}",
                velocity,
                orientation,
                result,
                expected
            );
        }
    }

    #[test]
    fn test_higher_multiplier_adds_lift() {
        let base = PoweredGlideConfig::default();
        let boosted = PoweredGlideConfig {
            lift_multiplier: 1.3,
            ..PoweredGlideConfig::default()
        };
        let velocity = Vec3::new(0.0, -0.2, 0.8);
        let orientation = Orientation::new(0.0, 0.0);

        let a = powered_glide_velocity(velocity, &orientation, 0.08, &base);
        let b = powered_glide_velocity(velocity, &orientation, 0.08, &boosted);
        assert!(b.y > a.y);
    }

    #[test]
    fn test_level_look_falls_slower_than_gravity() {
        let config = PoweredGlideConfig::default();
        let result = powered_glide_velocity(Vec3::ZERO, &Orientation::new(0.0, 0.0), 0.08, &config);

        // -g + 0.75g = -0.25g, затем redistribution и drag
        assert!(result.y < 0.0);
        assert!(result.y > -0.08);
        assert!(result.is_finite());
    }

    #[test]
    fn test_steering_pulls_toward_look_direction() {
        let config = PoweredGlideConfig::default();
        // Летим по +X, смотрим по +Z
        let result = powered_glide_velocity(
            Vec3::new(0.8, 0.0, 0.0),
            &Orientation::new(0.0, 0.0),
            0.08,
            &config,
        );
        assert!(result.z > 0.0);
        assert!(result.x < 0.8);
    }

    #[test]
    fn test_straight_down_look_is_finite() {
        let config = PoweredGlideConfig::default();
        let result = powered_glide_velocity(
            Vec3::new(0.2, -0.4, 0.1),
            &Orientation::new(0.0, 90.0),
            0.08,
            &config,
        );
        assert!(result.is_finite());
    }
}
