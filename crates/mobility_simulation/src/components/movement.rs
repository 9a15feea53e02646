//! Movement компоненты: ориентация, скорость, input, состояние среды

use bevy::prelude::*;

/// Ориентация агента (градусы, host convention)
///
/// - `yaw`: 0 = +Z, рост по часовой если смотреть сверху
/// - `pitch`: **положительный = смотрим вниз**, отрицательный = вверх
///
/// Forward = (-sin(yaw)·cos(pitch), -sin(pitch), cos(yaw)·cos(pitch))
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
}

impl Orientation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    pub fn pitch_radians(&self) -> f32 {
        self.pitch.to_radians()
    }

    pub fn yaw_radians(&self) -> f32 {
        self.yaw.to_radians()
    }

    /// Единичный вектор взгляда
    pub fn forward(&self) -> Vec3 {
        let pitch = self.pitch_radians();
        let yaw = -self.yaw_radians();
        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        let (sin_pitch, cos_pitch) = pitch.sin_cos();
        Vec3::new(sin_yaw * cos_pitch, -sin_pitch, cos_yaw * cos_pitch)
    }

    /// Planar movement input (x = strafe, y = forward) → world XZ направление (не нормализовано)
    pub fn planar_to_world(&self, input: Vec2) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw_radians().sin_cos();
        let strafe = input.x;
        let forward = input.y;
        Vec3::new(
            -sin_yaw * forward + cos_yaw * strafe,
            0.0,
            cos_yaw * forward + sin_yaw * strafe,
        )
    }
}

/// Скорость агента (per tick) + флаг "изменено снаружи, синхронизируй"
///
/// Host читает `velocity_modified` и пропагирует velocity (клиенту/в physics backend),
/// затем сбрасывает флаг.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec3,
    pub velocity_modified: bool,
}

impl PhysicsBody {
    pub fn with_velocity(velocity: Vec3) -> Self {
        Self {
            velocity,
            velocity_modified: false,
        }
    }
}

/// Сырой per-tick input агента
///
/// Host пишет КАЖДЫЙ тик из самого низколатентного источника
/// (сырой input command, не производный/кэшированный флаг).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MobilityInput {
    /// Jump удерживается в этом тике
    pub jump_held: bool,
    /// Нажатие, пойманное между FixedUpdate тиками (OR-накопление в PreUpdate).
    /// Сбрасывает ядро после сэмпла.
    pub jump_pressed: bool,
    /// Planar input: x = strafe (-1 влево .. 1 вправо), y = forward (-1 назад .. 1 вперёд)
    pub move_input: Vec2,
}

impl MobilityInput {
    /// Сэмпл для edge detector: удержание или короткое нажатие с прошлого тика
    pub fn jump_sample(&self) -> bool {
        self.jump_held || self.jump_pressed
    }
}

/// Состояние среды (пишет host physics каждый тик)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct MovementConditions {
    /// Стоит на земле
    pub grounded: bool,
    /// Сидит на vehicle/mount
    pub riding_vehicle: bool,
    /// В воде
    pub submerged: bool,
    /// Под эффектом, запрещающим glide (левитация)
    pub movement_impaired: bool,
}

/// Выход ядра за тик, читает host integration
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct MobilityStatus {
    /// Glide режим активен (анимация, "уже летит" проверка)
    pub gliding: bool,
    /// Host НЕ применяет свою gravity/drag в этом тике
    pub suppress_default_integration: bool,
}
