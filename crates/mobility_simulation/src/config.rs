//! MobilityConfig, баланс способностей (все числа в одном месте)
//!
//! # Единицы
//! - Скорости и gravity: **per tick** (20 тиков/сек), как в формулах интеграторов
//! - Стоимость stamina: целые единицы
//! - Charge reserve: целые единицы на предмете, дробный расход через accumulator
//!
//! # Загрузка
//! Defaults = tuned значения. JSON override через `MobilityConfig::from_json_str`
//! (отсутствующие поля берутся из default, `#[serde(default)]`).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Burst, рывок по направлению взгляда
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BurstConfig {
    /// velocity := forward * speed
    pub speed: f32,
    pub stamina_cost: u32,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            speed: 1.5, // ~10 блоков
            stamina_cost: 2,
        }
    }
}

/// ExtraJump, второй прыжок в воздухе (один на airtime)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtraJumpConfig {
    /// velocity.y := impulse (как обычный прыжок)
    pub impulse: f32,
    pub stamina_cost: u32,
}

impl Default for ExtraJumpConfig {
    fn default() -> Self {
        Self {
            impulse: 0.42,
            stamina_cost: 2,
        }
    }
}

/// WingSuit, "бумажный самолётик", lift = speed² * coeff
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WingSuitConfig {
    pub lift_coefficient: f32,
    /// Наклон lift вектора к world-up (0 = без bias, 90 = строго вверх)
    pub lift_upward_bias_degrees: f32,
    /// Конус вокруг "строго вверх", где lift отключён
    pub dead_zone_degrees: f32,
    pub drag_xz: f32,
    pub drag_y: f32,
    /// <= 0 отключает clamp
    pub speed_limit: f32,
    /// Проверка при активации (0 = не блокирует)
    pub activation_stamina_cost: u32,
    /// Расход charge reserve в секунду (дробный, через accumulator)
    pub charge_per_second: f32,
}

impl Default for WingSuitConfig {
    fn default() -> Self {
        Self {
            lift_coefficient: 0.2,
            lift_upward_bias_degrees: 3.0,
            dead_zone_degrees: 30.0,
            drag_xz: 0.99988,
            drag_y: 0.9805,
            speed_limit: 1.0,
            activation_stamina_cost: 0,
            charge_per_second: 0.1,
        }
    }
}

/// PoweredGlide, параметризованная baseline glide модель
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PoweredGlideConfig {
    /// `L` в lift-термах (1.0 = baseline)
    pub lift_multiplier: f32,
    pub drag_xz: f32,
    pub drag_y: f32,
    /// Каждые N тиков, списание stamina (300 = 15 сек)
    pub charge_tick_interval: u32,
    /// Сколько stamina списывать за interval (дробное копится в accumulator)
    pub charge_per_interval: f32,
}

impl Default for PoweredGlideConfig {
    fn default() -> Self {
        Self {
            lift_multiplier: 1.0,
            drag_xz: 0.99,
            drag_y: 0.98,
            charge_tick_interval: 300,
            charge_per_interval: 1.0,
        }
    }
}

/// WallRebound, отскок от стены + air control
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WallReboundConfig {
    /// V: launch = normal * V*cos45 + up * V*sin45
    pub rebound_speed: f32,
    /// 0.5 единицы округляются вверх до 1
    pub stamina_cost: u32,
    /// Зазор от hitbox до probe точки
    pub detection_distance: f32,
    /// Полуширина hitbox агента
    pub probe_half_width: f32,
    /// Высота нижней probe точки (у ног)
    pub probe_low_height: f32,
    /// Высота верхней probe точки (у головы)
    pub probe_high_height: f32,
    /// Сила air control от movement input
    pub air_control: f32,
    pub horizontal_speed_limit: f32,
}

impl Default for WallReboundConfig {
    fn default() -> Self {
        Self {
            rebound_speed: 0.6,
            stamina_cost: 1,
            detection_distance: 0.0625, // 1/16 блока
            probe_half_width: 0.3,
            probe_low_height: 0.2,
            probe_high_height: 1.5,
            air_control: 0.02,
            horizontal_speed_limit: 1.0,
        }
    }
}

/// Полный конфиг мобильности (Resource)
#[derive(Resource, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MobilityConfig {
    /// Глобальный cooldown после любой активации (3 тика = 0.15 сек)
    pub ability_cooldown_ticks: u32,
    /// Эффективная гравитация host'а (per tick, положительная)
    pub gravity: f32,
    pub ticks_per_second: u32,
    pub charge_reserve_max: u32,
    /// Значение для предмета, у которого reserve ещё не записан
    pub charge_reserve_initial: u32,
    pub burst: BurstConfig,
    pub extra_jump: ExtraJumpConfig,
    pub wing_suit: WingSuitConfig,
    pub powered_glide: PoweredGlideConfig,
    pub wall_rebound: WallReboundConfig,
}

impl Default for MobilityConfig {
    fn default() -> Self {
        Self {
            ability_cooldown_ticks: 3,
            gravity: 0.08,
            ticks_per_second: 20,
            charge_reserve_max: 64,
            charge_reserve_initial: 64,
            burst: BurstConfig::default(),
            extra_jump: ExtraJumpConfig::default(),
            wing_suit: WingSuitConfig::default(),
            powered_glide: PoweredGlideConfig::default(),
            wall_rebound: WallReboundConfig::default(),
        }
    }
}

impl MobilityConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Per-tick доля WingSuit расхода
    pub fn wing_suit_charge_per_tick(&self) -> f32 {
        self.wing_suit.charge_per_second / self.ticks_per_second as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks_per_second == 0 {
            return Err(invalid("ticks_per_second", "must be > 0"));
        }
        if self.powered_glide.charge_tick_interval == 0 {
            return Err(invalid("powered_glide.charge_tick_interval", "must be > 0"));
        }

        let non_negative = [
            ("gravity", self.gravity),
            ("burst.speed", self.burst.speed),
            ("extra_jump.impulse", self.extra_jump.impulse),
            ("wing_suit.lift_coefficient", self.wing_suit.lift_coefficient),
            ("wing_suit.charge_per_second", self.wing_suit.charge_per_second),
            ("powered_glide.lift_multiplier", self.powered_glide.lift_multiplier),
            ("powered_glide.charge_per_interval", self.powered_glide.charge_per_interval),
            ("wall_rebound.rebound_speed", self.wall_rebound.rebound_speed),
            ("wall_rebound.detection_distance", self.wall_rebound.detection_distance),
            ("wall_rebound.probe_half_width", self.wall_rebound.probe_half_width),
            ("wall_rebound.air_control", self.wall_rebound.air_control),
            ("wall_rebound.horizontal_speed_limit", self.wall_rebound.horizontal_speed_limit),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, format!("must be finite and >= 0, got {}", value)));
            }
        }

        // speed_limit <= 0, легально (clamp отключён), только finite
        if !self.wing_suit.speed_limit.is_finite() {
            return Err(invalid("wing_suit.speed_limit", "must be finite"));
        }
        for (field, value) in [
            ("wall_rebound.probe_low_height", self.wall_rebound.probe_low_height),
            ("wall_rebound.probe_high_height", self.wall_rebound.probe_high_height),
        ] {
            if !value.is_finite() {
                return Err(invalid(field, "must be finite"));
            }
        }

        let drags = [
            ("wing_suit.drag_xz", self.wing_suit.drag_xz),
            ("wing_suit.drag_y", self.wing_suit.drag_y),
            ("powered_glide.drag_xz", self.powered_glide.drag_xz),
            ("powered_glide.drag_y", self.powered_glide.drag_y),
        ];
        for (field, value) in drags {
            if !(value > 0.0 && value <= 1.0) {
                return Err(invalid(field, format!("must be in (0, 1], got {}", value)));
            }
        }

        let angles = [
            ("wing_suit.dead_zone_degrees", self.wing_suit.dead_zone_degrees),
            ("wing_suit.lift_upward_bias_degrees", self.wing_suit.lift_upward_bias_degrees),
        ];
        for (field, value) in angles {
            if !(0.0..=90.0).contains(&value) {
                return Err(invalid(field, format!("must be in [0, 90], got {}", value)));
            }
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MobilityConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ability_cooldown_ticks, 3);
        assert_eq!(config.powered_glide.charge_tick_interval, 300);
        assert!((config.wing_suit_charge_per_tick() - 0.005).abs() < 1e-7);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = MobilityConfig::from_json_str(
            r#"{ "ability_cooldown_ticks": 10, "burst": { "speed": 2.0 } }"#,
        )
        .unwrap();

        assert_eq!(config.ability_cooldown_ticks, 10);
        assert_eq!(config.burst.speed, 2.0);
        assert_eq!(config.burst.stamina_cost, 2); // default
        assert_eq!(config.wing_suit, WingSuitConfig::default());
    }

    #[test]
    fn test_invalid_drag_rejected() {
        let err = MobilityConfig::from_json_str(r#"{ "wing_suit": { "drag_y": 1.5 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "wing_suit.drag_y", .. }));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = MobilityConfig::from_json_str(
            r#"{ "powered_glide": { "charge_tick_interval": 0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_disabled_speed_limit_is_legal() {
        let config = MobilityConfig::from_json_str(r#"{ "wing_suit": { "speed_limit": 0.0 } }"#);
        assert!(config.is_ok());
    }

    #[test]
    fn test_garbage_json_is_parse_error() {
        let err = MobilityConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = MobilityConfig::load_from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
