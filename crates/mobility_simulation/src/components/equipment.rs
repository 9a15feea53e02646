//! Mobility экипировка (chest slot)
//!
//! # Архитектура
//!
//! **MobilityGear**, предмет с одной movement способностью:
//! - `ability`: какая способность (None = обычная броня без способности)
//! - `charge_reserve`: заряды на предмете, `None` = ещё не инициализирован
//!   (первое чтение отдаёт `charge_reserve_initial` из конфига)
//! - `durability`: для "сломается на следующем glide" проверки
//!
//! Один предмет = максимум одна способность (взаимоисключение на уровне данных).

use bevy::prelude::*;

use crate::config::MobilityConfig;
use crate::mobility::AbilityKind;

/// Износ предмета
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct Durability {
    pub damage: u32,
    pub max_damage: u32,
}

impl Durability {
    pub fn new(max_damage: u32) -> Self {
        Self {
            damage: 0,
            max_damage,
        }
    }

    /// Последнее деление: следующее использование сломает предмет
    pub fn is_near_breaking(&self) -> bool {
        self.damage >= self.max_damage.saturating_sub(1)
    }
}

#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MobilityGear {
    pub ability: Option<AbilityKind>,
    /// Заряды; None пока не записаны
    pub charge_reserve: Option<u32>,
    /// None = неломаемый предмет
    pub durability: Option<Durability>,
}

impl MobilityGear {
    pub fn with_ability(ability: AbilityKind) -> Self {
        Self {
            ability: Some(ability),
            charge_reserve: None,
            durability: None,
        }
    }

    pub fn with_charge(mut self, charge: u32) -> Self {
        self.charge_reserve = Some(charge);
        self
    }

    pub fn with_durability(mut self, durability: Durability) -> Self {
        self.durability = Some(durability);
        self
    }

    /// Текущий reserve (lazy init из конфига)
    pub fn charge(&self, config: &MobilityConfig) -> u32 {
        self.charge_reserve
            .unwrap_or(config.charge_reserve_initial)
            .min(config.charge_reserve_max)
    }

    /// Записать reserve, clamp в [0, max]
    pub fn set_charge(&mut self, value: u32, config: &MobilityConfig) {
        self.charge_reserve = Some(value.min(config.charge_reserve_max));
    }

    pub fn is_near_breaking(&self) -> bool {
        self.durability.is_some_and(|d| d.is_near_breaking())
    }
}
