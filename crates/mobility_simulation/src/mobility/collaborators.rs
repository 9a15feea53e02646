//! Внешние коллабораторы ядра
//!
//! Ядро НЕ знает как устроены stamina, экипировка и геометрия мира -
//! только вызывает эти trait'ы. ECS adapters лежат в `mobility::systems`,
//! тестовые mock'и, в `mobility::test_support`.

use bevy::prelude::*;

use super::kind::AbilityKind;

/// Resource Pool: дискретная stamina + charge reserve на экипированном предмете
pub trait ResourcePool {
    fn query_stamina(&self) -> u32;

    /// Списать `cost` целиком или ничего. `cost == 0`, неблокирующая проверка.
    fn try_consume_stamina(&mut self, cost: u32) -> bool;

    /// Charge reserve экипированного предмета
    fn charge_reserve(&self) -> u32;

    /// Записать reserve (реализация clamp'ит в [0, max])
    fn set_charge_reserve(&mut self, value: u32);

    /// Exempt агенты (creative/spectator) ничего не тратят
    fn is_exempt(&self) -> bool {
        false
    }
}

/// World Probe: point-sampling твёрдой геометрии
pub trait WorldProbe {
    fn is_solid(&self, point: Vec3) -> bool;
}

/// Equipment Inspector: какая способность экипирована
pub trait EquipmentInspector {
    fn current_ability(&self) -> Option<AbilityKind>;

    /// Предмет сломается при следующем использовании (durability на последнем делении)
    fn is_gear_near_breaking(&self) -> bool {
        false
    }
}

/// Пустой мир, нет ни одной твёрдой точки
pub struct EmptyWorld;

impl WorldProbe for EmptyWorld {
    fn is_solid(&self, _point: Vec3) -> bool {
        false
    }
}

impl EquipmentInspector for Option<AbilityKind> {
    fn current_ability(&self) -> Option<AbilityKind> {
        *self
    }
}
