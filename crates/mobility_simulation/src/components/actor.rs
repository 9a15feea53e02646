//! Базовые компоненты агента: Agent, Stamina, ResourceExempt

use bevy::prelude::*;

use crate::components::movement::{
    MobilityInput, MobilityStatus, MovementConditions, Orientation, PhysicsBody,
};
use crate::mobility::{AbilityState, JumpEdgeDetector};

/// Агент (игрок, NPC), управляемый персонаж с movement способностями
///
/// Автоматически добавляет AbilityState, edge detector, stamina и movement
/// компоненты через Required Components.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(
    Transform,
    AbilityState,
    JumpEdgeDetector,
    Stamina,
    PhysicsBody,
    Orientation,
    MobilityInput,
    MovementConditions,
    MobilityStatus
)]
pub struct Agent {
    /// Stable ID для логов и host lookup
    pub agent_id: u64,
}

/// Дискретная stamina ("голод") для способностей
///
/// Инвариант: 0 ≤ current ≤ max
/// Regen, забота host'а (еда), ядро только тратит
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Stamina {
    pub current: u32,
    pub max: u32,
}

impl Default for Stamina {
    fn default() -> Self {
        Self::new(20)
    }
}

impl Stamina {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.current >= cost
    }

    pub fn consume(&mut self, cost: u32) -> bool {
        if self.can_afford(cost) {
            self.current -= cost;
            true
        } else {
            false
        }
    }

    pub fn restore(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }
}

/// Marker: агент не тратит ресурсы (creative/spectator)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct ResourceExempt;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamina_consume() {
        let mut stamina = Stamina::new(20);

        assert!(stamina.consume(2));
        assert_eq!(stamina.current, 18);

        assert!(!stamina.consume(19)); // Недостаточно
        assert_eq!(stamina.current, 18); // Не изменилась

        assert!(stamina.consume(0)); // Неблокирующая проверка
    }

    #[test]
    fn test_stamina_restore_clamped() {
        let mut stamina = Stamina::new(20);
        stamina.consume(10);
        stamina.restore(4);
        assert_eq!(stamina.current, 14);

        stamina.restore(u32::MAX); // Clamp to max
        assert_eq!(stamina.current, 20);
    }
}
