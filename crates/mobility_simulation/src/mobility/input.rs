//! Input Edge Detector, rising edge "jump" в воздухе
//!
//! Проблема:
//! - Host присылает "jump held" каждый тик, а нам нужен ОДИН event на нажатие
//! - Нажатие на земле не должно "протечь" в airborne edge позже
//!
//! Решение:
//! - Latch `held_last` принудительно false пока grounded
//! - Event ⇔ held_now && !held_last && !grounded
//! - Кормить сырым per-tick сэмплом (не производным флагом), иначе теряются edges

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct JumpEdgeDetector {
    held_last: bool,
}

impl JumpEdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Обработать сэмпл тика. true = "jump pressed while airborne".
    pub fn sample(&mut self, held_now: bool, grounded: bool) -> bool {
        if grounded {
            self.held_last = false;
        }

        let pressed = held_now && !self.held_last && !grounded;
        self.held_last = held_now;
        pressed
    }

    pub fn held_last(&self) -> bool {
        self.held_last
    }
}
