//! AbilityKind, закрытый enum способностей (вместо цепочки сравнений с registry)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Одна из пяти взаимоисключающих способностей на экипировке
///
/// Exhaustive `match` по варианту = каждый handler гарантированно обработан.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Рывок по направлению взгляда (мгновенный)
    Burst,
    /// Второй прыжок в воздухе (мгновенный, один на airtime)
    ExtraJump,
    /// Glide-A: paper-glider модель (continuous)
    WingSuit,
    /// Glide-B: параметризованный baseline glide (continuous, свой trigger)
    PoweredGlide,
    /// Отскок от стены + air control (continuous)
    WallRebound,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 5] = [
        AbilityKind::Burst,
        AbilityKind::ExtraJump,
        AbilityKind::WingSuit,
        AbilityKind::PoweredGlide,
        AbilityKind::WallRebound,
    ];

    /// Continuous режим, который занимает эта способность (None для мгновенных)
    pub fn continuous_mode(self) -> Option<ContinuousMode> {
        match self {
            AbilityKind::Burst | AbilityKind::ExtraJump => None,
            AbilityKind::WingSuit => Some(ContinuousMode::WingSuit),
            AbilityKind::PoweredGlide => Some(ContinuousMode::PoweredGlide),
            AbilityKind::WallRebound => Some(ContinuousMode::WallRebound),
        }
    }

    /// Активируется ли rising edge прыжка (PoweredGlide, только start-glide сигналом)
    pub fn triggered_by_jump_edge(self) -> bool {
        !matches!(self, AbilityKind::PoweredGlide)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AbilityKind::Burst => "burst",
            AbilityKind::ExtraJump => "extra_jump",
            AbilityKind::WingSuit => "wing_suit",
            AbilityKind::PoweredGlide => "powered_glide",
            AbilityKind::WallRebound => "wall_rebound",
        }
    }
}

/// Continuous слот AbilityState, максимум один активен
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum ContinuousMode {
    WingSuit,
    PoweredGlide,
    WallRebound,
}

impl ContinuousMode {
    pub fn ability(self) -> AbilityKind {
        match self {
            ContinuousMode::WingSuit => AbilityKind::WingSuit,
            ContinuousMode::PoweredGlide => AbilityKind::PoweredGlide,
            ContinuousMode::WallRebound => AbilityKind::WallRebound,
        }
    }

    /// Glide режимы заменяют default integration host'а
    pub fn is_glide(self) -> bool {
        matches!(self, ContinuousMode::WingSuit | ContinuousMode::PoweredGlide)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuous_mode_round_trip() {
        for kind in AbilityKind::ALL {
            if let Some(mode) = kind.continuous_mode() {
                assert_eq!(mode.ability(), kind);
            }
        }
    }

    #[test]
    fn test_instant_abilities_have_no_slot() {
        assert_eq!(AbilityKind::Burst.continuous_mode(), None);
        assert_eq!(AbilityKind::ExtraJump.continuous_mode(), None);
    }

    #[test]
    fn test_only_powered_glide_ignores_jump_edge() {
        let edge_triggered: Vec<_> = AbilityKind::ALL
            .into_iter()
            .filter(|kind| !kind.triggered_by_jump_edge())
            .collect();
        assert_eq!(edge_triggered, vec![AbilityKind::PoweredGlide]);
    }

    #[test]
    fn test_glide_modes() {
        assert!(ContinuousMode::WingSuit.is_glide());
        assert!(ContinuousMode::PoweredGlide.is_glide());
        assert!(!ContinuousMode::WallRebound.is_glide());
    }
}
