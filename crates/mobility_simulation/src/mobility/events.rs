//! Mobility события (ECS layer)

use bevy::prelude::*;

use super::dispatch::RejectReason;
use super::handlers::EndReason;
use super::kind::{AbilityKind, ContinuousMode};

/// Host → ядро: отдельный trigger для PoweredGlide
///
/// Обрабатывается в том же FixedUpdate тике, после jump edge.
#[derive(Event, Debug, Clone, Copy)]
pub struct StartGlideIntent {
    pub entity: Entity,
}

/// Способность активирована (звук, эффекты, UI)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityActivated {
    pub entity: Entity,
    pub kind: AbilityKind,
}

/// Активация отклонена (advisory; state не изменён)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityRejected {
    pub entity: Entity,
    /// None если ничего не экипировано
    pub kind: Option<AbilityKind>,
    pub reason: RejectReason,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuousModeEnded {
    pub entity: Entity,
    pub mode: ContinuousMode,
    pub reason: EndReason,
}
