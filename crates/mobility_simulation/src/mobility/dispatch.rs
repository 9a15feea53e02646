//! Activation Dispatcher
//!
//! Jump edge → экипированная способность → preconditions → commit.
//!
//! Каждая ветка сначала проверяет ВСЕ preconditions (stamina списывается последней
//! из проверок, атомарно), и только потом мутирует AbilityState/velocity.
//! Отказ, обычный исход (`ActivationOutcome::Rejected`), не ошибка.

use bevy::prelude::*;
use std::fmt;

use super::controller::{AgentFrame, MobilityContext};
use super::kind::{AbilityKind, ContinuousMode};
use super::state::AbilityState;
use crate::physics::wall_rebound::{detect_wall, rebound_velocity};

/// Почему активация не произошла
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NoAbilityEquipped,
    CooldownActive { remaining: u32 },
    ExtraJumpAlreadyUsed,
    InsufficientStamina { cost: u32, available: u32 },
    NoWallNearby,
    AlreadyGliding,
    Grounded,
    RidingVehicle,
    Submerged,
    MovementImpaired,
    GearNearlyBroken,
    /// Start-glide сигнал, но PoweredGlide не экипирован
    NotEquipped,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NoAbilityEquipped => write!(f, "no ability equipped"),
            RejectReason::CooldownActive { remaining } => {
                write!(f, "cooldown active ({} ticks left)", remaining)
            }
            RejectReason::ExtraJumpAlreadyUsed => write!(f, "extra jump already used"),
            RejectReason::InsufficientStamina { cost, available } => {
                write!(f, "not enough stamina (need {}, have {})", cost, available)
            }
            RejectReason::NoWallNearby => write!(f, "no wall nearby"),
            RejectReason::AlreadyGliding => write!(f, "already gliding"),
            RejectReason::Grounded => write!(f, "on the ground"),
            RejectReason::RidingVehicle => write!(f, "riding a vehicle"),
            RejectReason::Submerged => write!(f, "in water"),
            RejectReason::MovementImpaired => write!(f, "movement impaired"),
            RejectReason::GearNearlyBroken => write!(f, "gear about to break"),
            RejectReason::NotEquipped => write!(f, "powered glide not equipped"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    Activated {
        kind: AbilityKind,
        /// Continuous режим, который эта активация вытеснила из слота
        displaced: Option<ContinuousMode>,
    },
    Rejected(RejectReason),
}

impl ActivationOutcome {
    pub fn is_activated(&self) -> bool {
        matches!(self, ActivationOutcome::Activated { .. })
    }

    fn from_result(kind: AbilityKind, result: Result<Option<ContinuousMode>, RejectReason>) -> Self {
        match result {
            Ok(displaced) => ActivationOutcome::Activated { kind, displaced },
            Err(reason) => ActivationOutcome::Rejected(reason),
        }
    }
}

/// Rising edge прыжка в воздухе.
///
/// None, экипированная способность не реагирует на прыжок (PoweredGlide).
pub fn dispatch_jump_edge(
    state: &mut AbilityState,
    frame: &mut AgentFrame,
    ctx: &mut MobilityContext,
) -> Option<ActivationOutcome> {
    let Some(kind) = ctx.equipment.current_ability() else {
        return Some(ActivationOutcome::Rejected(RejectReason::NoAbilityEquipped));
    };

    if !kind.triggered_by_jump_edge() {
        return None;
    }

    if !state.can_activate() {
        return Some(ActivationOutcome::Rejected(RejectReason::CooldownActive {
            remaining: state.cooldown_ticks,
        }));
    }

    let result = match kind {
        AbilityKind::Burst => activate_burst(state, frame, ctx),
        AbilityKind::ExtraJump => activate_extra_jump(state, frame, ctx),
        AbilityKind::WingSuit => activate_wing_suit(state, ctx),
        AbilityKind::WallRebound => activate_wall_rebound(state, frame, ctx),
        // Только через start-glide сигнал
        AbilityKind::PoweredGlide => return None,
    };

    Some(ActivationOutcome::from_result(kind, result))
}

/// Start-glide сигнал host'а (PoweredGlide)
pub fn dispatch_start_glide(
    state: &mut AbilityState,
    grounded: bool,
    frame: &AgentFrame,
    ctx: &mut MobilityContext,
) -> ActivationOutcome {
    let result = activate_powered_glide(state, grounded, frame, ctx);
    ActivationOutcome::from_result(AbilityKind::PoweredGlide, result)
}

fn activate_burst(
    state: &mut AbilityState,
    frame: &mut AgentFrame,
    ctx: &mut MobilityContext,
) -> Result<Option<ContinuousMode>, RejectReason> {
    let config = ctx.config;
    ctx.consume_stamina(config.burst.stamina_cost)?;

    frame.set_velocity(frame.orientation.forward() * config.burst.speed);
    state.start_cooldown(config);
    Ok(None)
}

fn activate_extra_jump(
    state: &mut AbilityState,
    frame: &mut AgentFrame,
    ctx: &mut MobilityContext,
) -> Result<Option<ContinuousMode>, RejectReason> {
    if state.used_extra_jump {
        return Err(RejectReason::ExtraJumpAlreadyUsed);
    }

    let config = ctx.config;
    ctx.consume_stamina(config.extra_jump.stamina_cost)?;

    let velocity = frame.velocity;
    frame.set_velocity(Vec3::new(velocity.x, config.extra_jump.impulse, velocity.z));
    state.used_extra_jump = true;
    state.start_cooldown(config);
    Ok(None)
}

/// Velocity не меняется, glide стартует с текущей скорости
fn activate_wing_suit(state: &mut AbilityState, ctx: &mut MobilityContext) -> Result<Option<ContinuousMode>, RejectReason> {
    let config = ctx.config;
    ctx.consume_stamina(config.wing_suit.activation_stamina_cost)?;

    let displaced = state.begin(ContinuousMode::WingSuit);
    state.start_cooldown(config);
    Ok(displaced)
}

fn activate_wall_rebound(
    state: &mut AbilityState,
    frame: &mut AgentFrame,
    ctx: &mut MobilityContext,
) -> Result<Option<ContinuousMode>, RejectReason> {
    let config = ctx.config;
    let normal = detect_wall(frame.position, &config.wall_rebound, ctx.world)
        .ok_or(RejectReason::NoWallNearby)?;
    ctx.consume_stamina(config.wall_rebound.stamina_cost)?;

    let displaced = state.begin(ContinuousMode::WallRebound);
    frame.set_velocity(rebound_velocity(normal, config.wall_rebound.rebound_speed));
    state.start_cooldown(config);
    Ok(displaced)
}

fn activate_powered_glide(
    state: &mut AbilityState,
    grounded: bool,
    frame: &AgentFrame,
    ctx: &mut MobilityContext,
) -> Result<Option<ContinuousMode>, RejectReason> {
    if ctx.equipment.current_ability() != Some(AbilityKind::PoweredGlide) {
        return Err(RejectReason::NotEquipped);
    }
    if !state.can_activate() {
        return Err(RejectReason::CooldownActive {
            remaining: state.cooldown_ticks,
        });
    }
    if state.is_gliding() {
        return Err(RejectReason::AlreadyGliding);
    }
    if grounded {
        return Err(RejectReason::Grounded);
    }

    let conditions = frame.conditions;
    if conditions.riding_vehicle {
        return Err(RejectReason::RidingVehicle);
    }
    if conditions.submerged {
        return Err(RejectReason::Submerged);
    }
    if conditions.movement_impaired {
        return Err(RejectReason::MovementImpaired);
    }
    if ctx.equipment.is_gear_near_breaking() {
        return Err(RejectReason::GearNearlyBroken);
    }

    // Вытесняет WallRebound если был активен
    let displaced = state.begin(ContinuousMode::PoweredGlide);
    state.start_cooldown(ctx.config);
    Ok(displaced)
}
