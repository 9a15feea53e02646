//! Continuous tick handlers, раз в тик, пока соответствующий режим активен
//!
//! Вызов handler'а для неактивного режима, нарушение контракта вызывающего
//! (debug_assert), в release handler просто ничего не делает.

use bevy::prelude::*;

use super::controller::{AgentFrame, MobilityContext};
use super::kind::ContinuousMode;
use super::state::AbilityState;
use crate::physics::powered_glide::powered_glide_velocity;
use crate::physics::wall_rebound::{air_control_force, clamp_horizontal_speed};
use crate::physics::wing_suit::wing_suit_velocity;

/// Почему continuous режим завершился
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum EndReason {
    Landed,
    /// Stamina / charge reserve не покрыли расход
    ResourceExhausted,
    /// Экипировка снята или заменена в воздухе
    GearChanged,
    /// Слот занят новой активацией (PoweredGlide поверх WallRebound)
    Replaced,
}

impl EndReason {
    pub fn as_str(self) -> &'static str {
        match self {
            EndReason::Landed => "landed",
            EndReason::ResourceExhausted => "resource exhausted",
            EndReason::GearChanged => "gear changed",
            EndReason::Replaced => "replaced",
        }
    }
}

fn expect_active(state: &AbilityState, mode: ContinuousMode) -> bool {
    let active = state.is_active(mode);
    debug_assert!(active, "{:?} tick handler called while {:?} is active", mode, state.active());
    active
}

/// WingSuit: расход charge reserve, затем paper-glider интегратор
pub fn tick_wing_suit(
    state: &mut AbilityState,
    frame: &mut AgentFrame,
    ctx: &mut MobilityContext,
) -> Option<EndReason> {
    if !expect_active(state, ContinuousMode::WingSuit) {
        return None;
    }

    let config = ctx.config;
    state.wing_suit_tick_count = state.wing_suit_tick_count.saturating_add(1);

    let per_tick = config.wing_suit_charge_per_tick();
    if !state.wing_suit_charge.drain_charge_reserve(per_tick, &mut *ctx.resources) {
        state.end(ContinuousMode::WingSuit);
        return Some(EndReason::ResourceExhausted);
    }

    frame.set_velocity(wing_suit_velocity(frame.velocity, config.gravity, &config.wing_suit));
    None
}

/// PoweredGlide: stamina раз в `charge_tick_interval` тиков, затем glide интегратор
pub fn tick_powered_glide(
    state: &mut AbilityState,
    frame: &mut AgentFrame,
    ctx: &mut MobilityContext,
) -> Option<EndReason> {
    if !expect_active(state, ContinuousMode::PoweredGlide) {
        return None;
    }

    let config = ctx.config;
    let glide = &config.powered_glide;
    state.glide_tick_count = state.glide_tick_count.saturating_add(1);

    if state.glide_tick_count % glide.charge_tick_interval.max(1) == 0
        && !state
            .powered_glide_charge
            .charge_stamina(glide.charge_per_interval, &mut *ctx.resources)
    {
        state.end(ContinuousMode::PoweredGlide);
        return Some(EndReason::ResourceExhausted);
    }

    frame.set_velocity(powered_glide_velocity(
        frame.velocity,
        &frame.orientation,
        config.gravity,
        glide,
    ));
    None
}

/// WallRebound: air control от input, затем clamp горизонтальной скорости.
/// Default integration НЕ подавляется.
pub fn tick_wall_rebound(
    state: &mut AbilityState,
    frame: &mut AgentFrame,
    ctx: &mut MobilityContext,
) -> Option<EndReason> {
    if !expect_active(state, ContinuousMode::WallRebound) {
        return None;
    }

    let wall = &ctx.config.wall_rebound;

    if let Some(force) = air_control_force(frame.move_input, &frame.orientation, wall.air_control) {
        let velocity = frame.velocity + force;
        frame.set_velocity(velocity);
    }

    if let Some(clamped) = clamp_horizontal_speed(frame.velocity, wall.horizontal_speed_limit) {
        frame.set_velocity(clamped);
    }

    None
}
