//! MobilityController, per-agent точки входа ядра
//!
//! # Порядок внутри тика (фиксирован)
//! 1. `on_input_edge`: edge detection + Activation Dispatcher
//! 2. `on_start_glide_signal`: если host прислал start-glide сигнал
//! 3. `on_tick`: cooldown, landing reset, смена экипировки, continuous handler
//!
//! Контроллер, borrowing view над двумя компонентами агента (AbilityState +
//! JumpEdgeDetector). Никаких ECS зависимостей: коллабораторы приходят через
//! `MobilityContext`, данные агента, через `AgentFrame`.

use bevy::prelude::*;

use super::collaborators::{EquipmentInspector, ResourcePool, WorldProbe};
use super::dispatch::{dispatch_jump_edge, dispatch_start_glide, ActivationOutcome, RejectReason};
use super::handlers::{tick_powered_glide, tick_wall_rebound, tick_wing_suit, EndReason};
use super::input::JumpEdgeDetector;
use super::kind::{AbilityKind, ContinuousMode};
use super::state::AbilityState;
use crate::components::{MovementConditions, Orientation};
use crate::config::MobilityConfig;

/// Коллабораторы + конфиг на время одного вызова
pub struct MobilityContext<'a> {
    pub config: &'a MobilityConfig,
    pub resources: &'a mut dyn ResourcePool,
    pub equipment: &'a dyn EquipmentInspector,
    pub world: &'a dyn WorldProbe,
}

impl MobilityContext<'_> {
    pub(crate) fn consume_stamina(&mut self, cost: u32) -> Result<(), RejectReason> {
        if self.resources.try_consume_stamina(cost) {
            Ok(())
        } else {
            Err(RejectReason::InsufficientStamina {
                cost,
                available: self.resources.query_stamina(),
            })
        }
    }
}

/// Снимок агента, который ядро читает и (velocity) пишет
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AgentFrame {
    /// Точка ног
    pub position: Vec3,
    pub velocity: Vec3,
    pub orientation: Orientation,
    pub move_input: Vec2,
    pub conditions: MovementConditions,
    /// Ядро переписало velocity, host должен синхронизировать
    pub velocity_modified: bool,
}

impl AgentFrame {
    pub fn new(position: Vec3, velocity: Vec3, orientation: Orientation) -> Self {
        Self {
            position,
            velocity,
            orientation,
            ..Default::default()
        }
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
        self.velocity_modified = true;
    }
}

/// Continuous режим завершился в этом тике
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeEnded {
    pub mode: ContinuousMode,
    pub reason: EndReason,
}

/// Результат `on_tick` для host'а
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Glide handler отработал, host пропускает свою gravity/drag
    pub suppress_default_integration: bool,
    pub gliding: bool,
    pub ended: Option<ModeEnded>,
}

pub struct MobilityController<'s> {
    state: &'s mut AbilityState,
    edge: &'s mut JumpEdgeDetector,
}

impl<'s> MobilityController<'s> {
    pub fn new(state: &'s mut AbilityState, edge: &'s mut JumpEdgeDetector) -> Self {
        Self { state, edge }
    }

    pub fn state(&self) -> &AbilityState {
        self.state
    }

    /// Сырой jump сэмпл тика. Some(outcome) только если был rising edge
    /// и экипированная способность реагирует на прыжок.
    pub fn on_input_edge(
        &mut self,
        jump_held: bool,
        grounded: bool,
        frame: &mut AgentFrame,
        ctx: &mut MobilityContext,
    ) -> Option<ActivationOutcome> {
        if !self.edge.sample(jump_held, grounded) {
            return None;
        }
        dispatch_jump_edge(&mut *self.state, frame, ctx)
    }

    /// Отдельный trigger для PoweredGlide
    pub fn on_start_glide_signal(
        &mut self,
        grounded: bool,
        frame: &mut AgentFrame,
        ctx: &mut MobilityContext,
    ) -> ActivationOutcome {
        dispatch_start_glide(&mut *self.state, grounded, frame, ctx)
    }

    pub fn on_tick(
        &mut self,
        grounded: bool,
        equipped: Option<AbilityKind>,
        frame: &mut AgentFrame,
        ctx: &mut MobilityContext,
    ) -> TickReport {
        let mut report = TickReport::default();

        self.state.tick_cooldown();

        if grounded {
            if let Some(mode) = self.state.land() {
                report.ended = Some(ModeEnded {
                    mode,
                    reason: EndReason::Landed,
                });
            }
        }

        // Экипировку сняли/поменяли в воздухе
        if let Some(mode) = self.state.active() {
            if equipped != Some(mode.ability()) {
                self.state.end(mode);
                report.ended = Some(ModeEnded {
                    mode,
                    reason: EndReason::GearChanged,
                });
            }
        }

        let handled = self.state.active();
        let ended = match handled {
            Some(ContinuousMode::WingSuit) => tick_wing_suit(&mut *self.state, frame, ctx),
            Some(ContinuousMode::PoweredGlide) => tick_powered_glide(&mut *self.state, frame, ctx),
            Some(ContinuousMode::WallRebound) => tick_wall_rebound(&mut *self.state, frame, ctx),
            None => None,
        };

        if let (Some(mode), Some(reason)) = (handled, ended) {
            report.ended = Some(ModeEnded { mode, reason });
        }

        report.gliding = self.state.is_gliding();
        report.suppress_default_integration = report.gliding;
        report
    }
}
