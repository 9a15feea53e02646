//! AbilityState, per-agent состояние способностей (core-owned)
//!
//! # Инварианты
//! - Continuous слот (`active`): максимум один режим из {WingSuit, PoweredGlide, WallRebound}.
//!   Burst/ExtraJump слот не занимают.
//! - `cooldown_ticks` только уменьшается до 0 (saturating), активация требует 0
//! - Landing сбрасывает всё кроме cooldown одним присваиванием (`land`)
//! - Charge accumulators ∈ [0, 1) после каждого шага расхода
//!
//! Entity (generational index в ECS arena) = стабильный идентификатор агента,
//! AbilityState живёт ровно столько же сколько entity.

use bevy::prelude::*;

use super::collaborators::ResourcePool;
use super::kind::ContinuousMode;
use crate::config::MobilityConfig;

/// Дробный остаток расхода между тиками
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct ChargeAccumulator {
    value: f32,
}

impl ChargeAccumulator {
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Накопить `amount`, вернуть сколько целых единиц теперь к оплате
    fn accrue(&mut self, amount: f32) -> u32 {
        self.value += amount.max(0.0);
        self.value.floor() as u32
    }

    /// Снять оплаченные (или списанные как безнадёжные) целые единицы
    fn settle(&mut self, whole: u32) {
        self.value -= whole as f32;
        // x - floor(x) точна для x >= 1, clamp, страховка от denormal мусора
        self.value = self.value.clamp(0.0, 1.0 - f32::EPSILON);
    }

    /// Постепенный расход charge reserve (WingSuit).
    ///
    /// Возвращает false если reserve не покрыл целые единицы, reserve обнулён,
    /// accumulator всё равно ∈ [0, 1).
    pub fn drain_charge_reserve(&mut self, amount: f32, pool: &mut dyn ResourcePool) -> bool {
        if pool.is_exempt() {
            return true;
        }

        let whole = self.accrue(amount);
        if whole == 0 {
            return true;
        }

        let available = pool.charge_reserve();
        let paid = whole.min(available);
        pool.set_charge_reserve(available - paid);
        self.settle(whole);

        paid == whole
    }

    /// Дискретное списание stamina через accumulator (PoweredGlide interval).
    ///
    /// Всё или ничего: при нехватке stamina не тронута, false.
    pub fn charge_stamina(&mut self, amount: f32, pool: &mut dyn ResourcePool) -> bool {
        if pool.is_exempt() {
            return true;
        }

        let whole = self.accrue(amount);
        if whole == 0 {
            return true;
        }

        let paid = pool.try_consume_stamina(whole);
        self.settle(whole);
        paid
    }
}

/// Состояние способностей агента
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AbilityState {
    /// Continuous слот (один режим максимум)
    active: Option<ContinuousMode>,

    /// Глобальный cooldown (общий для всех способностей)
    pub cooldown_ticks: u32,

    /// ExtraJump уже использован в этом airtime (сброс только при landing)
    pub used_extra_jump: bool,

    /// Тики текущей активации WingSuit
    pub wing_suit_tick_count: u32,

    /// Тики текущей активации PoweredGlide (interval списания stamina)
    pub glide_tick_count: u32,

    pub wing_suit_charge: ChargeAccumulator,
    pub powered_glide_charge: ChargeAccumulator,
}

impl AbilityState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<ContinuousMode> {
        self.active
    }

    pub fn is_active(&self, mode: ContinuousMode) -> bool {
        self.active == Some(mode)
    }

    pub fn wall_rebound_active(&self) -> bool {
        self.is_active(ContinuousMode::WallRebound)
    }

    /// Активен glide режим (WingSuit или PoweredGlide)
    pub fn is_gliding(&self) -> bool {
        self.active.is_some_and(ContinuousMode::is_glide)
    }

    pub fn can_activate(&self) -> bool {
        self.cooldown_ticks == 0
    }

    pub fn start_cooldown(&mut self, config: &MobilityConfig) {
        self.cooldown_ticks = config.ability_cooldown_ticks;
    }

    /// Уменьшить cooldown на 1 тик (никогда не уходит ниже 0)
    pub fn tick_cooldown(&mut self) {
        self.cooldown_ticks = self.cooldown_ticks.saturating_sub(1);
    }

    /// Занять continuous слот. Предыдущий режим (если был) вытесняется -
    /// вызывающий проверил все preconditions заранее.
    pub(crate) fn begin(&mut self, mode: ContinuousMode) -> Option<ContinuousMode> {
        match mode {
            ContinuousMode::WingSuit => self.wing_suit_tick_count = 0,
            ContinuousMode::PoweredGlide => self.glide_tick_count = 0,
            ContinuousMode::WallRebound => {}
        }
        self.active.replace(mode).filter(|previous| *previous != mode)
    }

    /// Освободить слот если активен именно `mode`
    pub(crate) fn end(&mut self, mode: ContinuousMode) -> bool {
        if self.active == Some(mode) {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Landing reset: один атомарный шаг, cooldown сохраняется.
    ///
    /// Возвращает режим, который был активен до приземления.
    pub fn land(&mut self) -> Option<ContinuousMode> {
        let ended = self.active;
        *self = Self {
            cooldown_ticks: self.cooldown_ticks,
            ..Self::default()
        };
        ended
    }
}
