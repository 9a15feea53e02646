//! ECS adapters + FixedUpdate система, которая крутит ядро для каждого агента
//!
//! Агенты независимы: каждый получает свой ResourcePool adapter (Stamina + gear),
//! снимок экипировки и общий read-only WorldProbe.

use bevy::prelude::*;
use std::collections::HashSet;

use super::collaborators::{EmptyWorld, EquipmentInspector, ResourcePool, WorldProbe};
use super::controller::{AgentFrame, MobilityContext, MobilityController, ModeEnded};
use super::dispatch::ActivationOutcome;
use super::events::{AbilityActivated, AbilityRejected, ContinuousModeEnded, StartGlideIntent};
use super::handlers::EndReason;
use super::input::JumpEdgeDetector;
use super::kind::AbilityKind;
use super::state::AbilityState;
use crate::components::{
    Agent, MobilityGear, MobilityInput, MobilityStatus, MovementConditions, Orientation,
    PhysicsBody, ResourceExempt, SolidCells, Stamina,
};
use crate::config::MobilityConfig;
use crate::logger;

/// ResourcePool поверх компонентов агента
pub struct AgentResources<'w> {
    pub stamina: &'w mut Stamina,
    pub gear: Option<&'w mut MobilityGear>,
    pub config: &'w MobilityConfig,
    pub exempt: bool,
}

impl ResourcePool for AgentResources<'_> {
    fn query_stamina(&self) -> u32 {
        self.stamina.current
    }

    fn try_consume_stamina(&mut self, cost: u32) -> bool {
        self.exempt || self.stamina.consume(cost)
    }

    fn charge_reserve(&self) -> u32 {
        self.gear
            .as_deref()
            .map_or(0, |gear| gear.charge(self.config))
    }

    fn set_charge_reserve(&mut self, value: u32) {
        if let Some(gear) = self.gear.as_deref_mut() {
            gear.set_charge(value, self.config);
        }
    }

    fn is_exempt(&self) -> bool {
        self.exempt
    }
}

/// Снимок экипировки на начало тика
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GearSnapshot {
    pub ability: Option<AbilityKind>,
    pub near_breaking: bool,
}

impl GearSnapshot {
    pub fn of(gear: Option<&MobilityGear>) -> Self {
        gear.map_or_else(Self::default, |gear| Self {
            ability: gear.ability,
            near_breaking: gear.is_near_breaking(),
        })
    }
}

impl EquipmentInspector for GearSnapshot {
    fn current_ability(&self) -> Option<AbilityKind> {
        self.ability
    }

    fn is_gear_near_breaking(&self) -> bool {
        self.near_breaking
    }
}

/// Система (PreUpdate): защёлкнуть нажатие jump до следующего FixedUpdate тика
///
/// Тап короче тика иначе теряется: FixedUpdate может не запуститься в кадре,
/// где кнопка была нажата.
pub fn latch_jump_press(mut inputs: Query<&mut MobilityInput>) {
    for mut input in inputs.iter_mut() {
        if input.jump_held && !input.jump_pressed {
            input.jump_pressed = true;
        }
    }
}

/// Система: один тик ядра для всех агентов
///
/// Порядок на агента: jump edge → start-glide intent → on_tick.
/// Velocity пишется обратно только если ядро её изменило.
#[allow(clippy::type_complexity)]
pub fn run_mobility_tick(
    config: Res<MobilityConfig>,
    solid_cells: Option<Res<SolidCells>>,
    mut glide_intents: EventReader<StartGlideIntent>,
    mut activated_events: EventWriter<AbilityActivated>,
    mut rejected_events: EventWriter<AbilityRejected>,
    mut ended_events: EventWriter<ContinuousModeEnded>,
    mut agents: Query<(
        Entity,
        &Agent,
        &Transform,
        &Orientation,
        &mut MobilityInput,
        &MovementConditions,
        &mut AbilityState,
        &mut JumpEdgeDetector,
        &mut Stamina,
        &mut PhysicsBody,
        &mut MobilityStatus,
        Option<&mut MobilityGear>,
        Has<ResourceExempt>,
    )>,
) {
    let config: &MobilityConfig = &config;
    let world: &dyn WorldProbe = match solid_cells.as_deref() {
        Some(cells) => cells,
        None => &EmptyWorld,
    };
    let start_glide: HashSet<Entity> = glide_intents.read().map(|intent| intent.entity).collect();

    for (
        entity,
        agent,
        transform,
        orientation,
        mut input,
        conditions,
        mut state,
        mut edge,
        mut stamina,
        mut body,
        mut status,
        mut gear,
        exempt,
    ) in agents.iter_mut()
    {
        let equipment = GearSnapshot::of(gear.as_deref());
        let grounded = conditions.grounded;

        let mut frame = AgentFrame {
            position: transform.translation,
            velocity: body.velocity,
            orientation: *orientation,
            move_input: input.move_input,
            conditions: *conditions,
            velocity_modified: false,
        };
        let mut resources = AgentResources {
            stamina: &mut stamina,
            gear: gear.as_deref_mut(),
            config,
            exempt,
        };
        let mut ctx = MobilityContext {
            config,
            resources: &mut resources,
            equipment: &equipment,
            world,
        };
        let mut controller = MobilityController::new(&mut state, &mut edge);

        let jump = input.jump_sample();
        if input.jump_pressed {
            input.jump_pressed = false;
        }

        if let Some(outcome) = controller.on_input_edge(jump, grounded, &mut frame, &mut ctx) {
            report_outcome(
                entity,
                agent,
                equipment.ability,
                outcome,
                &mut activated_events,
                &mut rejected_events,
                &mut ended_events,
            );
        }

        if start_glide.contains(&entity) {
            let outcome = controller.on_start_glide_signal(grounded, &mut frame, &mut ctx);
            report_outcome(
                entity,
                agent,
                Some(AbilityKind::PoweredGlide),
                outcome,
                &mut activated_events,
                &mut rejected_events,
                &mut ended_events,
            );
        }

        let report = controller.on_tick(grounded, equipment.ability, &mut frame, &mut ctx);

        if let Some(ended) = report.ended {
            report_ended(entity, agent, ended, &mut ended_events);
        }

        if frame.velocity_modified {
            body.velocity = frame.velocity;
            body.velocity_modified = true;
        }

        let next_status = MobilityStatus {
            gliding: report.gliding,
            suppress_default_integration: report.suppress_default_integration,
        };
        if *status != next_status {
            *status = next_status;
        }
    }
}

fn report_ended(
    entity: Entity,
    agent: &Agent,
    ended: ModeEnded,
    ended_events: &mut EventWriter<ContinuousModeEnded>,
) {
    logger::log(&format!(
        "agent {} ({:?}): {} ended ({})",
        agent.agent_id,
        entity,
        ended.mode.ability().as_str(),
        ended.reason.as_str()
    ));
    ended_events.write(ContinuousModeEnded {
        entity,
        mode: ended.mode,
        reason: ended.reason,
    });
}

fn report_outcome(
    entity: Entity,
    agent: &Agent,
    attempted: Option<AbilityKind>,
    outcome: ActivationOutcome,
    activated_events: &mut EventWriter<AbilityActivated>,
    rejected_events: &mut EventWriter<AbilityRejected>,
    ended_events: &mut EventWriter<ContinuousModeEnded>,
) {
    match outcome {
        ActivationOutcome::Activated { kind, displaced } => {
            // Вытесненный режим заканчивается раньше, чем стартует новый
            if let Some(mode) = displaced {
                let ended = ModeEnded {
                    mode,
                    reason: EndReason::Replaced,
                };
                report_ended(entity, agent, ended, ended_events);
            }
            logger::log(&format!(
                "agent {} ({:?}): {} activated",
                agent.agent_id,
                entity,
                kind.as_str()
            ));
            activated_events.write(AbilityActivated { entity, kind });
        }
        ActivationOutcome::Rejected(reason) => {
            logger::log(&format!(
                "agent {} ({:?}): {} rejected: {}",
                agent.agent_id,
                entity,
                attempted.map_or("none", AbilityKind::as_str),
                reason
            ));
            rejected_events.write(AbilityRejected {
                entity,
                kind: attempted,
                reason,
            });
        }
    }
}
