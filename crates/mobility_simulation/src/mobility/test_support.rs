//! Mock коллабораторы для unit тестов ядра

use bevy::prelude::*;

use super::collaborators::{EquipmentInspector, ResourcePool};
use super::controller::{AgentFrame, MobilityContext};
use super::dispatch::ActivationOutcome;
use super::kind::AbilityKind;
use crate::components::{Orientation, SolidCells};
use crate::config::MobilityConfig;

/// In-memory Resource Pool
#[derive(Debug, Clone)]
pub struct MockResources {
    pub stamina: u32,
    pub charge: u32,
    pub charge_max: u32,
    pub exempt: bool,
}

impl MockResources {
    pub fn new(stamina: u32, charge: u32) -> Self {
        Self {
            stamina,
            charge,
            charge_max: 64,
            exempt: false,
        }
    }

    pub fn exempt(mut self) -> Self {
        self.exempt = true;
        self
    }
}

impl ResourcePool for MockResources {
    fn query_stamina(&self) -> u32 {
        self.stamina
    }

    fn try_consume_stamina(&mut self, cost: u32) -> bool {
        if self.exempt {
            return true;
        }
        if self.stamina < cost {
            return false;
        }
        self.stamina -= cost;
        true
    }

    fn charge_reserve(&self) -> u32 {
        self.charge
    }

    fn set_charge_reserve(&mut self, value: u32) {
        self.charge = value.min(self.charge_max);
    }

    fn is_exempt(&self) -> bool {
        self.exempt
    }
}

/// Экипировка с настраиваемой durability
#[derive(Debug, Clone, Copy, Default)]
pub struct MockGear {
    pub ability: Option<AbilityKind>,
    pub near_breaking: bool,
}

impl EquipmentInspector for MockGear {
    fn current_ability(&self) -> Option<AbilityKind> {
        self.ability
    }

    fn is_gear_near_breaking(&self) -> bool {
        self.near_breaking
    }
}

/// Всё, что нужно одному вызову ядра: конфиг + mock коллабораторы
pub struct Fixture {
    pub config: MobilityConfig,
    pub resources: MockResources,
    pub gear: MockGear,
    pub world: SolidCells,
}

impl Fixture {
    pub fn new(ability: Option<AbilityKind>) -> Self {
        Self {
            config: MobilityConfig::default(),
            resources: MockResources::new(20, 64),
            gear: MockGear {
                ability,
                near_breaking: false,
            },
            world: SolidCells::new(),
        }
    }

    pub fn equipped(ability: AbilityKind) -> Self {
        Self::new(Some(ability))
    }

    pub fn ctx(&mut self) -> MobilityContext<'_> {
        MobilityContext {
            config: &self.config,
            resources: &mut self.resources,
            equipment: &self.gear,
            world: &self.world,
        }
    }
}

/// Агент в воздухе посреди пустого мира, смотрит по +Z
pub fn airborne_frame() -> AgentFrame {
    AgentFrame::new(
        Vec3::new(0.5, 10.0, 0.5),
        Vec3::new(0.1, -0.2, 0.3),
        Orientation::new(0.0, 0.0),
    )
}

/// Активация без вытеснения continuous режима
pub fn activated(kind: AbilityKind) -> ActivationOutcome {
    ActivationOutcome::Activated {
        kind,
        displaced: None,
    }
}
