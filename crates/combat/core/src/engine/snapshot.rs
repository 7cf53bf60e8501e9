use crate::config::CombatConfig;
use crate::metrics::CombatStatus;
use crate::scheduler::InitiativeItem;
use crate::state::{CombatUnit, LineOccupancy, UnitId};

use super::CombatEngine;

/// Read-only copy of the battle handed to providers and observers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub units: Vec<CombatUnit>,
    /// Upcoming turns, head first.
    pub queue: Vec<InitiativeItem>,
    pub current: Option<InitiativeItem>,
    pub status: CombatStatus,
    pub config: CombatConfig,
    pub action_in_flight: bool,
}

impl BattleSnapshot {
    pub fn unit(&self, id: UnitId) -> Option<&CombatUnit> {
        self.units.iter().find(|unit| unit.id == id)
    }

    pub fn occupancy(&self) -> LineOccupancy {
        LineOccupancy::from_units(&self.units)
    }

    /// Unit whose turn is open.
    pub fn active_unit(&self) -> Option<&CombatUnit> {
        self.current.and_then(|turn| self.unit(turn.unit))
    }
}

impl CombatEngine {
    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            units: self.units.values().cloned().collect(),
            queue: self.queue.iter().copied().collect(),
            current: self.current,
            status: self.result.status,
            config: self.config.clone(),
            action_in_flight: self.in_flight.is_some(),
        }
    }
}
