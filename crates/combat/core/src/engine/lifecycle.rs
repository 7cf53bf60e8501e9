use std::collections::BTreeMap;
use std::fmt;

use crate::metrics::{CharacterCombatMetrics, CombatStatus};
use crate::state::{CombatUnit, Line, TurnTime, UnitId, UnitStatus};

use super::{Applied, CombatEngine, EngineError};

/// One line of the battle log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleLogEntry {
    Attack {
        time: TurnTime,
        attacker: UnitId,
        target: UnitId,
        damage: u32,
        downed: Option<UnitStatus>,
    },
    Reposition {
        time: TurnTime,
        unit: UnitId,
        from: Line,
        to: Line,
        swapped_with: Option<UnitId>,
    },
    Retreat,
}

impl BattleLogEntry {
    pub(super) fn from_applied(time: TurnTime, applied: &Applied) -> Self {
        match applied {
            Applied::Attack(attack) => BattleLogEntry::Attack {
                time,
                attacker: attack.attacker,
                target: attack.target,
                damage: attack.damage,
                downed: attack.downed,
            },
            Applied::Reposition {
                unit,
                from,
                to,
                swapped_with,
            } => BattleLogEntry::Reposition {
                time,
                unit: *unit,
                from: *from,
                to: *to,
                swapped_with: *swapped_with,
            },
        }
    }
}

impl fmt::Display for BattleLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleLogEntry::Attack {
                time,
                attacker,
                target,
                damage,
                downed,
            } => {
                if *damage == 0 {
                    write!(f, "[{time}] {attacker} missed {target}")?;
                } else {
                    write!(f, "[{time}] {attacker} hit {target} for {damage}")?;
                }
                match downed {
                    Some(UnitStatus::Dead) => write!(f, ", {target} is dead"),
                    Some(_) => write!(f, ", {target} is down"),
                    None => Ok(()),
                }
            }
            BattleLogEntry::Reposition {
                time, unit, from, to, ..
            } if from == to => write!(f, "[{time}] {unit} holds {to}"),
            BattleLogEntry::Reposition {
                time,
                unit,
                from,
                to,
                swapped_with,
            } => {
                write!(f, "[{time}] {unit} moves {from} -> {to}")?;
                if let Some(other) = swapped_with {
                    write!(f, ", swapping with {other}")?;
                }
                Ok(())
            }
            BattleLogEntry::Retreat => f.write_str("the party retreats"),
        }
    }
}

/// Everything downstream collaborators need once a battle has ended.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleReport {
    pub status: CombatStatus,
    /// Final metrics of every player unit.
    pub metrics: BTreeMap<UnitId, CharacterCombatMetrics>,
    /// Enemies that ended the battle dead or unconscious.
    pub loot_eligible: Vec<CombatUnit>,
    /// Player units in their final state.
    pub party: Vec<CombatUnit>,
    pub log: Vec<BattleLogEntry>,
    pub actions: u64,
}

impl BattleReport {
    /// Loot-eligible enemies that can be captured rather than looted.
    pub fn captives(&self) -> impl Iterator<Item = &CombatUnit> {
        self.loot_eligible
            .iter()
            .filter(|unit| unit.status == UnitStatus::Unconscious)
    }
}

impl CombatEngine {
    /// Compiles the battle report once the status is terminal.
    ///
    /// The first call freezes the report; later calls return the same
    /// report without recomputing anything.
    pub fn finalize(&mut self) -> Result<&BattleReport, EngineError> {
        self.ensure_usable()?;
        if !self.result.status.is_terminal() {
            return Err(EngineError::BattleNotOver(self.result.status));
        }

        let report = match self.report.take() {
            Some(report) => report,
            None => self.compile_report(),
        };
        Ok(self.report.insert(report))
    }

    /// Report frozen by [`finalize`](Self::finalize), if it already ran.
    pub fn report(&self) -> Option<&BattleReport> {
        self.report.as_ref()
    }

    fn compile_report(&self) -> BattleReport {
        let loot_eligible = self
            .enemies
            .iter()
            .filter_map(|id| self.units.get(id))
            .filter(|unit| !unit.is_alive())
            .cloned()
            .collect();
        let party = self
            .allies
            .iter()
            .filter_map(|id| self.units.get(id))
            .cloned()
            .collect();

        BattleReport {
            status: self.result.status,
            metrics: self.result.metrics.clone(),
            loot_eligible,
            party,
            log: self.log.clone(),
            actions: self.nonce,
        }
    }
}
