//! Per-character combat metrics and battle-level result.

use std::collections::BTreeMap;

use crate::combat::{AttackRollResult, RollOutcome};
use crate::state::{UnitId, WeaponCategory};

/// Offense counters for one weapon category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OffenseStats {
    pub attacks: u32,
    pub hits: u32,
    pub misses: u32,
    pub crits: u32,
    pub damage: u32,
}

impl OffenseStats {
    fn record(&mut self, roll: &AttackRollResult) {
        self.attacks += 1;
        match roll.outcome {
            RollOutcome::Miss => self.misses += 1,
            RollOutcome::Hit => self.hits += 1,
            RollOutcome::Crit => {
                self.hits += 1;
                self.crits += 1;
            }
        }
        self.damage = self.damage.saturating_add(roll.damage);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefenseStats {
    pub damage_taken: u32,
    pub hits_received: u32,
    pub hits_evaded: u32,
    pub crits_received: u32,
}

impl DefenseStats {
    fn record(&mut self, roll: &AttackRollResult) {
        match roll.outcome {
            RollOutcome::Miss => self.hits_evaded += 1,
            RollOutcome::Hit => self.hits_received += 1,
            RollOutcome::Crit => {
                self.hits_received += 1;
                self.crits_received += 1;
            }
        }
        self.damage_taken = self.damage_taken.saturating_add(roll.damage);
    }
}

/// Accumulated performance of one player unit during a battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterCombatMetrics {
    pub melee: OffenseStats,
    pub ranged: OffenseStats,
    pub kills: u32,
    pub defense: DefenseStats,
}

impl CharacterCombatMetrics {
    pub fn offense(&self, category: WeaponCategory) -> &OffenseStats {
        match category {
            WeaponCategory::Melee => &self.melee,
            WeaponCategory::Ranged => &self.ranged,
        }
    }

    pub(crate) fn record_swing(&mut self, roll: &AttackRollResult) {
        match roll.category {
            WeaponCategory::Melee => self.melee.record(roll),
            WeaponCategory::Ranged => self.ranged.record(roll),
        }
    }

    pub(crate) fn record_received(&mut self, roll: &AttackRollResult) {
        self.defense.record(roll);
    }

    pub fn total_damage_dealt(&self) -> u32 {
        self.melee.damage.saturating_add(self.ranged.damage)
    }
}

/// Battle status. Every variant but `Ongoing` is terminal and final.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatStatus {
    #[default]
    Ongoing,
    Victory,
    Defeat,
    Retreat,
}

impl CombatStatus {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, CombatStatus::Ongoing)
    }
}

/// Battle-level state: status plus metrics of every player unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatResult {
    pub status: CombatStatus,
    pub metrics: BTreeMap<UnitId, CharacterCombatMetrics>,
}

impl CombatResult {
    /// Fresh result with blank metrics for every listed ally.
    pub fn new(allies: impl IntoIterator<Item = UnitId>) -> Self {
        Self {
            status: CombatStatus::Ongoing,
            metrics: allies
                .into_iter()
                .map(|id| (id, CharacterCombatMetrics::default()))
                .collect(),
        }
    }

    /// Moves to a terminal status. Returns false when already terminal.
    pub(crate) fn conclude(&mut self, status: CombatStatus) -> bool {
        if self.status.is_terminal() || !status.is_terminal() {
            return false;
        }
        self.status = status;
        true
    }
}
