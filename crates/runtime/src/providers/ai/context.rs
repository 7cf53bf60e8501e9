//! AI context for single-turn decision making.
//!
//! [`AiContext`] is the "blackboard" the policy reads: the acting unit, the
//! battle snapshot and the occupancy derived from it.

use combat_core::{
    AttackForecast, BattleSnapshot, CombatConfig, CombatUnit, Line, LineOccupancy, UnitId, forecast,
};

/// Context for AI decision-making.
///
/// The `'a` lifetime ties the context to the snapshot it was built from;
/// evaluation happens synchronously within a single turn.
pub struct AiContext<'a> {
    /// The unit making the decision.
    pub unit: &'a CombatUnit,

    /// Read-only access to the battle.
    pub snapshot: &'a BattleSnapshot,

    occupancy: LineOccupancy,
}

impl<'a> AiContext<'a> {
    /// Returns `None` when `unit` is not part of the snapshot.
    pub fn new(unit: UnitId, snapshot: &'a BattleSnapshot) -> Option<Self> {
        Some(Self {
            unit: snapshot.unit(unit)?,
            snapshot,
            occupancy: snapshot.occupancy(),
        })
    }

    pub fn config(&self) -> &CombatConfig {
        &self.snapshot.config
    }

    pub fn occupancy(&self) -> &LineOccupancy {
        &self.occupancy
    }

    /// Alive units on the other side.
    pub fn opponents(&self) -> impl Iterator<Item = &'a CombatUnit> + '_ {
        let side = self.unit.side();
        self.snapshot
            .units
            .iter()
            .filter(move |other| other.is_alive() && other.side() != side)
    }

    /// Alive ally of the acting unit standing on `line`.
    pub fn ally_on(&self, line: Line) -> Option<&'a CombatUnit> {
        let side = self.unit.side();
        self.snapshot.units.iter().find(|other| {
            other.id != self.unit.id
                && other.is_alive()
                && other.side() == side
                && other.line == line
        })
    }

    /// True when `other` has at least one legal attack from where it stands.
    pub fn can_attack(&self, other: &CombatUnit) -> bool {
        self.snapshot
            .units
            .iter()
            .any(|target| forecast(other, target, &self.occupancy, self.config()).is_some())
    }

    pub fn hp_of(&self, unit: UnitId) -> u32 {
        self.snapshot.unit(unit).map_or(0, |unit| unit.stats.hp)
    }

    /// Every legal attack from where the unit stands now.
    pub fn forecasts(&self) -> Vec<AttackForecast> {
        self.forecasts_with(self.unit, &self.occupancy)
    }

    /// Every legal attack if the unit stood on `line` instead.
    ///
    /// Moving onto a line held by an ally swaps the two, so the side's
    /// occupancy only changes when `line` is empty.
    pub fn forecasts_from(&self, line: Line) -> Vec<AttackForecast> {
        if line == self.unit.line {
            return self.forecasts();
        }
        let mut moved = self.unit.clone();
        moved.line = line;
        let occupancy = self.occupancy.with_move(self.unit.side(), self.unit.line, line);
        self.forecasts_with(&moved, &occupancy)
    }

    fn forecasts_with(&self, unit: &CombatUnit, occupancy: &LineOccupancy) -> Vec<AttackForecast> {
        self.opponents()
            .filter_map(|target| forecast(unit, target, occupancy, self.config()))
            .collect()
    }
}
