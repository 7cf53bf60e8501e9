//! Which battle lines hold an alive combatant, per side.

use super::common::{Line, Side};
use super::unit::CombatUnit;

/// Snapshot of occupied lines for both sides.
///
/// Reach is measured in *ranks*, not raw line indices: empty lines in front of
/// a unit collapse, so a back-liner whose front line has fallen stands closer
/// to the enemy than its line number suggests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineOccupancy {
    allies: [bool; Line::COUNT as usize],
    enemies: [bool; Line::COUNT as usize],
}

impl LineOccupancy {
    /// Builds the occupancy from the alive units of an iterator.
    pub fn from_units<'a>(units: impl IntoIterator<Item = &'a CombatUnit>) -> Self {
        let mut occupancy = Self::default();
        for unit in units.into_iter().filter(|unit| unit.is_alive()) {
            occupancy.lines_mut(unit.side())[unit.line.index() as usize] = true;
        }
        occupancy
    }

    pub fn is_occupied(&self, side: Side, line: Line) -> bool {
        self.lines(side)[line.index() as usize]
    }

    /// Number of occupied lines strictly in front of `line` on `side`.
    pub fn rank(&self, side: Side, line: Line) -> u8 {
        self.lines(side)[..line.index() as usize]
            .iter()
            .filter(|occupied| **occupied)
            .count() as u8
    }

    /// Rank distance between an attacker and a target on opposite sides.
    pub fn distance(&self, attacker: (Side, Line), target: (Side, Line)) -> u8 {
        self.rank(attacker.0, attacker.1) + self.rank(target.0, target.1)
    }

    /// Occupancy after a unit of `side` moves from `from` to `to`.
    ///
    /// Moving onto an occupied line swaps places, which leaves the occupancy
    /// unchanged.
    #[must_use]
    pub fn with_move(mut self, side: Side, from: Line, to: Line) -> Self {
        let lines = self.lines_mut(side);
        if !lines[to.index() as usize] {
            lines[from.index() as usize] = false;
            lines[to.index() as usize] = true;
        }
        self
    }

    fn lines(&self, side: Side) -> &[bool; Line::COUNT as usize] {
        match side {
            Side::Allies => &self.allies,
            Side::Enemies => &self.enemies,
        }
    }

    fn lines_mut(&mut self, side: Side) -> &mut [bool; Line::COUNT as usize] {
        match side {
            Side::Allies => &mut self.allies,
            Side::Enemies => &mut self.enemies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CombatUnit, Faction, UnitId, UnitStats, UnitStatus};

    fn unit(id: u32, faction: Faction, line: u8) -> CombatUnit {
        CombatUnit::new(
            UnitId(id),
            "dummy",
            faction,
            UnitStats::default(),
            Line::new(line).unwrap(),
        )
    }

    #[test]
    fn empty_front_lines_collapse_rank() {
        let mut front = unit(1, Faction::Player, 0);
        let back = unit(2, Faction::Player, 3);
        let occupancy = LineOccupancy::from_units([&front, &back]);
        assert_eq!(occupancy.rank(Side::Allies, Line::REAR), 1);

        front.status = UnitStatus::Dead;
        let occupancy = LineOccupancy::from_units([&front, &back]);
        assert_eq!(occupancy.rank(Side::Allies, Line::REAR), 0);
    }

    #[test]
    fn distance_adds_both_ranks() {
        let units = [
            unit(1, Faction::Player, 0),
            unit(2, Faction::Player, 2),
            unit(3, Faction::Raiders, 0),
            unit(4, Faction::Raiders, 1),
            unit(5, Faction::Raiders, 3),
        ];
        let occupancy = LineOccupancy::from_units(&units);
        let from = (Side::Allies, Line::new(2).unwrap());
        assert_eq!(occupancy.distance(from, (Side::Enemies, Line::REAR)), 3);
        assert_eq!(occupancy.distance(from, (Side::Enemies, Line::FRONT)), 1);
    }

    #[test]
    fn move_into_occupied_line_swaps() {
        let units = [unit(1, Faction::Player, 0), unit(2, Faction::Player, 1)];
        let occupancy = LineOccupancy::from_units(&units);
        let moved = occupancy.with_move(Side::Allies, Line::FRONT, Line::new(1).unwrap());
        assert_eq!(moved, occupancy);

        let moved = occupancy.with_move(Side::Allies, Line::new(1).unwrap(), Line::new(2).unwrap());
        assert!(!moved.is_occupied(Side::Allies, Line::new(1).unwrap()));
        assert!(moved.is_occupied(Side::Allies, Line::new(2).unwrap()));
    }
}
