use std::fmt;

/// Unique identifier for a combatant tracked by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Point on the initiative timeline, stored in hundredths.
///
/// Scheduler arithmetic is carried out in whole hundredths so that repeated
/// cadence additions cannot accumulate floating point drift. `TurnTime(150)`
/// reads as `1.50`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnTime(pub u64);

impl TurnTime {
    pub const ZERO: Self = Self(0);

    /// Number of stored units per whole time unit.
    pub const SCALE: u64 = 100;

    /// Builds a time value from a fractional amount, rounding to hundredths.
    pub fn from_f64(value: f64) -> Self {
        if value <= 0.0 {
            return Self::ZERO;
        }
        Self((value * Self::SCALE as f64).round() as u64)
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }
}

impl std::ops::Add for TurnTime {
    type Output = TurnTime;
    fn add(self, rhs: TurnTime) -> TurnTime {
        TurnTime(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for TurnTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / Self::SCALE, self.0 % Self::SCALE)
    }
}

/// Battle line slot. Lines 0-1 form the front, 2-3 the back.
///
/// Each side numbers its own lines from the middle of the field outwards, so
/// line 0 of one faction faces line 0 of the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct Line(u8);

impl Line {
    pub const COUNT: u8 = 4;
    pub const FRONT: Self = Self(0);
    pub const REAR: Self = Self(Self::COUNT - 1);

    /// Returns the line if `index` is inside the battlefield.
    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    pub const fn is_front(self) -> bool {
        self.0 < 2
    }

    pub const fn is_back(self) -> bool {
        !self.is_front()
    }

    /// One step towards the rear, or `None` at the last line.
    pub const fn rearward(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    /// One step towards the enemy, or `None` at the front line.
    pub const fn forward(self) -> Option<Self> {
        if self.0 == 0 { None } else { Some(Self(self.0 - 1)) }
    }

    /// Moves one step towards `goal`, staying put when already there.
    pub fn step_towards(self, goal: Line) -> Line {
        match self.0.cmp(&goal.0) {
            std::cmp::Ordering::Less => Self(self.0 + 1),
            std::cmp::Ordering::Greater => Self(self.0 - 1),
            std::cmp::Ordering::Equal => self,
        }
    }

    pub fn all() -> impl Iterator<Item = Line> {
        (0..Self::COUNT).map(Self)
    }
}

impl TryFrom<u8> for Line {
    type Error = InvalidLine;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidLine(value))
    }
}

impl From<Line> for u8 {
    fn from(line: Line) -> u8 {
        line.0
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Raised when a line index falls outside the battlefield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("line {0} is outside the battlefield (0..{count})", count = Line::COUNT)]
pub struct InvalidLine(pub u8);

/// Allegiance of a combatant. Everything except `Player` is hostile.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Faction {
    Player,
    Raiders,
    Mutants,
    Beasts,
    Machines,
}

impl Faction {
    #[inline]
    pub const fn is_player(self) -> bool {
        matches!(self, Faction::Player)
    }

    /// Which side of the battlefield this faction fights on.
    #[inline]
    pub const fn side(self) -> Side {
        if self.is_player() {
            Side::Allies
        } else {
            Side::Enemies
        }
    }
}

/// The two opposing sides of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Allies,
    Enemies,
}

impl Side {
    pub const fn opposite(self) -> Side {
        match self {
            Side::Allies => Side::Enemies,
            Side::Enemies => Side::Allies,
        }
    }
}

/// Rarity tier copied from the roster snapshot. Only used for loot and display.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_time_rounds_to_hundredths() {
        assert_eq!(TurnTime::from_f64(100.0 / 3.0), TurnTime(3333));
        assert_eq!(TurnTime::from_f64(12.345).to_string(), "12.35");
        assert_eq!(TurnTime::from_f64(-1.0), TurnTime::ZERO);
    }

    #[test]
    fn line_bounds_and_steps() {
        assert!(Line::new(4).is_none());
        assert_eq!(Line::REAR.rearward(), None);
        assert_eq!(Line::FRONT.forward(), None);
        assert_eq!(Line::FRONT.step_towards(Line::REAR), Line::new(1).unwrap());
        assert_eq!(Line::REAR.step_towards(Line::FRONT), Line::new(2).unwrap());
        assert!(Line::new(1).unwrap().is_front());
        assert!(Line::new(2).unwrap().is_back());
    }

    #[test]
    fn faction_parses_from_snake_case() {
        assert_eq!("raiders".parse::<Faction>(), Ok(Faction::Raiders));
        assert_eq!(Faction::Player.side(), Side::Allies);
        assert_eq!(Faction::Machines.side().opposite(), Side::Allies);
    }
}
