//! Battle state: combatant records and the read-only views built from them.

mod common;
mod equipment;
mod occupancy;
mod unit;

pub use common::{Faction, InvalidLine, Line, Rarity, Side, TurnTime, UnitId};
pub use equipment::{
    ArmorPiece, DamageRange, Equipment, Gadget, Weapon, WeaponCategory, WeaponSlot,
};
pub use occupancy::LineOccupancy;
pub use unit::{CombatUnit, UnitStats, UnitStatus};
