//! Combatant record.

use super::common::{Faction, Line, Rarity, Side, UnitId};
use super::equipment::{Equipment, Weapon, WeaponCategory, WeaponSlot};

/// Health status of a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitStatus {
    #[default]
    Alive,
    /// Down but capturable. Player units always end up here at 0 hp.
    Unconscious,
    Dead,
}

impl UnitStatus {
    #[inline]
    pub const fn is_alive(self) -> bool {
        matches!(self, UnitStatus::Alive)
    }
}

/// Fully resolved numbers for one combatant.
///
/// Equipment and trait modifiers are already included by the character system
/// before the unit enters battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UnitStats {
    pub hp: u32,
    pub max_hp: u32,
    pub armor: u32,
    pub melee_damage: i32,
    pub ranged_damage: i32,
    pub melee_skill: u32,
    pub ranged_skill: u32,
    pub evasion: u32,
    pub initiative: u32,
    /// Percent chance for a landed swing to crit.
    pub crit_chance: u32,
}

impl UnitStats {
    pub fn skill(&self, category: WeaponCategory) -> u32 {
        match category {
            WeaponCategory::Melee => self.melee_skill,
            WeaponCategory::Ranged => self.ranged_skill,
        }
    }

    pub fn damage_modifier(&self, category: WeaponCategory) -> i32 {
        match category {
            WeaponCategory::Melee => self.melee_damage,
            WeaponCategory::Ranged => self.ranged_damage,
        }
    }
}

/// One participant of a battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatUnit {
    pub id: UnitId,
    pub template_id: String,
    pub faction: Faction,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rarity: Rarity,
    #[cfg_attr(feature = "serde", serde(default))]
    pub variation: u8,
    pub stats: UnitStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: Equipment,
    pub active_slot: WeaponSlot,
    pub line: Line,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: UnitStatus,
}

impl CombatUnit {
    pub fn new(
        id: UnitId,
        template_id: impl Into<String>,
        faction: Faction,
        stats: UnitStats,
        line: Line,
    ) -> Self {
        Self {
            id,
            template_id: template_id.into(),
            faction,
            rarity: Rarity::Common,
            variation: 0,
            stats,
            equipment: Equipment::default(),
            active_slot: WeaponSlot::MeleePrimary,
            line,
            status: UnitStatus::Alive,
        }
    }

    /// Equips `weapon` in `slot` and makes it the active slot.
    #[must_use]
    pub fn wielding(mut self, slot: WeaponSlot, weapon: Weapon) -> Self {
        self.equipment.set_weapon(slot, Some(weapon));
        self.active_slot = slot;
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.status.is_alive()
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.faction.side()
    }

    pub fn active_weapon(&self) -> Option<&Weapon> {
        self.equipment.weapon(self.active_slot)
    }

    /// Points an empty active slot at the first filled slot, if any.
    pub fn normalize_active_slot(&mut self) {
        if self.active_weapon().is_none()
            && let Some(slot) = self.equipment.first_filled_slot()
        {
            self.active_slot = slot;
        }
    }
}
