//! Equipment snapshot carried into battle.
//!
//! Weapons keep their own combat numbers because forecasting needs per-weapon
//! damage, reach and lethality. Armor and gadgets are informational: their
//! bonuses were already folded into [`UnitStats`](super::UnitStats) upstream.

use std::fmt;

/// Melee or ranged. Chooses which skill and damage modifier apply, and which
/// metric bucket an attack is recorded in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponCategory {
    Melee,
    Ranged,
}

/// The four weapon slots a combatant can wield from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponSlot {
    MeleePrimary,
    MeleeSecondary,
    RangedPrimary,
    RangedSecondary,
}

impl WeaponSlot {
    pub const fn category(self) -> WeaponCategory {
        match self {
            WeaponSlot::MeleePrimary | WeaponSlot::MeleeSecondary => WeaponCategory::Melee,
            WeaponSlot::RangedPrimary | WeaponSlot::RangedSecondary => WeaponCategory::Ranged,
        }
    }
}

/// Inclusive damage interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRange {
    pub min: u32,
    pub max: u32,
}

impl DamageRange {
    /// Creates a range, swapping the bounds if they arrive inverted.
    pub const fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub const fn fixed(value: u32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn midpoint(&self) -> f32 {
        (self.min as f32 + self.max as f32) / 2.0
    }
}

impl fmt::Display for DamageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// A weapon instance with rarity scaling already applied.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weapon {
    pub name: String,
    pub category: WeaponCategory,
    pub damage: DamageRange,
    pub armor_piercing: u32,
    pub attacks_per_turn: u8,
    /// Engagement distance in ranks. Zero means the weapon only reaches across
    /// the two front ranks.
    pub range: u8,
    /// Probability in `0.0..=1.0` that a killing blow against a non-player
    /// kills instead of incapacitating.
    pub lethality: f32,
}

impl Weapon {
    pub fn melee(name: impl Into<String>, damage: DamageRange) -> Self {
        Self {
            name: name.into(),
            category: WeaponCategory::Melee,
            damage,
            armor_piercing: 0,
            attacks_per_turn: 1,
            range: 0,
            lethality: 0.5,
        }
    }

    pub fn ranged(name: impl Into<String>, damage: DamageRange, range: u8) -> Self {
        Self {
            name: name.into(),
            category: WeaponCategory::Ranged,
            damage,
            armor_piercing: 0,
            attacks_per_turn: 1,
            range,
            lethality: 0.5,
        }
    }

    #[must_use]
    pub fn with_attacks(mut self, attacks_per_turn: u8) -> Self {
        self.attacks_per_turn = attacks_per_turn;
        self
    }

    #[must_use]
    pub fn with_armor_piercing(mut self, armor_piercing: u32) -> Self {
        self.armor_piercing = armor_piercing;
        self
    }

    #[must_use]
    pub fn with_lethality(mut self, lethality: f32) -> Self {
        self.lethality = lethality.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_range(mut self, range: u8) -> Self {
        self.range = range;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmorPiece {
    pub name: String,
    pub armor: u32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gadget {
    pub name: String,
}

/// Weapon, armor and gadget slots of one combatant.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Equipment {
    pub melee_primary: Option<Weapon>,
    pub melee_secondary: Option<Weapon>,
    pub ranged_primary: Option<Weapon>,
    pub ranged_secondary: Option<Weapon>,
    pub armor: Option<ArmorPiece>,
    pub gadget: Option<Gadget>,
}

impl Equipment {
    pub fn weapon(&self, slot: WeaponSlot) -> Option<&Weapon> {
        match slot {
            WeaponSlot::MeleePrimary => self.melee_primary.as_ref(),
            WeaponSlot::MeleeSecondary => self.melee_secondary.as_ref(),
            WeaponSlot::RangedPrimary => self.ranged_primary.as_ref(),
            WeaponSlot::RangedSecondary => self.ranged_secondary.as_ref(),
        }
    }

    pub fn set_weapon(&mut self, slot: WeaponSlot, weapon: Option<Weapon>) {
        let target = match slot {
            WeaponSlot::MeleePrimary => &mut self.melee_primary,
            WeaponSlot::MeleeSecondary => &mut self.melee_secondary,
            WeaponSlot::RangedPrimary => &mut self.ranged_primary,
            WeaponSlot::RangedSecondary => &mut self.ranged_secondary,
        };
        *target = weapon;
    }

    /// First filled slot in slot order, used when a snapshot arrives with its
    /// active slot pointing at nothing.
    pub fn first_filled_slot(&self) -> Option<WeaponSlot> {
        use strum::IntoEnumIterator;
        WeaponSlot::iter().find(|slot| self.weapon(*slot).is_some())
    }
}
