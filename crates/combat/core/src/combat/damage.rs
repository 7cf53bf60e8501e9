//! Damage range after modifiers and armor.

use crate::state::{DamageRange, Weapon};

/// Armor left after armor piercing. Never negative.
pub fn armor_reduction(target_armor: u32, armor_piercing: u32) -> u32 {
    target_armor.saturating_sub(armor_piercing)
}

/// Per-swing damage interval against a target.
///
/// ```text
/// raw        = weapon.[min, max] + damage_modifier   (floored at 0)
/// reduction  = max(armor - armor_piercing, 0)
/// adjusted   = raw - reduction                        (floored at 0)
/// ```
pub fn adjusted_damage_range(weapon: &Weapon, damage_modifier: i32, target_armor: u32) -> DamageRange {
    let reduction = armor_reduction(target_armor, weapon.armor_piercing);
    let adjust = |value: u32| -> u32 {
        let raw = (value as i64 + damage_modifier as i64).max(0) as u32;
        raw.saturating_sub(reduction)
    };
    DamageRange::new(adjust(weapon.damage.min), adjust(weapon.damage.max))
}
