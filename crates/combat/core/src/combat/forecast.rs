//! Side-effect free attack preview.

use crate::config::CombatConfig;
use crate::state::{CombatUnit, DamageRange, LineOccupancy, UnitId, WeaponCategory, WeaponSlot};

use super::damage::adjusted_damage_range;
use super::hit::{crit_chance, hit_chance};

/// Priced attack of one unit against one target.
///
/// A forecast only exists for an attack that is executable from the current
/// positions; illegal attacks have no forecast at all.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackForecast {
    pub attacker: UnitId,
    pub target: UnitId,
    pub slot: WeaponSlot,
    pub category: WeaponCategory,
    /// Per-swing hit chance in percent.
    pub hit_chance: u32,
    /// Per-landed-swing crit chance in percent.
    pub crit_chance: u32,
    pub crit_multiplier: u32,
    /// Armor-adjusted damage of one non-critical swing.
    pub damage: DamageRange,
    pub swings: u8,
    pub delay_points: u32,
    /// Rank distance the weapon had to cover.
    pub distance: u8,
    pub lethality: f32,
    /// Best case (every swing crits for max damage) drops the target.
    pub can_kill: bool,
    /// `hit × midpoint × swings × (1 + crit × (multiplier - 1))`.
    pub expected_damage: f32,
}

impl AttackForecast {
    /// Largest total damage the attack can deal.
    pub fn max_total_damage(&self) -> u32 {
        self.damage
            .max
            .saturating_mul(self.crit_multiplier)
            .saturating_mul(self.swings as u32)
    }
}

/// Prices an attack, or returns `None` when it is not legal.
///
/// Illegal when the attacker has nothing in its active slot, either side is
/// not alive, both units fight on the same side, or the weapon's range does
/// not cover the rank distance under `occupancy`.
pub fn forecast(
    attacker: &CombatUnit,
    target: &CombatUnit,
    occupancy: &LineOccupancy,
    config: &CombatConfig,
) -> Option<AttackForecast> {
    if !attacker.is_alive() || !target.is_alive() || attacker.side() == target.side() {
        return None;
    }

    let weapon = attacker.active_weapon()?;
    if weapon.attacks_per_turn == 0 {
        return None;
    }

    let distance = occupancy.distance(
        (attacker.side(), attacker.line),
        (target.side(), target.line),
    );
    if distance > weapon.range {
        return None;
    }

    let category = weapon.category;
    let swings = weapon.attacks_per_turn.min(CombatConfig::MAX_SWINGS);
    let hit = hit_chance(
        attacker.stats.skill(category),
        target.stats.evasion,
        &config.hit_chance,
    );
    let crit = crit_chance(attacker.stats.crit_chance);
    let damage = adjusted_damage_range(
        weapon,
        attacker.stats.damage_modifier(category),
        target.stats.armor,
    );

    let crit_factor = 1.0 + (crit as f32 / 100.0) * (config.crit_multiplier as f32 - 1.0);
    let expected_damage = (hit as f32 / 100.0) * damage.midpoint() * swings as f32 * crit_factor;

    let mut forecast = AttackForecast {
        attacker: attacker.id,
        target: target.id,
        slot: attacker.active_slot,
        category,
        hit_chance: hit,
        crit_chance: crit,
        crit_multiplier: config.crit_multiplier,
        damage,
        swings,
        delay_points: config.attack_delay(swings),
        distance,
        lethality: weapon.lethality.clamp(0.0, 1.0),
        can_kill: false,
        expected_damage,
    };
    forecast.can_kill = forecast.max_total_damage() >= target.stats.hp;
    Some(forecast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Faction, Line, UnitStats, UnitStatus, Weapon};

    fn stats(hp: u32) -> UnitStats {
        UnitStats {
            hp,
            max_hp: hp,
            melee_skill: 50,
            ranged_skill: 30,
            evasion: 0,
            initiative: 10,
            crit_chance: 10,
            ..UnitStats::default()
        }
    }

    fn fighter(id: u32, faction: Faction, line: u8) -> CombatUnit {
        CombatUnit::new(UnitId(id), "fighter", faction, stats(20), Line::new(line).unwrap())
            .wielding(
                WeaponSlot::MeleePrimary,
                Weapon::melee("machete", DamageRange::new(4, 8)),
            )
    }

    #[test]
    fn melee_reaches_only_front_ranks() {
        let config = CombatConfig::default();
        let attacker = fighter(1, Faction::Player, 0);
        let front = fighter(2, Faction::Raiders, 0);
        let back = fighter(3, Faction::Raiders, 1);
        let occupancy = LineOccupancy::from_units([&attacker, &front, &back]);

        assert!(forecast(&attacker, &front, &occupancy, &config).is_some());
        assert!(forecast(&attacker, &back, &occupancy, &config).is_none());
    }

    #[test]
    fn reach_opens_up_when_front_falls() {
        let config = CombatConfig::default();
        let attacker = fighter(1, Faction::Player, 0);
        let mut front = fighter(2, Faction::Raiders, 0);
        let back = fighter(3, Faction::Raiders, 1);
        front.status = UnitStatus::Dead;
        let occupancy = LineOccupancy::from_units([&attacker, &front, &back]);

        assert!(forecast(&attacker, &front, &occupancy, &config).is_none());
        assert!(forecast(&attacker, &back, &occupancy, &config).is_some());
    }

    #[test]
    fn empty_slot_or_same_side_is_illegal() {
        let config = CombatConfig::default();
        let mut unarmed = fighter(1, Faction::Player, 0);
        unarmed.active_slot = WeaponSlot::RangedPrimary;
        let ally = fighter(2, Faction::Player, 1);
        let enemy = fighter(3, Faction::Raiders, 0);
        let occupancy = LineOccupancy::from_units([&unarmed, &ally, &enemy]);

        assert!(forecast(&unarmed, &enemy, &occupancy, &config).is_none());
        let armed = fighter(4, Faction::Player, 0);
        assert!(forecast(&armed, &ally, &occupancy, &config).is_none());
    }

    #[test]
    fn prices_odds_damage_and_delay() {
        let config = CombatConfig::default();
        let mut attacker = fighter(1, Faction::Player, 0);
        attacker.stats.melee_damage = 2;
        let cleaver = Weapon::melee("cleaver", DamageRange::new(4, 8))
            .with_attacks(2)
            .with_armor_piercing(1);
        attacker
            .equipment
            .set_weapon(WeaponSlot::MeleePrimary, Some(cleaver));
        let mut target = fighter(2, Faction::Mutants, 0);
        target.stats.armor = 3;
        target.stats.evasion = 20;
        target.stats.hp = 24;
        let occupancy = LineOccupancy::from_units([&attacker, &target]);

        let forecast = forecast(&attacker, &target, &occupancy, &config).unwrap();
        assert_eq!(forecast.hit_chance, 80);
        assert_eq!(forecast.crit_chance, 10);
        // (4+2-2, 8+2-2)
        assert_eq!(forecast.damage, DamageRange::new(4, 8));
        assert_eq!(forecast.swings, 2);
        assert_eq!(forecast.delay_points, 20);
        // 8 * 2 * 2 = 32 >= 24
        assert!(forecast.can_kill);
        // 0.8 * 6 * 2 * 1.1
        assert!((forecast.expected_damage - 10.56).abs() < 1e-3);
    }

    #[test]
    fn can_kill_false_when_best_case_falls_short() {
        let config = CombatConfig::default();
        let attacker = fighter(1, Faction::Player, 0);
        let mut target = fighter(2, Faction::Beasts, 0);
        target.stats.hp = 17;
        let occupancy = LineOccupancy::from_units([&attacker, &target]);
        // best case 8 * 2 * 1 = 16
        assert!(!forecast(&attacker, &target, &occupancy, &config).unwrap().can_kill);
    }
}
