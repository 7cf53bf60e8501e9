//! Rolls a forecast into concrete swings.

use crate::env::Dice;
use crate::state::WeaponCategory;

use super::forecast::AttackForecast;

/// Outcome kind of one swing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RollOutcome {
    Miss,
    Hit,
    Crit,
}

impl RollOutcome {
    pub const fn landed(self) -> bool {
        !matches!(self, RollOutcome::Miss)
    }
}

/// One resolved swing.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackRollResult {
    pub outcome: RollOutcome,
    pub damage: u32,
    /// Sample in `[0, 1)` compared against weapon lethality if this swing
    /// turns out to be the killing blow.
    pub lethality_roll: f32,
    pub category: WeaponCategory,
}

/// Resolves every swing of `forecast`.
///
/// Per swing: roll to hit; on a hit roll to crit; sample damage uniformly in
/// the forecast range and multiply it on a crit. A lethality sample is drawn
/// for every swing so the number of draws per swing is fixed.
pub fn resolve(forecast: &AttackForecast, dice: &mut Dice<'_>) -> Vec<AttackRollResult> {
    (0..forecast.swings)
        .map(|_| {
            let landed = dice.chance(forecast.hit_chance);
            let critical = landed && dice.chance(forecast.crit_chance);
            let lethality_roll = dice.sample();

            let (outcome, damage) = match (landed, critical) {
                (false, _) => (RollOutcome::Miss, 0),
                (true, false) => (
                    RollOutcome::Hit,
                    dice.range(forecast.damage.min, forecast.damage.max),
                ),
                (true, true) => (
                    RollOutcome::Crit,
                    dice.range(forecast.damage.min, forecast.damage.max)
                        .saturating_mul(forecast.crit_multiplier),
                ),
            };

            AttackRollResult {
                outcome,
                damage,
                lethality_roll,
                category: forecast.category,
            }
        })
        .collect()
}

/// Sum of damage across swings.
pub fn total_damage(rolls: &[AttackRollResult]) -> u32 {
    rolls
        .iter()
        .fold(0u32, |total, roll| total.saturating_add(roll.damage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{FixedRng, SequenceRng};
    use crate::state::{DamageRange, UnitId, WeaponSlot};

    fn forecast(hit_chance: u32, crit_chance: u32, damage: DamageRange, swings: u8) -> AttackForecast {
        AttackForecast {
            attacker: UnitId(1),
            target: UnitId(2),
            slot: WeaponSlot::MeleePrimary,
            category: WeaponCategory::Melee,
            hit_chance,
            crit_chance,
            crit_multiplier: 2,
            damage,
            swings,
            delay_points: 10,
            distance: 0,
            lethality: 1.0,
            can_kill: false,
            expected_damage: 0.0,
        }
    }

    #[test]
    fn certain_hit_with_fixed_damage() {
        let rng = FixedRng(u32::MAX / 2);
        let mut dice = Dice::new(&rng, 7, 0, 1);
        let rolls = resolve(&forecast(100, 0, DamageRange::fixed(10), 1), &mut dice);
        assert_eq!(rolls.len(), 1);
        assert_eq!(rolls[0].outcome, RollOutcome::Hit);
        assert_eq!(rolls[0].damage, 10);
    }

    #[test]
    fn one_result_per_swing_and_misses_deal_nothing() {
        let rng = FixedRng(u32::MAX);
        let mut dice = Dice::new(&rng, 0, 0, 1);
        let rolls = resolve(&forecast(50, 50, DamageRange::new(3, 9), 3), &mut dice);
        assert_eq!(rolls.len(), 3);
        assert!(rolls.iter().all(|roll| roll.outcome == RollOutcome::Miss && roll.damage == 0));
        assert_eq!(total_damage(&rolls), 0);
    }

    #[test]
    fn crit_doubles_sampled_damage() {
        let rng = FixedRng(0);
        let mut dice = Dice::new(&rng, 0, 0, 1);
        let rolls = resolve(&forecast(90, 30, DamageRange::new(5, 9), 2), &mut dice);
        assert!(rolls.iter().all(|roll| roll.outcome == RollOutcome::Crit));
        assert_eq!(total_damage(&rolls), 20);
    }

    #[test]
    fn scripted_rolls_mix_outcomes() {
        // swing 1: hit, no crit, lethality, damage; swing 2: miss, lethality
        let rng = SequenceRng::new(vec![
            SequenceRng::fraction(0.1),
            SequenceRng::fraction(0.9),
            SequenceRng::fraction(0.5),
            SequenceRng::fraction(0.0),
            SequenceRng::fraction(0.95),
            SequenceRng::fraction(0.5),
        ]);
        let mut dice = Dice::new(&rng, 0, 0, 1);
        let rolls = resolve(&forecast(60, 20, DamageRange::new(4, 6), 2), &mut dice);
        assert_eq!(rolls[0].outcome, RollOutcome::Hit);
        assert_eq!(rolls[0].damage, 4);
        assert_eq!(rolls[1].outcome, RollOutcome::Miss);
    }

    #[test]
    fn same_seed_same_rolls() {
        use crate::env::PcgRng;
        let rng = PcgRng;
        let plan = forecast(55, 25, DamageRange::new(2, 12), 4);
        let first = resolve(&plan, &mut Dice::new(&rng, 99, 3, 1));
        let second = resolve(&plan, &mut Dice::new(&rng, 99, 3, 1));
        assert_eq!(first, second);
    }
}
