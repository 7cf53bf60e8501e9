//! Greedy decision procedure for one turn.

use combat_core::{AttackForecast, CombatAction, Line, Weapon, WeaponCategory};

use super::AiContext;

/// Line the weapon is happiest on: the front line for melee weapons, as far
/// back as the range still reaches for ranged ones.
pub fn ideal_line(weapon: &Weapon) -> Line {
    match weapon.category {
        WeaponCategory::Melee => Line::FRONT,
        WeaponCategory::Ranged => {
            Line::new(weapon.range.min(Line::REAR.index())).unwrap_or(Line::REAR)
        }
    }
}

/// Best attack among `forecasts`.
///
/// Prefers attacks that can kill, then the highest expected damage, then the
/// weakest target, then the lowest target id.
pub fn pick_target<'f>(
    ctx: &AiContext<'_>,
    forecasts: &'f [AttackForecast],
) -> Option<&'f AttackForecast> {
    forecasts.iter().max_by(|a, b| {
        a.can_kill
            .cmp(&b.can_kill)
            .then_with(|| a.expected_damage.total_cmp(&b.expected_damage))
            .then_with(|| ctx.hp_of(b.target).cmp(&ctx.hp_of(a.target)))
            .then_with(|| b.target.cmp(&a.target))
    })
}

/// Chooses the action of `ctx.unit` for this turn.
///
/// - On the ideal line, or on a back line that still reaches: attack the best
///   target if there is one.
/// - Otherwise simulate one step towards the ideal line. A real attack that
///   can kill or costs no delay is taken right away; else the unit steps when
///   the simulated line offers at least as many targets. A step never swaps
///   out an ally that can already attack from its line.
/// - Else the best real attack, if any.
/// - With nothing to attack at all the unit steps towards its ideal line, or
///   holds when already there.
pub fn decide(ctx: &AiContext<'_>) -> CombatAction {
    let unit = ctx.unit;
    let Some(weapon) = unit.active_weapon() else {
        return CombatAction::hold(unit);
    };

    let ideal = ideal_line(weapon);
    let real = ctx.forecasts();
    let best_real = pick_target(ctx, &real);

    let in_position = unit.line == ideal || (unit.line.is_back() && !real.is_empty());
    if in_position && let Some(best) = best_real {
        return CombatAction::Attack(best.clone());
    }

    let step = unit.line.step_towards(ideal);
    let displaces_engaged_ally = ctx.ally_on(step).is_some_and(|ally| ctx.can_attack(ally));
    if step != unit.line && !displaces_engaged_ally {
        if let Some(best) = best_real
            && (best.can_kill || best.delay_points == 0)
        {
            return CombatAction::Attack(best.clone());
        }

        let simulated = ctx.forecasts_from(step);
        if simulated.len() >= real.len() {
            tracing::debug!(
                target: "runtime::ai",
                unit = %unit.id,
                from = %unit.line,
                to = %step,
                targets_now = real.len(),
                targets_after = simulated.len(),
                "Stepping towards ideal line"
            );
            return CombatAction::Reposition {
                unit: unit.id,
                to: step,
            };
        }
    }

    match best_real {
        Some(best) => CombatAction::Attack(best.clone()),
        None => CombatAction::hold(unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{
        BattleSnapshot, CombatConfig, CombatStatus, CombatUnit, DamageRange, Faction, UnitId,
        UnitStats, WeaponSlot,
    };

    fn line(index: u8) -> Line {
        Line::new(index).unwrap()
    }

    fn stats(hp: u32) -> UnitStats {
        UnitStats {
            hp,
            max_hp: hp,
            melee_skill: 40,
            ranged_skill: 40,
            initiative: 10,
            ..UnitStats::default()
        }
    }

    fn brute(id: u32, faction: Faction, hp: u32, at: u8) -> CombatUnit {
        CombatUnit::new(UnitId(id), "brute", faction, stats(hp), line(at)).wielding(
            WeaponSlot::MeleePrimary,
            Weapon::melee("club", DamageRange::new(4, 6)),
        )
    }

    fn shooter(id: u32, faction: Faction, hp: u32, at: u8, range: u8) -> CombatUnit {
        CombatUnit::new(UnitId(id), "shooter", faction, stats(hp), line(at)).wielding(
            WeaponSlot::RangedPrimary,
            Weapon::ranged("rifle", DamageRange::new(5, 8), range),
        )
    }

    fn snapshot(units: Vec<CombatUnit>) -> BattleSnapshot {
        BattleSnapshot {
            units,
            queue: Vec::new(),
            current: None,
            status: CombatStatus::Ongoing,
            config: CombatConfig::default(),
            action_in_flight: false,
        }
    }

    fn decide_for(id: u32, snapshot: &BattleSnapshot) -> CombatAction {
        let ctx = AiContext::new(UnitId(id), snapshot).expect("unit in snapshot");
        decide(&ctx)
    }

    #[test]
    fn ideal_lines_follow_weapon() {
        assert_eq!(ideal_line(&Weapon::melee("club", DamageRange::fixed(3))), Line::FRONT);
        assert_eq!(ideal_line(&Weapon::ranged("bow", DamageRange::fixed(3), 2)), line(2));
        assert_eq!(ideal_line(&Weapon::ranged("rail", DamageRange::fixed(3), 9)), Line::REAR);
    }

    #[test]
    fn rear_melee_without_targets_repositions() {
        let battle = snapshot(vec![
            brute(1, Faction::Player, 20, 0),
            brute(2, Faction::Player, 20, 1),
            brute(10, Faction::Mutants, 20, 0),
            brute(11, Faction::Mutants, 20, 3),
        ]);

        let action = decide_for(11, &battle);
        assert_eq!(
            action,
            CombatAction::Reposition {
                unit: UnitId(11),
                to: line(2),
            }
        );
    }

    #[test]
    fn front_melee_attacks_and_prefers_kills() {
        let battle = snapshot(vec![
            brute(1, Faction::Player, 30, 0),
            brute(2, Faction::Player, 3, 0),
            brute(10, Faction::Raiders, 20, 0),
        ]);

        let CombatAction::Attack(chosen) = decide_for(10, &battle) else {
            panic!("expected an attack");
        };
        assert!(chosen.can_kill);
        assert_eq!(chosen.target, UnitId(2));
    }

    #[test]
    fn equal_targets_break_ties_by_hp_then_id() {
        let battle = snapshot(vec![
            brute(1, Faction::Player, 30, 0),
            brute(2, Faction::Player, 25, 0),
            brute(3, Faction::Player, 25, 0),
            brute(10, Faction::Raiders, 20, 0),
        ]);

        let CombatAction::Attack(chosen) = decide_for(10, &battle) else {
            panic!("expected an attack");
        };
        assert_eq!(chosen.target, UnitId(2));
    }

    #[test]
    fn higher_expected_damage_beats_lower_hp() {
        let mut armored = brute(2, Faction::Player, 30, 0);
        armored.stats.armor = 3;
        let battle = snapshot(vec![
            brute(1, Faction::Player, 40, 0),
            armored,
            brute(10, Faction::Raiders, 20, 0),
        ]);

        let ctx = AiContext::new(UnitId(10), &battle).expect("unit in snapshot");
        let forecasts = ctx.forecasts();
        assert!(forecasts.iter().all(|f| !f.can_kill));

        let chosen = pick_target(&ctx, &forecasts).expect("two targets");
        assert_eq!(chosen.target, UnitId(1));
        let other = forecasts.iter().find(|f| f.target == UnitId(2)).unwrap();
        assert!(chosen.expected_damage > other.expected_damage);
    }

    #[test]
    fn free_attack_is_taken_before_stepping() {
        let mut battle = snapshot(vec![
            brute(1, Faction::Player, 30, 0),
            shooter(10, Faction::Beasts, 20, 0, 3),
        ]);
        battle.config.attack_delay_per_swing = 0;
        battle.config.attack_base_delay = 0;

        let CombatAction::Attack(chosen) = decide_for(10, &battle) else {
            panic!("expected an attack");
        };
        assert_eq!(chosen.delay_points, 0);
        assert!(!chosen.can_kill);
    }

    #[test]
    fn rear_melee_waits_behind_an_engaged_ally() {
        let battle = snapshot(vec![
            brute(1, Faction::Player, 30, 0),
            brute(2, Faction::Player, 30, 1),
            brute(10, Faction::Raiders, 20, 0),
        ]);

        assert_eq!(
            decide_for(2, &battle),
            CombatAction::Reposition {
                unit: UnitId(2),
                to: line(1),
            }
        );
    }

    #[test]
    fn rear_melee_swaps_with_an_unarmed_ally() {
        let unarmed = CombatUnit::new(UnitId(1), "medic", Faction::Player, stats(30), line(0));
        let battle = snapshot(vec![
            unarmed,
            brute(2, Faction::Player, 30, 1),
            brute(10, Faction::Raiders, 20, 0),
        ]);

        assert_eq!(
            decide_for(2, &battle),
            CombatAction::Reposition {
                unit: UnitId(2),
                to: Line::FRONT,
            }
        );
    }

    #[test]
    fn ranged_unit_backs_off_when_it_keeps_its_targets() {
        let battle = snapshot(vec![
            brute(1, Faction::Player, 30, 0),
            shooter(10, Faction::Beasts, 20, 0, 3),
        ]);

        assert_eq!(
            decide_for(10, &battle),
            CombatAction::Reposition {
                unit: UnitId(10),
                to: line(1),
            }
        );
    }

    #[test]
    fn ranged_unit_on_ideal_line_fires() {
        let battle = snapshot(vec![
            brute(1, Faction::Player, 30, 0),
            shooter(10, Faction::Beasts, 20, 2, 2),
        ]);

        assert!(matches!(decide_for(10, &battle), CombatAction::Attack(_)));
    }

    #[test]
    fn lethal_real_attack_beats_stepping() {
        let battle = snapshot(vec![
            brute(1, Faction::Player, 4, 0),
            shooter(10, Faction::Machines, 20, 0, 3),
        ]);

        let CombatAction::Attack(chosen) = decide_for(10, &battle) else {
            panic!("expected an attack");
        };
        assert_eq!(chosen.target, UnitId(1));
    }

    #[test]
    fn nothing_to_fight_holds_on_ideal_line() {
        let battle = snapshot(vec![brute(10, Faction::Raiders, 20, 0)]);
        assert_eq!(
            decide_for(10, &battle),
            CombatAction::Reposition {
                unit: UnitId(10),
                to: Line::FRONT,
            }
        );
    }
}
