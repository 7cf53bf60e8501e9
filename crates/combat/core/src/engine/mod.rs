//! Battle engine: owns combatants, the initiative queue and the result.
//!
//! [`CombatEngine`] is the only writer of battle state. A turn runs as:
//!
//! 1. [`CombatEngine::next_turn`] pops the active unit
//! 2. [`CombatEngine::begin_action`] validates, locks and rolls
//! 3. [`CombatEngine::complete_action`] applies, reschedules and unlocks
//!
//! Between 2 and 3 the caller may wait as long as it likes (presentation);
//! any other action submitted meanwhile is refused as a no-op.

mod action;
mod apply;
mod errors;
mod lifecycle;
mod snapshot;
mod turns;

pub use action::{ActionOutcome, ActionReceipt, ActionStart, CombatAction, Applied};
pub use apply::AttackApplied;
pub use errors::{ActionError, EngineError, TurnError};
pub use lifecycle::{BattleLogEntry, BattleReport};
pub use snapshot::BattleSnapshot;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::CombatConfig;
use crate::env::RngOracle;
use crate::error::{CombatError, ErrorContext};
use crate::metrics::{CombatResult, CombatStatus};
use crate::scheduler::{InitiativeItem, InitiativeQueue};
use crate::state::{CombatUnit, LineOccupancy, Side, UnitId, UnitStatus};

use action::PendingAction;

/// Turn-based combat engine for a single battle.
pub struct CombatEngine {
    config: CombatConfig,
    rng: Arc<dyn RngOracle>,
    seed: u64,
    units: BTreeMap<UnitId, CombatUnit>,
    allies: Vec<UnitId>,
    enemies: Vec<UnitId>,
    queue: InitiativeQueue,
    current: Option<InitiativeItem>,
    result: CombatResult,
    in_flight: Option<PendingAction>,
    nonce: u64,
    log: Vec<BattleLogEntry>,
    report: Option<BattleReport>,
    aborted: bool,
}

impl CombatEngine {
    /// Sets up a battle from both rosters.
    ///
    /// Units are partitioned into allies (player faction) and enemies, every
    /// alive unit gets an opening turn at time zero, and each ally starts with
    /// blank metrics. Alive units arriving with 0 hp are treated as
    /// unconscious; empty active slots fall back to the first filled slot.
    pub fn initialize(
        units: impl IntoIterator<Item = CombatUnit>,
        config: CombatConfig,
        rng: Arc<dyn RngOracle>,
        seed: u64,
    ) -> Result<Self, EngineError> {
        let mut roster = BTreeMap::new();
        let mut allies = Vec::new();
        let mut enemies = Vec::new();

        for mut unit in units {
            if unit.stats.hp == 0 && unit.is_alive() {
                unit.status = UnitStatus::Unconscious;
            }
            if !unit.is_alive() {
                unit.stats.hp = 0;
            }
            unit.normalize_active_slot();

            match unit.side() {
                Side::Allies => allies.push(unit.id),
                Side::Enemies => enemies.push(unit.id),
            }
            let id = unit.id;
            if roster.insert(id, unit).is_some() {
                return Err(EngineError::DuplicateUnit(id));
            }
        }

        let queue = InitiativeQueue::seed(roster.values());
        let result = CombatResult::new(allies.iter().copied());

        let mut engine = Self {
            config,
            rng,
            seed,
            units: roster,
            allies,
            enemies,
            queue,
            current: None,
            result,
            in_flight: None,
            nonce: 0,
            log: Vec::new(),
            report: None,
            aborted: false,
        };
        engine.check_termination();
        Ok(engine)
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn status(&self) -> CombatStatus {
        self.result.status
    }

    pub fn result(&self) -> &CombatResult {
        &self.result
    }

    pub fn queue(&self) -> &InitiativeQueue {
        &self.queue
    }

    pub fn allies(&self) -> &[UnitId] {
        &self.allies
    }

    pub fn enemies(&self) -> &[UnitId] {
        &self.enemies
    }

    pub fn units(&self) -> impl Iterator<Item = &CombatUnit> {
        self.units.values()
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Number of actions completed so far.
    pub fn actions_completed(&self) -> u64 {
        self.nonce
    }

    /// Boundary lookup: an unknown id is the caller's mistake.
    pub fn unit(&self, id: UnitId) -> Result<&CombatUnit, ActionError> {
        self.units.get(&id).ok_or(ActionError::UnknownUnit(id))
    }

    pub fn occupancy(&self) -> LineOccupancy {
        LineOccupancy::from_units(self.units.values())
    }

    /// Alive units fighting on `side`.
    pub fn alive_on(&self, side: Side) -> impl Iterator<Item = &CombatUnit> {
        self.units
            .values()
            .filter(move |unit| unit.side() == side && unit.is_alive())
    }

    /// Internal lookup: an id the engine put in its own structures must exist.
    fn roster_unit(&self, id: UnitId) -> Result<&CombatUnit, EngineError> {
        self.units
            .get(&id)
            .ok_or_else(|| EngineError::UnitNotFound {
                id,
                context: self.error_context(),
            })
    }

    fn roster_unit_mut(&mut self, id: UnitId) -> Result<&mut CombatUnit, EngineError> {
        let context = self.error_context();
        self.units
            .get_mut(&id)
            .ok_or(EngineError::UnitNotFound { id, context })
    }

    fn error_context(&self) -> ErrorContext {
        let time = self.current.map(|item| item.time).unwrap_or_default();
        match self.current {
            Some(item) => ErrorContext::new(time).with_actor(item.unit),
            None => ErrorContext::new(time),
        }
    }

    /// Records a fatal error so the engine refuses any further work.
    fn guard<T>(&mut self, result: Result<T, EngineError>) -> Result<T, EngineError> {
        if let Err(error) = &result
            && error.severity().is_fatal()
        {
            self.aborted = true;
        }
        result
    }

    fn ensure_usable(&self) -> Result<(), EngineError> {
        if self.aborted {
            Err(EngineError::Aborted)
        } else {
            Ok(())
        }
    }

    /// Sets victory or defeat once one side has nobody standing.
    fn check_termination(&mut self) {
        if self.result.status.is_terminal() {
            return;
        }
        let enemies_down = self.alive_on(Side::Enemies).next().is_none();
        let allies_down = self.alive_on(Side::Allies).next().is_none();

        let status = if enemies_down {
            CombatStatus::Victory
        } else if allies_down {
            CombatStatus::Defeat
        } else {
            return;
        };
        self.conclude(status);
    }

    fn conclude(&mut self, status: CombatStatus) -> bool {
        if self.result.conclude(status) {
            self.queue.clear();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::forecast;
    use crate::env::FixedRng;
    use crate::error::ErrorSeverity;
    use crate::state::{DamageRange, Faction, Line, TurnTime, UnitStats, Weapon, WeaponSlot};

    fn line(index: u8) -> Line {
        Line::new(index).unwrap()
    }

    fn fighter(id: u32, faction: Faction, hp: u32, initiative: u32, at: u8) -> CombatUnit {
        let stats = UnitStats {
            hp,
            max_hp: hp,
            melee_skill: 50,
            ranged_skill: 50,
            initiative,
            ..UnitStats::default()
        };
        CombatUnit::new(UnitId(id), "fighter", faction, stats, line(at)).wielding(
            WeaponSlot::MeleePrimary,
            Weapon::melee("rebar", DamageRange::fixed(10)).with_lethality(1.0),
        )
    }

    /// `FixedRng(0)` makes every swing hit for the minimum and never crit.
    fn engine_with(units: Vec<CombatUnit>) -> CombatEngine {
        CombatEngine::initialize(units, CombatConfig::default(), Arc::new(FixedRng(0)), 7)
            .expect("engine")
    }

    fn attack(engine: &CombatEngine, attacker: u32, target: u32) -> CombatAction {
        let priced = forecast(
            engine.unit(UnitId(attacker)).unwrap(),
            engine.unit(UnitId(target)).unwrap(),
            &engine.occupancy(),
            engine.config(),
        )
        .expect("legal attack");
        CombatAction::Attack(priced)
    }

    fn play(engine: &mut CombatEngine, action: CombatAction) -> ActionOutcome {
        match engine.begin_action(action).expect("begin") {
            ActionStart::Started(_) => engine.complete_action().expect("complete"),
            ActionStart::Busy => panic!("engine unexpectedly busy"),
        }
    }

    #[test]
    fn killing_blow_with_full_lethality_kills_enemy() {
        let mut engine = engine_with(vec![
            fighter(1, Faction::Player, 30, 10, 0),
            fighter(2, Faction::Raiders, 5, 5, 0),
        ]);
        assert_eq!(engine.next_turn().unwrap().unit, UnitId(1));

        let action = attack(&engine, 1, 2);
        let outcome = play(&mut engine, action);
        let Applied::Attack(applied) = outcome.applied else {
            panic!("expected attack");
        };
        assert_eq!(applied.damage, 10);
        assert_eq!(applied.hp_after, 0);
        assert_eq!(applied.downed, Some(UnitStatus::Dead));

        let target = engine.unit(UnitId(2)).unwrap();
        assert_eq!(target.stats.hp, 0);
        assert_eq!(target.status, UnitStatus::Dead);
        assert_eq!(engine.result().metrics[&UnitId(1)].kills, 1);
        assert_eq!(engine.result().metrics[&UnitId(1)].melee.damage, 10);
    }

    #[test]
    fn victory_empties_the_scheduler() {
        let mut engine = engine_with(vec![
            fighter(1, Faction::Player, 30, 10, 0),
            fighter(2, Faction::Mutants, 5, 5, 0),
        ]);
        engine.next_turn().unwrap();
        let action = attack(&engine, 1, 2);
        let outcome = play(&mut engine, action);

        assert_eq!(outcome.status, CombatStatus::Victory);
        assert_eq!(outcome.next_turn, None);
        assert!(engine.queue().is_empty());
        assert!(matches!(
            engine.next_turn(),
            Err(EngineError::Turn(TurnError::BattleOver {
                status: CombatStatus::Victory
            }))
        ));
    }

    #[test]
    fn player_units_are_knocked_out_never_killed() {
        let mut engine = engine_with(vec![
            fighter(1, Faction::Player, 8, 5, 0),
            fighter(2, Faction::Beasts, 40, 10, 0),
        ]);
        assert_eq!(engine.next_turn().unwrap().unit, UnitId(2));
        let action = attack(&engine, 2, 1);
        play(&mut engine, action);

        let player = engine.unit(UnitId(1)).unwrap();
        assert_eq!(player.stats.hp, 0);
        assert_eq!(player.status, UnitStatus::Unconscious);
        assert_eq!(engine.status(), CombatStatus::Defeat);

        let defense = engine.result().metrics[&UnitId(1)].defense;
        assert_eq!(defense.damage_taken, 10);
        assert_eq!(defense.hits_received, 1);
        assert!(!engine.result().metrics.contains_key(&UnitId(2)));
    }

    #[test]
    fn zero_lethality_leaves_enemy_unconscious() {
        let raider = fighter(2, Faction::Raiders, 5, 5, 0);
        let mut hero = fighter(1, Faction::Player, 30, 10, 0);
        hero.equipment.melee_primary =
            Some(Weapon::melee("baton", DamageRange::fixed(10)).with_lethality(0.0));
        let mut engine = engine_with(vec![hero, raider]);

        engine.next_turn().unwrap();
        let action = attack(&engine, 1, 2);
        play(&mut engine, action);

        let report = engine.finalize().unwrap();
        assert_eq!(report.loot_eligible.len(), 1);
        assert_eq!(report.captives().count(), 1);
        assert_eq!(report.metrics[&UnitId(1)].kills, 1);
    }

    #[test]
    fn actor_is_rescheduled_with_cadence_and_delay() {
        let mut engine = engine_with(vec![
            fighter(1, Faction::Player, 30, 10, 0),
            fighter(2, Faction::Raiders, 100, 5, 0),
        ]);
        let turn = engine.next_turn().unwrap();
        assert_eq!(turn.time, TurnTime::ZERO);

        let action = attack(&engine, 1, 2);
        let outcome = play(&mut engine, action);
        // cadence 10.00 plus (100 / 10) * (10 / 10) delay
        assert_eq!(outcome.delay_points, 10);
        assert_eq!(
            outcome.next_turn,
            Some(InitiativeItem {
                unit: UnitId(1),
                time: TurnTime(2000),
            })
        );
        assert!(engine.queue().is_sorted());
        assert_eq!(engine.next_turn().unwrap().unit, UnitId(2));
        assert_eq!(engine.unit(UnitId(2)).unwrap().stats.hp, 90);
    }

    #[test]
    fn second_submission_while_in_flight_is_busy() {
        let mut engine = engine_with(vec![
            fighter(1, Faction::Player, 30, 10, 0),
            fighter(2, Faction::Raiders, 100, 5, 0),
        ]);
        engine.next_turn().unwrap();
        let action = attack(&engine, 1, 2);

        let ActionStart::Started(receipt) = engine.begin_action(action.clone()).unwrap() else {
            panic!("first submission must start");
        };
        assert_eq!(receipt.rolls.len(), 1);
        assert_eq!(engine.begin_action(action).unwrap(), ActionStart::Busy);

        // nothing applied until completion
        assert_eq!(engine.unit(UnitId(2)).unwrap().stats.hp, 100);
        assert!(matches!(
            engine.next_turn(),
            Err(EngineError::Turn(TurnError::ActionInFlight))
        ));
        assert!(matches!(
            engine.retreat(),
            Err(EngineError::Action(ActionError::InFlight))
        ));

        engine.complete_action().unwrap();
        assert!(!engine.is_action_in_flight());
        assert_eq!(engine.unit(UnitId(2)).unwrap().stats.hp, 90);
        assert!(matches!(
            engine.complete_action(),
            Err(EngineError::Action(ActionError::NothingInFlight))
        ));
    }

    #[test]
    fn illegal_or_foreign_actions_are_validation_errors() {
        let mut engine = engine_with(vec![
            fighter(1, Faction::Player, 30, 10, 0),
            fighter(2, Faction::Raiders, 100, 5, 0),
            fighter(3, Faction::Raiders, 100, 5, 3),
        ]);
        let out_of_reach = {
            let mut priced = match attack(&engine, 1, 2) {
                CombatAction::Attack(priced) => priced,
                CombatAction::Reposition { .. } => unreachable!(),
            };
            priced.target = UnitId(3);
            CombatAction::Attack(priced)
        };

        assert!(matches!(
            engine.begin_action(attack(&engine, 1, 2)),
            Err(EngineError::Action(ActionError::NoActiveTurn))
        ));
        engine.next_turn().unwrap();

        let error = engine.begin_action(out_of_reach).unwrap_err();
        assert_eq!(error.severity(), ErrorSeverity::Validation);
        assert!(matches!(
            error,
            EngineError::Action(ActionError::Illegal { .. })
        ));

        let foreign = CombatAction::Reposition {
            unit: UnitId(2),
            to: line(1),
        };
        assert!(matches!(
            engine.begin_action(foreign),
            Err(EngineError::Action(ActionError::NotActiveUnit { .. }))
        ));
        assert!(!engine.is_aborted());
        assert!(!engine.is_action_in_flight());
    }

    #[test]
    fn reposition_swaps_with_ally_on_target_line() {
        let mut engine = engine_with(vec![
            fighter(1, Faction::Player, 30, 10, 1),
            fighter(2, Faction::Player, 30, 5, 0),
            fighter(3, Faction::Raiders, 100, 1, 0),
        ]);
        engine.next_turn().unwrap();

        let outcome = play(
            &mut engine,
            CombatAction::Reposition {
                unit: UnitId(1),
                to: line(0),
            },
        );
        assert_eq!(
            outcome.applied,
            Applied::Reposition {
                unit: UnitId(1),
                from: line(1),
                to: line(0),
                swapped_with: Some(UnitId(2)),
            }
        );
        assert_eq!(outcome.delay_points, engine.config().reposition_delay);
        assert_eq!(engine.unit(UnitId(1)).unwrap().line, line(0));
        assert_eq!(engine.unit(UnitId(2)).unwrap().line, line(1));
    }

    #[test]
    fn select_weapon_requires_filled_slot() {
        let mut gunner = fighter(1, Faction::Player, 30, 10, 0);
        let rifle = Weapon::ranged("pipe rifle", DamageRange::new(4, 8), 3);
        gunner
            .equipment
            .set_weapon(WeaponSlot::RangedPrimary, Some(rifle));
        let mut engine = engine_with(vec![gunner, fighter(2, Faction::Raiders, 100, 5, 0)]);
        engine.next_turn().unwrap();

        assert!(matches!(
            engine.select_weapon(UnitId(1), WeaponSlot::RangedSecondary),
            Err(EngineError::Action(ActionError::EmptySlot { .. }))
        ));
        engine
            .select_weapon(UnitId(1), WeaponSlot::RangedPrimary)
            .unwrap();
        assert_eq!(
            engine.unit(UnitId(1)).unwrap().active_slot,
            WeaponSlot::RangedPrimary
        );
        assert!(engine.select_weapon(UnitId(2), WeaponSlot::MeleePrimary).is_err());
    }

    #[test]
    fn retreat_is_terminal_and_one_way() {
        let mut engine = engine_with(vec![
            fighter(1, Faction::Player, 30, 10, 0),
            fighter(2, Faction::Raiders, 100, 5, 0),
        ]);
        engine.next_turn().unwrap();

        assert!(engine.retreat().unwrap());
        assert_eq!(engine.status(), CombatStatus::Retreat);
        assert!(engine.queue().is_empty());
        assert_eq!(engine.current_turn(), None);
        assert!(!engine.retreat().unwrap());
        assert_eq!(engine.status(), CombatStatus::Retreat);
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut engine = engine_with(vec![
            fighter(1, Faction::Player, 30, 10, 0),
            fighter(2, Faction::Raiders, 5, 5, 0),
        ]);
        assert!(matches!(
            engine.finalize(),
            Err(EngineError::BattleNotOver(CombatStatus::Ongoing))
        ));

        engine.next_turn().unwrap();
        let action = attack(&engine, 1, 2);
        play(&mut engine, action);

        let first = engine.finalize().unwrap().clone();
        assert_eq!(first.status, CombatStatus::Victory);
        assert_eq!(first.actions, 1);
        assert_eq!(first.log.len(), 1);
        assert_eq!(first.party.len(), 1);

        let second = engine.finalize().unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(engine.report(), Some(&first));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = CombatEngine::initialize(
            vec![
                fighter(1, Faction::Player, 30, 10, 0),
                fighter(1, Faction::Raiders, 30, 10, 0),
            ],
            CombatConfig::default(),
            Arc::new(FixedRng(0)),
            0,
        );
        assert!(matches!(result, Err(EngineError::DuplicateUnit(UnitId(1)))));
    }

    #[test]
    fn empty_queue_on_ongoing_battle_aborts_engine() {
        let mut engine = engine_with(vec![
            fighter(1, Faction::Player, 30, 0, 0),
            fighter(2, Faction::Raiders, 30, 0, 0),
        ]);
        assert_eq!(engine.status(), CombatStatus::Ongoing);

        let error = engine.next_turn().unwrap_err();
        assert!(error.severity().is_fatal());
        assert!(engine.is_aborted());
        assert!(matches!(engine.next_turn(), Err(EngineError::Aborted)));
    }

    #[test]
    fn battle_without_enemies_is_won_on_arrival() {
        let engine = engine_with(vec![fighter(1, Faction::Player, 30, 10, 0)]);
        assert_eq!(engine.status(), CombatStatus::Victory);
        assert!(engine.queue().is_empty());
    }
}
