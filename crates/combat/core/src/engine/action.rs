//! Two-phase action protocol.

use crate::combat::{AttackForecast, AttackRollResult, forecast, resolve};
use crate::env::Dice;
use crate::metrics::CombatStatus;
use crate::scheduler::InitiativeItem;
use crate::state::{CombatUnit, Line, UnitId, WeaponSlot};

use super::apply::AttackApplied;
use super::lifecycle::BattleLogEntry;
use super::{ActionError, CombatEngine, EngineError, TurnError};

/// What the active unit does with its turn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatAction {
    /// Attack as priced by the forecaster. The engine re-prices it against
    /// live state before rolling.
    Attack(AttackForecast),
    /// Move to another line, swapping with an ally standing there. Moving to
    /// the current line holds position.
    Reposition { unit: UnitId, to: Line },
}

impl CombatAction {
    pub fn actor(&self) -> UnitId {
        match self {
            CombatAction::Attack(forecast) => forecast.attacker,
            CombatAction::Reposition { unit, .. } => *unit,
        }
    }

    /// Reposition that keeps `unit` where it stands.
    pub fn hold(unit: &CombatUnit) -> Self {
        CombatAction::Reposition {
            unit: unit.id,
            to: unit.line,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CombatAction::Attack(_) => "attack",
            CombatAction::Reposition { .. } => "reposition",
        }
    }
}

/// Accepted action, handed back so presentation can play the rolls.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionReceipt {
    pub turn: InitiativeItem,
    pub action: CombatAction,
    /// Empty for repositions.
    pub rolls: Vec<AttackRollResult>,
    pub delay_points: u32,
}

/// Answer to [`CombatEngine::begin_action`].
#[derive(Clone, Debug, PartialEq)]
pub enum ActionStart {
    Started(ActionReceipt),
    /// Another action is in flight; the request was ignored.
    Busy,
}

/// State change produced by a completed action.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Applied {
    Attack(AttackApplied),
    Reposition {
        unit: UnitId,
        from: Line,
        to: Line,
        swapped_with: Option<UnitId>,
    },
}

/// Result of [`CombatEngine::complete_action`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionOutcome {
    pub turn: InitiativeItem,
    pub applied: Applied,
    pub delay_points: u32,
    /// Where the actor's next turn landed after delay, if it has one.
    pub next_turn: Option<InitiativeItem>,
    pub status: CombatStatus,
}

pub(super) struct PendingAction {
    turn: InitiativeItem,
    action: CombatAction,
    rolls: Vec<AttackRollResult>,
    delay_points: u32,
}

impl CombatEngine {
    /// Returns true while an accepted action has not completed yet.
    pub fn is_action_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Phase one: validate, take the action lock and roll the dice.
    ///
    /// Answers [`ActionStart::Busy`] without side effects when another action
    /// holds the lock. Battle state is not mutated until
    /// [`complete_action`](Self::complete_action).
    pub fn begin_action(&mut self, action: CombatAction) -> Result<ActionStart, EngineError> {
        self.ensure_usable()?;
        if self.in_flight.is_some() {
            return Ok(ActionStart::Busy);
        }
        let started = self.start_action(action);
        let pending = self.guard(started)?;

        let receipt = ActionReceipt {
            turn: pending.turn,
            action: pending.action.clone(),
            rolls: pending.rolls.clone(),
            delay_points: pending.delay_points,
        };
        self.in_flight = Some(pending);
        Ok(ActionStart::Started(receipt))
    }

    fn start_action(&self, action: CombatAction) -> Result<PendingAction, EngineError> {
        if self.result.status.is_terminal() {
            return Err(TurnError::BattleOver {
                status: self.result.status,
            }
            .into());
        }
        let turn = self.current.ok_or(ActionError::NoActiveTurn)?;
        let actor = action.actor();
        if actor != turn.unit {
            return Err(ActionError::NotActiveUnit {
                expected: turn.unit,
                provided: actor,
            }
            .into());
        }

        match action {
            CombatAction::Attack(submitted) => {
                let attacker = self.roster_unit(actor)?;
                let target = self.unit(submitted.target)?;
                let priced = forecast(attacker, target, &self.occupancy(), &self.config).ok_or(
                    ActionError::Illegal {
                        attacker: actor,
                        target: submitted.target,
                    },
                )?;

                let mut dice = Dice::new(self.rng.as_ref(), self.seed, self.nonce, actor.0);
                let rolls = resolve(&priced, &mut dice);
                Ok(PendingAction {
                    turn,
                    delay_points: priced.delay_points,
                    action: CombatAction::Attack(priced),
                    rolls,
                })
            }
            CombatAction::Reposition { unit, to } => {
                self.roster_unit(unit)?;
                Ok(PendingAction {
                    turn,
                    action: CombatAction::Reposition { unit, to },
                    rolls: Vec::new(),
                    delay_points: self.config.reposition_delay,
                })
            }
        }
    }

    /// Phase two: apply the rolled outcome, queue the actor's next turn with
    /// the action's delay, and release the lock.
    pub fn complete_action(&mut self) -> Result<ActionOutcome, EngineError> {
        self.ensure_usable()?;
        let pending = self.in_flight.take().ok_or(ActionError::NothingInFlight)?;
        let finished = self.finish_action(pending);
        self.guard(finished)
    }

    fn finish_action(&mut self, pending: PendingAction) -> Result<ActionOutcome, EngineError> {
        let PendingAction {
            turn,
            action,
            rolls,
            delay_points,
        } = pending;

        let applied = match &action {
            CombatAction::Attack(forecast) => Applied::Attack(self.apply_attack(forecast, &rolls)?),
            CombatAction::Reposition { unit, to } => self.apply_reposition(*unit, *to)?,
        };
        self.nonce += 1;
        self.current = None;

        let next_turn = if self.result.status.is_terminal() {
            None
        } else {
            self.reschedule(turn, delay_points)?
        };

        self.log.push(BattleLogEntry::from_applied(turn.time, &applied));
        Ok(ActionOutcome {
            turn,
            applied,
            delay_points,
            next_turn,
            status: self.result.status,
        })
    }

    fn reschedule(
        &mut self,
        turn: InitiativeItem,
        delay_points: u32,
    ) -> Result<Option<InitiativeItem>, EngineError> {
        let actor = self.roster_unit(turn.unit)?;
        if !actor.is_alive() {
            return Ok(None);
        }
        let initiative = actor.stats.initiative;
        if self
            .queue
            .schedule_next_turn(turn.unit, turn.time, initiative)
            .is_none()
        {
            return Ok(None);
        }
        self.queue.apply_delay(turn.unit, delay_points, initiative);
        Ok(self
            .queue
            .iter()
            .find(|entry| entry.unit == turn.unit)
            .copied())
    }

    /// Switches the active unit's weapon slot. Free; does not end the turn.
    pub fn select_weapon(&mut self, unit: UnitId, slot: WeaponSlot) -> Result<(), EngineError> {
        self.ensure_usable()?;
        if self.in_flight.is_some() {
            return Err(ActionError::InFlight.into());
        }
        let turn = self.current.ok_or(ActionError::NoActiveTurn)?;
        if turn.unit != unit {
            return Err(ActionError::NotActiveUnit {
                expected: turn.unit,
                provided: unit,
            }
            .into());
        }
        let combatant = self.roster_unit_mut(unit)?;
        if combatant.equipment.weapon(slot).is_none() {
            return Err(ActionError::EmptySlot { unit, slot }.into());
        }
        combatant.active_slot = slot;
        Ok(())
    }

    /// Ends the battle with [`CombatStatus::Retreat`].
    ///
    /// Returns `Ok(false)` when the battle was already over. Refused while an
    /// action is in flight, because accepted actions always run to completion.
    pub fn retreat(&mut self) -> Result<bool, EngineError> {
        self.ensure_usable()?;
        if self.in_flight.is_some() {
            return Err(ActionError::InFlight.into());
        }
        if !self.conclude(CombatStatus::Retreat) {
            return Ok(false);
        }
        self.current = None;
        self.log.push(BattleLogEntry::Retreat);
        Ok(true)
    }
}
