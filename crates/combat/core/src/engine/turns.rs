use crate::scheduler::InitiativeItem;

use super::{CombatEngine, EngineError, TurnError};

/// Turn scheduling methods for CombatEngine.
impl CombatEngine {
    /// Turn currently waiting for (or executing) an action.
    pub fn current_turn(&self) -> Option<InitiativeItem> {
        self.current
    }

    /// Returns the unit whose turn it is, popping the queue if no turn is open.
    ///
    /// Calling this again before the open turn completes returns the same
    /// turn. An empty queue, or a head entry for a unit that is no longer
    /// alive, means scheduler bookkeeping went wrong: the engine aborts.
    pub fn next_turn(&mut self) -> Result<InitiativeItem, EngineError> {
        self.ensure_usable()?;
        if self.result.status.is_terminal() {
            return Err(TurnError::BattleOver {
                status: self.result.status,
            }
            .into());
        }
        if self.in_flight.is_some() {
            return Err(TurnError::ActionInFlight.into());
        }
        if let Some(current) = self.current {
            return Ok(current);
        }

        let popped = self.pop_turn();
        let item = self.guard(popped)?;
        self.current = Some(item);
        Ok(item)
    }

    fn pop_turn(&mut self) -> Result<InitiativeItem, EngineError> {
        let item = self.queue.pop_next_turn().ok_or_else(|| TurnError::EmptyQueue {
            context: self.error_context(),
        })?;

        let unit = self.roster_unit(item.unit)?;
        if !unit.is_alive() {
            return Err(TurnError::StaleEntry {
                unit: item.unit,
                status: unit.status,
                context: self.error_context().with_actor(item.unit),
            }
            .into());
        }
        Ok(item)
    }
}
