//! Event types for different topics.

use combat_core::{
    ActionOutcome, ActionReceipt, BattleReport, CombatStatus, TurnTime, UnitId,
};
use serde::{Deserialize, Serialize};

/// Events related to action resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CombatEvent {
    /// An action was accepted and its rolls are known. State is untouched
    /// until the matching `ActionApplied`.
    ActionStarted { receipt: ActionReceipt },

    /// The settle window elapsed and the outcome was applied.
    ActionApplied { outcome: ActionOutcome },

    /// A submitted action was refused.
    ActionRejected { actor: UnitId, error: String },
}

/// Events related to turn management (lightweight)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnEvent {
    /// Unit that will act in this turn
    pub unit: UnitId,
    /// Scheduler time of the turn
    pub time: TurnTime,
}

/// Battle-level milestones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LifecycleEvent {
    Started {
        allies: Vec<UnitId>,
        enemies: Vec<UnitId>,
        seed: u64,
    },
    Ended {
        report: Box<BattleReport>,
    },
    /// An invariant broke; the battle stops without a report.
    Aborted {
        error: String,
        status: CombatStatus,
    },
}
