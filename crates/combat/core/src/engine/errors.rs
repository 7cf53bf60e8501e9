//! Error types raised by the combat engine.

use crate::error::{CombatError, ErrorContext, ErrorSeverity};
use crate::metrics::CombatStatus;
use crate::state::{UnitId, UnitStatus, WeaponSlot};

/// Errors raised while advancing the initiative queue.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("battle already ended with {status}")]
    BattleOver { status: CombatStatus },

    #[error("an action is still in flight")]
    ActionInFlight,

    #[error("initiative queue is empty while the battle is ongoing")]
    EmptyQueue { context: ErrorContext },

    #[error("initiative queue holds an entry for {unit} whose status is {status:?}")]
    StaleEntry {
        unit: UnitId,
        status: UnitStatus,
        context: ErrorContext,
    },
}

impl CombatError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::BattleOver { .. } => ErrorSeverity::Validation,
            Self::ActionInFlight => ErrorSeverity::Recoverable,
            Self::EmptyQueue { .. } | Self::StaleEntry { .. } => ErrorSeverity::Fatal,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::EmptyQueue { context } | Self::StaleEntry { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BattleOver { .. } => "TURN_BATTLE_OVER",
            Self::ActionInFlight => "TURN_ACTION_IN_FLIGHT",
            Self::EmptyQueue { .. } => "TURN_EMPTY_QUEUE",
            Self::StaleEntry { .. } => "TURN_STALE_ENTRY",
        }
    }
}

/// Errors raised when a submitted action cannot start.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("no turn has been started")]
    NoActiveTurn,

    #[error("unit {provided} is not the active unit {expected}")]
    NotActiveUnit { expected: UnitId, provided: UnitId },

    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    #[error("{attacker} has no legal attack on {target}")]
    Illegal { attacker: UnitId, target: UnitId },

    #[error("{unit} has nothing equipped in {slot:?}")]
    EmptySlot { unit: UnitId, slot: WeaponSlot },

    #[error("no action is in flight")]
    NothingInFlight,

    #[error("an action is still in flight")]
    InFlight,
}

impl CombatError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InFlight => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoActiveTurn => "ACTION_NO_ACTIVE_TURN",
            Self::NotActiveUnit { .. } => "ACTION_NOT_ACTIVE_UNIT",
            Self::UnknownUnit(_) => "ACTION_UNKNOWN_UNIT",
            Self::Illegal { .. } => "ACTION_ILLEGAL",
            Self::EmptySlot { .. } => "ACTION_EMPTY_SLOT",
            Self::NothingInFlight => "ACTION_NOTHING_IN_FLIGHT",
            Self::InFlight => "ACTION_IN_FLIGHT",
        }
    }
}

/// Top-level error surfaced by [`CombatEngine`](super::CombatEngine).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("unit {id} is missing from the roster")]
    UnitNotFound { id: UnitId, context: ErrorContext },

    #[error("unit id {0} appears more than once in the rosters")]
    DuplicateUnit(UnitId),

    #[error("battle is still {0}")]
    BattleNotOver(CombatStatus),

    #[error("engine aborted after an invariant violation")]
    Aborted,
}

impl CombatError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Turn(error) => error.severity(),
            Self::Action(error) => error.severity(),
            Self::UnitNotFound { .. } | Self::Aborted => ErrorSeverity::Fatal,
            Self::DuplicateUnit(_) | Self::BattleNotOver(_) => ErrorSeverity::Validation,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Turn(error) => error.context(),
            Self::UnitNotFound { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Turn(error) => error.error_code(),
            Self::Action(error) => error.error_code(),
            Self::UnitNotFound { .. } => "ENGINE_UNIT_NOT_FOUND",
            Self::DuplicateUnit(_) => "ENGINE_DUPLICATE_UNIT",
            Self::BattleNotOver(_) => "ENGINE_BATTLE_NOT_OVER",
            Self::Aborted => "ENGINE_ABORTED",
        }
    }
}
