//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors (`TurnError`, `ActionError`, `EngineError`) live
//! next to the code that raises them; this module holds the shared
//! classification used to decide how a caller reacts.

use crate::state::{TurnTime, UnitId};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller may try again later (e.g. action in flight)
/// - **Validation**: the request itself is illegal and should be rejected
/// - **Fatal**: a battle invariant is broken; the engine instance must stop
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Battle coordinates captured where an error was raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Unit whose turn or action triggered the error.
    pub actor: Option<UnitId>,
    /// Scheduler time of the turn being resolved.
    pub time: TurnTime,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(time: TurnTime) -> Self {
        Self {
            actor: None,
            time,
        }
    }

    #[must_use]
    pub const fn with_actor(mut self, actor: UnitId) -> Self {
        self.actor = Some(actor);
        self
    }
}

/// Uniform classification for every combat-core error.
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Stable identifier for logs and tests.
    fn error_code(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_carries_actor_and_time() {
        let context = ErrorContext::new(TurnTime(150)).with_actor(UnitId(4));
        assert_eq!(context.actor, Some(UnitId(4)));
        assert_eq!(context.time, TurnTime(150));
        assert_eq!(ErrorContext::new(TurnTime::ZERO), ErrorContext::default());
    }
}
