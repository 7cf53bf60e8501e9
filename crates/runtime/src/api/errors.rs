//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, the combat engine, action
//! providers and collaborators so clients can bubble them up with consistent
//! context.
use std::fmt;

use combat_core::{CombatError, EngineError, ErrorSeverity, UnitId};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("{kind} action provider not set")]
    ProviderNotSet { kind: ProviderKind },

    #[error("action provider failed for {unit}: {message}")]
    Provider { unit: UnitId, message: String },

    #[error("{name} collaborator failed: {message}")]
    Collaborator { name: &'static str, message: String },

    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires at least one unit before building")]
    EmptyRoster,
}

impl RuntimeError {
    /// Severity of the underlying engine error; runtime plumbing failures are
    /// always fatal.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Engine(error) => error.severity(),
            RuntimeError::Provider { .. } | RuntimeError::Collaborator { .. } => {
                ErrorSeverity::Recoverable
            }
            RuntimeError::ProviderNotSet { .. } | RuntimeError::EmptyRoster => {
                ErrorSeverity::Validation
            }
            _ => ErrorSeverity::Fatal,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.severity() == ErrorSeverity::Validation
    }
}

/// Who decides the actions of a unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Human input through an external UI.
    Player,
    /// Built-in greedy tactical policy.
    Ai,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderKind::Player => "player",
            ProviderKind::Ai => "ai",
        };
        write!(f, "{}", label)
    }
}
