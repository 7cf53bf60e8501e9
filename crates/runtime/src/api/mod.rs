//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration and workers.

pub mod collaborators;
pub mod errors;
pub mod handle;
pub mod providers;
pub mod registry;

pub use collaborators::{GrowthCollaborator, LootCollaborator};
pub use errors::{ProviderKind, Result, RuntimeError};
pub use handle::{RuntimeHandle, Submission, TurnContext, TurnPrompt};
pub use providers::{ActionProvider, HoldPositionProvider};
pub use registry::ProviderRegistry;
