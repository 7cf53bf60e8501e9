//! Async runtime around the deterministic combat engine.
//!
//! This crate wires together the action provider abstraction, the simulation
//! worker and the event bus into a cohesive runtime API. Consumers embed
//! [`Runtime`] to drive turns, subscribe to events, and interact with the
//! battle through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`providers`] ships the AI policy and a scripted provider
//! - `workers` keeps the simulation task internal to the crate
pub mod api;
pub mod events;
pub mod providers;
pub mod runtime;

mod workers;

pub use api::{
    ActionProvider, GrowthCollaborator, HoldPositionProvider, LootCollaborator, ProviderKind,
    ProviderRegistry, Result, RuntimeError, RuntimeHandle, Submission, TurnContext, TurnPrompt,
};
pub use events::{CombatEvent, Event, EventBus, LifecycleEvent, Topic, TurnEvent};
pub use providers::{AiProvider, ScriptedProvider};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig, StepOutcome};
