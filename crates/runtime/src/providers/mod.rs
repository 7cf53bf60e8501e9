//! Action provider implementations for different unit behaviors.

pub mod ai;
pub mod scripted;

pub use ai::AiProvider;
pub use scripted::ScriptedProvider;
