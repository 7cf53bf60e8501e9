//! Greedy single-turn AI for combat units.
//!
//! The policy looks one action ahead and never plans across turns:
//!
//! 1. **Ideal line**: where the active weapon wants to stand (front for
//!    melee, as far back as its range allows for ranged weapons)
//! 2. **Real forecasts**: every attack possible from the current line
//! 3. **Simulated step**: forecasts after one step towards the ideal line
//! 4. **Selection**: attack now, step, or hold
//!
//! # Core Components
//!
//! - [`AiProvider`]: [`crate::ActionProvider`] backed by the policy
//! - [`AiContext`]: the acting unit plus read-only battle state
//! - [`decide`]: the pure decision procedure

pub mod context;
pub mod policy;
pub mod provider;

pub use context::AiContext;
pub use policy::{decide, ideal_line, pick_target};
pub use provider::AiProvider;
