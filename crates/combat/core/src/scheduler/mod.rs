//! Initiative scheduler.
//!
//! Keeps a time-ordered queue of upcoming turns. A unit acts every
//! `100 / initiative` time units; heavier actions push its future turns later
//! through [`InitiativeQueue::apply_delay`].

mod queue;

pub use queue::{InitiativeItem, InitiativeQueue, delay_offset, turn_cadence};
