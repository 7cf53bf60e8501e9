//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the combat engine and executes battle commands.

mod simulation;

pub use simulation::{Command, SimulationWorker};
