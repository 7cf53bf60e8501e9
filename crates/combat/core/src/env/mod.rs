//! Injected services the rules consult but do not own.
//!
//! Randomness is the only such service today: every roll goes through an
//! [`RngOracle`] so that tests and replays can supply their own source.

mod rng;

pub use rng::{Dice, FixedRng, PcgRng, RngOracle, SequenceRng, compute_seed};
