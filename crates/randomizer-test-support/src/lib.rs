//! Shared test engines and utilities for the randomizer crates.

mod engine;
mod stats;

pub use engine::{
    ConstantEngine, CountingUserEngine, FailingEngine, ScriptedRangeEngine, SequenceEngine,
};
pub use stats::{chi_square, chi_square_limit};
