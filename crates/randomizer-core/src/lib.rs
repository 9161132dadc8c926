//! Randomizer core: pluggable random engines and derived sampling.
//!
//! A [`Randomizer`] consumes an interchangeable [`Engine`] that produces
//! fixed-width raw outputs and turns them into unbiased derived values:
//! ranged integers, interval floats, byte strings, alphabet samples,
//! shuffles and key picks. It contains no I/O beyond the OS entropy source
//! used by the default engine.

pub mod bytes;
pub mod collection;
pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod float;
pub mod randomizer;
pub mod range;
pub mod serialization;

pub use config::{EngineConfig, RandomizerConfig};
pub use engine::{
    Engine, EngineMode, FnEngine, Generated, RetryBudget, UserEngine, UserEngineAdapter,
};
pub use engines::{MtMode, Mt19937, SecureEngine};
pub use error::RandomError;
pub use float::IntervalBoundary;
pub use randomizer::Randomizer;
pub use serialization::{EngineRegistry, EngineSnapshot};
