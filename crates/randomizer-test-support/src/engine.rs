//! Deterministic and failing `Engine` implementations for tests.

use randomizer_core::{Engine, EngineSnapshot, Generated, RandomError, RetryBudget, UserEngine};

/// An engine that returns values from a predetermined sequence. Panics if the
/// sequence is exhausted. Used in tests that need specific, repeatable raw
/// outputs.
#[derive(Debug, Clone)]
pub struct SequenceEngine {
    values: Vec<u64>,
    width: usize,
    index: usize,
}

impl SequenceEngine {
    /// Create a new `SequenceEngine` emitting full 64-bit results.
    #[must_use]
    pub fn new(values: Vec<u64>) -> Self {
        Self::with_width(values, 8)
    }

    /// Create a new `SequenceEngine` whose results are `width` bytes wide.
    #[must_use]
    pub fn with_width(values: Vec<u64>, width: usize) -> Self {
        Self {
            values,
            width,
            index: 0,
        }
    }

    /// Number of results generated so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.index
    }
}

impl Engine for SequenceEngine {
    fn generate(&mut self) -> Result<Generated, RandomError> {
        let value = self.values[self.index];
        self.index += 1;
        Generated::new(value, self.width)
    }
}

/// An engine that returns the same value forever. Useful for forcing
/// rejection-budget exhaustion.
#[derive(Debug, Clone, Copy)]
pub struct ConstantEngine {
    value: u64,
    width: usize,
}

impl ConstantEngine {
    /// Create a new `ConstantEngine` emitting `value` with the given width.
    #[must_use]
    pub fn new(value: u64, width: usize) -> Self {
        Self { value, width }
    }
}

impl Engine for ConstantEngine {
    fn generate(&mut self) -> Result<Generated, RandomError> {
        Generated::new(self.value, self.width)
    }
}

/// An engine that succeeds a fixed number of times and then always fails.
/// Useful for testing error-propagation paths.
#[derive(Debug, Clone, Copy)]
pub struct FailingEngine {
    remaining: usize,
}

impl FailingEngine {
    /// Create an engine that fails on its first call.
    #[must_use]
    pub fn new() -> Self {
        Self::after(0)
    }

    /// Create an engine that returns `successes` all-ones results before failing.
    #[must_use]
    pub fn after(successes: usize) -> Self {
        Self {
            remaining: successes,
        }
    }
}

impl Default for FailingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for FailingEngine {
    fn generate(&mut self) -> Result<Generated, RandomError> {
        if self.remaining == 0 {
            return Err(RandomError::Engine("entropy source unavailable".into()));
        }
        self.remaining -= 1;
        Ok(Generated::from_u64(u64::MAX))
    }
}

/// An engine with a native ranged sampler that returns values from a
/// predetermined sequence, ignoring the requested bounds. Panics if the
/// sequence is exhausted. `generate` always returns zero.
#[derive(Debug, Clone)]
pub struct ScriptedRangeEngine {
    values: Vec<i64>,
    index: usize,
}

impl ScriptedRangeEngine {
    /// Create a new `ScriptedRangeEngine` with the given range results.
    #[must_use]
    pub fn new(values: Vec<i64>) -> Self {
        Self { values, index: 0 }
    }

    /// Number of ranged draws made so far.
    #[must_use]
    pub fn range_calls(&self) -> usize {
        self.index
    }
}

impl Engine for ScriptedRangeEngine {
    fn generate(&mut self) -> Result<Generated, RandomError> {
        Ok(Generated::from_u64(0))
    }

    fn range(&mut self, _min: i64, _max: i64, _budget: RetryBudget) -> Result<i64, RandomError> {
        let val = self.values[self.index];
        self.index += 1;
        Ok(val)
    }
}

/// A user engine that emits an incrementing little-endian counter of a fixed
/// byte length and can be snapshotted and restored under `"counting"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountingUserEngine {
    next: u64,
    length: usize,
}

impl CountingUserEngine {
    /// Algorithm name used in snapshots.
    pub const ALGO: &'static str = "counting";

    /// Create a new counter starting at `start` emitting `length`-byte strings.
    #[must_use]
    pub fn new(start: u64, length: usize) -> Self {
        Self {
            next: start,
            length,
        }
    }

    /// Restores a counter from its snapshot state.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::InvalidSerialization` if the state is malformed.
    pub fn restore(state: &serde_json::Value) -> Result<Self, RandomError> {
        let next = state["next"]
            .as_u64()
            .ok_or_else(|| RandomError::InvalidSerialization("counting: missing next".into()))?;
        let length = state["length"]
            .as_u64()
            .and_then(|length| usize::try_from(length).ok())
            .ok_or_else(|| RandomError::InvalidSerialization("counting: missing length".into()))?;
        Ok(Self { next, length })
    }
}

impl UserEngine for CountingUserEngine {
    fn generate(&mut self) -> Result<Vec<u8>, RandomError> {
        let mut bytes = self.next.to_le_bytes().to_vec();
        bytes.resize(self.length, 0);
        self.next = self.next.wrapping_add(1);
        Ok(bytes)
    }

    fn snapshot(&self) -> Option<EngineSnapshot> {
        Some(EngineSnapshot::new(
            Self::ALGO,
            serde_json::json!({ "next": self.next, "length": self.length }),
        ))
    }
}
