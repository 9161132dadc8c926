//! The randomizer facade.

use serde_json::Value;

use crate::bytes;
use crate::collection;
use crate::config::RandomizerConfig;
use crate::engine::{Engine, RetryBudget, UserEngine, UserEngineAdapter};
use crate::engines::SecureEngine;
use crate::error::RandomError;
use crate::float::{self, IntervalBoundary};
use crate::range;
use crate::serialization::{self, EngineRegistry};

/// Derives unbiased values from one exclusively used engine.
///
/// Every operation advances the engine. A randomizer must not be driven
/// from two threads at once; independent randomizers share nothing.
pub struct Randomizer {
    engine: Box<dyn Engine>,
    retry_budget: RetryBudget,
}

impl Randomizer {
    /// Creates a randomizer over the OS-backed secure engine.
    #[must_use]
    pub fn new() -> Self {
        Self::with_engine(SecureEngine)
    }

    /// Creates a randomizer that calls `engine` directly.
    #[must_use]
    pub fn with_engine<E: Engine + 'static>(engine: E) -> Self {
        Self::from_boxed(Box::new(engine))
    }

    /// Creates a randomizer over a caller-defined engine, bound through a
    /// [`UserEngineAdapter`] the randomizer owns.
    #[must_use]
    pub fn from_user_engine<U: UserEngine + 'static>(engine: U) -> Self {
        Self::with_engine(UserEngineAdapter::new(engine))
    }

    /// Creates a randomizer from configuration.
    #[must_use]
    pub fn from_config(config: &RandomizerConfig) -> Self {
        tracing::debug!(
            engine = ?config.engine,
            retry_budget = config.retry_budget,
            "building randomizer from config"
        );
        Self::from_boxed(config.engine.build()).with_retry_budget(config.retry_budget())
    }

    fn from_boxed(engine: Box<dyn Engine>) -> Self {
        Self {
            engine,
            retry_budget: RetryBudget::DEFAULT,
        }
    }

    /// Replaces the rejection budget.
    #[must_use]
    pub fn with_retry_budget(mut self, retry_budget: RetryBudget) -> Self {
        self.retry_budget = retry_budget;
        self
    }

    /// The rejection budget in use.
    #[must_use]
    pub fn retry_budget(&self) -> RetryBudget {
        self.retry_budget
    }

    /// The engine this randomizer draws from.
    #[must_use]
    pub fn engine(&self) -> &dyn Engine {
        &*self.engine
    }

    /// Consumes the randomizer, releasing its engine to the caller.
    #[must_use]
    pub fn into_engine(self) -> Box<dyn Engine> {
        self.engine
    }

    /// Returns a float in `[0, 1)`.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn next_float(&mut self) -> Result<f64, RandomError> {
        float::next_float(&mut *self.engine)
    }

    /// Returns a float from the interval `min`..`max` with the given boundary.
    ///
    /// # Errors
    ///
    /// See [`float::get_float`].
    pub fn get_float(
        &mut self,
        min: f64,
        max: f64,
        boundary: IntervalBoundary,
    ) -> Result<f64, RandomError> {
        float::get_float(&mut *self.engine, min, max, boundary, self.retry_budget)
    }

    /// Returns a non-negative integer from one raw draw with its top bit dropped.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    #[allow(clippy::cast_possible_wrap)]
    pub fn next_int(&mut self) -> Result<i64, RandomError> {
        let result = self.engine.generate()?;
        Ok((result.value() >> 1) as i64)
    }

    /// Returns an integer in `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::InvalidRange` if `max < min` and propagates
    /// engine and retry-budget failures.
    pub fn get_int(&mut self, min: i64, max: i64) -> Result<i64, RandomError> {
        range::ranged(&mut *self.engine, min, max, self.retry_budget)
    }

    /// Returns exactly `length` random bytes.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::InvalidArgument` if `length` is zero and
    /// propagates engine failures.
    pub fn get_bytes(&mut self, length: usize) -> Result<Vec<u8>, RandomError> {
        bytes::fill(&mut *self.engine, length)
    }

    /// Returns `length` bytes each chosen uniformly from `source`.
    ///
    /// # Errors
    ///
    /// See [`bytes::from_alphabet`].
    pub fn get_bytes_from_string(
        &mut self,
        source: &[u8],
        length: usize,
    ) -> Result<Vec<u8>, RandomError> {
        bytes::from_alphabet(&mut *self.engine, source, length, self.retry_budget)
    }

    /// Returns the values of `items` in a uniformly random order. The input
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// Propagates engine and retry-budget failures.
    pub fn shuffle_array<T: Clone>(&mut self, items: &[T]) -> Result<Vec<T>, RandomError> {
        let mut shuffled = items.to_vec();
        collection::shuffle(&mut *self.engine, &mut shuffled, self.retry_budget)?;
        Ok(shuffled)
    }

    /// Returns the bytes of `bytes` in a uniformly random order.
    ///
    /// # Errors
    ///
    /// Propagates engine and retry-budget failures.
    pub fn shuffle_bytes(&mut self, bytes: &[u8]) -> Result<Vec<u8>, RandomError> {
        if bytes.len() < 2 {
            return Ok(bytes.to_vec());
        }
        self.shuffle_array(bytes)
    }

    /// Picks `count` distinct keys without replacement. Always returns a
    /// list, even for a single key.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::InvalidRange` if `count` exceeds the number of
    /// keys, and propagates engine and retry-budget failures.
    pub fn pick_array_keys<K, I>(&mut self, keys: I, count: usize) -> Result<Vec<K>, RandomError>
    where
        I: IntoIterator<Item = K>,
        I::IntoIter: ExactSizeIterator,
    {
        collection::pick_keys(&mut *self.engine, keys, count, self.retry_budget)
    }

    /// Exports the randomizer as a one-member container holding its engine.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::NotSerializable` if the engine cannot export
    /// its state.
    pub fn serialize(&self) -> Result<Value, RandomError> {
        serialization::export(&*self.engine)
    }

    /// Rebuilds a randomizer from [`Randomizer::serialize`] output.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::InvalidSerialization` if the payload is
    /// malformed or names an engine `registry` cannot restore.
    pub fn unserialize(payload: &Value, registry: &EngineRegistry) -> Result<Self, RandomError> {
        serialization::import(payload, registry).map(Self::from_boxed)
    }
}

impl Default for Randomizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Randomizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Randomizer")
            .field("mode", &self.engine.mode())
            .field("retry_budget", &self.retry_budget)
            .finish_non_exhaustive()
    }
}
