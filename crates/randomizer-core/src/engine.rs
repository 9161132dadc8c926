//! Engine capability abstraction.
//!
//! An engine is anything that produces fixed-width raw outputs. Built-in
//! engines implement [`Engine`] directly. Caller-defined engines that only
//! know how to emit byte strings implement [`UserEngine`] and are bound
//! through a [`UserEngineAdapter`].

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::RandomError;
use crate::range;
use crate::serialization::EngineSnapshot;

/// One raw engine output together with the number of valid bytes in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generated {
    value: u64,
    width: usize,
}

impl Generated {
    /// Creates a result holding the low `width` bytes of `value`.
    ///
    /// Bytes beyond `width` are cleared so consumers never observe them.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::BrokenEngine` if `width` is not in `1..=8`.
    pub fn new(value: u64, width: usize) -> Result<Self, RandomError> {
        if !(1..=8).contains(&width) {
            return Err(RandomError::BrokenEngine(format!(
                "engine result width must be between 1 and 8 bytes, got {width}"
            )));
        }
        let value = if width == 8 {
            value
        } else {
            value & ((1u64 << (width * 8)) - 1)
        };
        Ok(Self { value, width })
    }

    /// A full 64-bit result.
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Self { value, width: 8 }
    }

    /// A 32-bit result.
    #[must_use]
    pub fn from_u32(value: u32) -> Self {
        Self {
            value: u64::from(value),
            width: 4,
        }
    }

    /// The raw value; only the low `width` bytes can be non-zero.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Number of valid bytes, in `1..=8`.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }
}

/// Selects how ranged integer requests are mapped onto raw outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineMode {
    /// Exact uniform sampling through rejection.
    #[default]
    Standard,
    /// Historical floating-point scaling kept for output compatibility with
    /// the legacy Mersenne Twister. Intentionally biased.
    LegacyScaling,
}

/// Upper bound on consecutive rejected draws before a sampler gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget(u32);

impl RetryBudget {
    /// The budget used when none is configured.
    pub const DEFAULT: Self = Self(50);

    /// Creates a budget allowing `attempts` consecutive rejections.
    #[must_use]
    pub const fn new(attempts: u32) -> Self {
        Self(attempts)
    }

    /// Number of consecutive rejections tolerated.
    #[must_use]
    pub const fn attempts(self) -> u32 {
        self.0
    }

    /// Records a rejection. Fails once `failures` exceeds the budget.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::BrokenEngine` when the budget is exhausted.
    pub fn reject(self, failures: &mut u32) -> Result<(), RandomError> {
        *failures += 1;
        if *failures > self.0 {
            tracing::warn!(attempts = self.0, "rejection budget exhausted");
            return Err(RandomError::BrokenEngine(format!(
                "failed to generate an acceptable random number in {} attempts",
                self.0
            )));
        }
        Ok(())
    }
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A source of fixed-width raw random outputs.
///
/// Engines advance their internal state on every call and must not retry
/// internally; retry policy belongs to the samplers.
pub trait Engine {
    /// Produces the next raw output.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::Engine` when the source fails.
    fn generate(&mut self) -> Result<Generated, RandomError>;

    /// Returns a uniformly distributed integer in `[min, max]`.
    ///
    /// Engines with a native ranged sampler override this; the default
    /// synthesizes it from repeated [`Engine::generate`] calls.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::InvalidRange` if `max < min`, and propagates
    /// engine and retry-budget failures.
    fn range(&mut self, min: i64, max: i64, budget: RetryBudget) -> Result<i64, RandomError> {
        range::uniform(self, min, max, budget)
    }

    /// The scaling mode ranged integer requests must use.
    fn mode(&self) -> EngineMode {
        EngineMode::Standard
    }

    /// Exports the engine state, or `None` if the engine cannot be restored.
    fn snapshot(&self) -> Option<EngineSnapshot> {
        None
    }
}

/// Shared handle: the caller keeps using the same engine the randomizer draws from.
///
/// While the caller holds a mutable borrow, draws fail with
/// `RandomError::Engine`, `mode` reports `Standard` and there is no snapshot.
impl<E: Engine + ?Sized> Engine for Rc<RefCell<E>> {
    fn generate(&mut self) -> Result<Generated, RandomError> {
        self.try_borrow_mut()
            .map_err(|e| RandomError::Engine(format!("engine already in use: {e}")))?
            .generate()
    }

    fn range(&mut self, min: i64, max: i64, budget: RetryBudget) -> Result<i64, RandomError> {
        self.try_borrow_mut()
            .map_err(|e| RandomError::Engine(format!("engine already in use: {e}")))?
            .range(min, max, budget)
    }

    fn mode(&self) -> EngineMode {
        self.try_borrow()
            .map_or(EngineMode::Standard, |engine| engine.mode())
    }

    fn snapshot(&self) -> Option<EngineSnapshot> {
        self.try_borrow().ok().and_then(|engine| engine.snapshot())
    }
}

/// A caller-defined engine that emits little-endian byte strings.
pub trait UserEngine {
    /// Produces the next byte string. Only the first eight bytes are used.
    ///
    /// # Errors
    ///
    /// Any error is propagated unchanged to the sampling caller.
    fn generate(&mut self) -> Result<Vec<u8>, RandomError>;

    /// Exports the engine state, or `None` if it cannot be restored.
    fn snapshot(&self) -> Option<EngineSnapshot> {
        None
    }
}

/// Binds a [`UserEngine`] to the [`Engine`] capability.
#[derive(Debug, Clone)]
pub struct UserEngineAdapter<U> {
    inner: U,
}

impl<U: UserEngine> UserEngineAdapter<U> {
    /// Wraps a user engine.
    #[must_use]
    pub fn new(inner: U) -> Self {
        Self { inner }
    }

    /// Borrows the wrapped user engine.
    #[must_use]
    pub fn get_ref(&self) -> &U {
        &self.inner
    }

    /// Unwraps the user engine.
    #[must_use]
    pub fn into_inner(self) -> U {
        self.inner
    }
}

impl<U: UserEngine> Engine for UserEngineAdapter<U> {
    fn generate(&mut self) -> Result<Generated, RandomError> {
        let bytes = self.inner.generate()?;
        if bytes.is_empty() {
            return Err(RandomError::BrokenEngine(
                "a random engine must return a non-empty byte string".to_owned(),
            ));
        }

        let width = bytes.len().min(8);
        let value = bytes[..width]
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, byte)| acc | (u64::from(*byte) << (8 * i)));
        Generated::new(value, width)
    }

    fn snapshot(&self) -> Option<EngineSnapshot> {
        self.inner.snapshot()
    }
}

/// A user engine backed by a closure.
pub struct FnEngine<F>(F);

impl<F> FnEngine<F>
where
    F: FnMut() -> Result<Vec<u8>, RandomError>,
{
    /// Uses `generate` as the engine's single operation.
    pub fn new(generate: F) -> Self {
        Self(generate)
    }
}

impl<F> std::fmt::Debug for FnEngine<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnEngine").finish_non_exhaustive()
    }
}

impl<F> UserEngine for FnEngine<F>
where
    F: FnMut() -> Result<Vec<u8>, RandomError>,
{
    fn generate(&mut self) -> Result<Vec<u8>, RandomError> {
        (self.0)()
    }
}
