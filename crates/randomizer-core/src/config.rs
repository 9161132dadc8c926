//! Randomizer configuration.

use serde::{Deserialize, Serialize};

use crate::engine::{Engine, RetryBudget};
use crate::engines::{MtMode, Mt19937, SecureEngine};

/// Which engine a configured randomizer starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineConfig {
    /// The OS-backed secure engine.
    #[default]
    Secure,
    /// A seeded Mersenne Twister.
    Mt19937 {
        /// Seed for the state initialization.
        seed: u32,
        /// Twist variant.
        #[serde(default)]
        mode: MtMode,
    },
}

impl EngineConfig {
    /// Instantiates the configured engine.
    #[must_use]
    pub fn build(self) -> Box<dyn Engine> {
        match self {
            Self::Secure => Box::new(SecureEngine),
            Self::Mt19937 { seed, mode } => Box::new(Mt19937::with_mode(seed, mode)),
        }
    }
}

/// Settings for building a [`crate::Randomizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomizerConfig {
    /// Engine to start with.
    pub engine: EngineConfig,
    /// Consecutive rejections tolerated before a sampler gives up.
    pub retry_budget: u32,
}

impl RandomizerConfig {
    /// The retry budget as its typed form.
    #[must_use]
    pub fn retry_budget(&self) -> RetryBudget {
        RetryBudget::new(self.retry_budget)
    }
}

impl Default for RandomizerConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            retry_budget: RetryBudget::DEFAULT.attempts(),
        }
    }
}
