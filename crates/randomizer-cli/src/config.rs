//! Environment configuration for the CLI.

use randomizer_core::{EngineConfig, MtMode, RandomizerConfig, RetryBudget};

use crate::error::AppError;

/// Selects the engine: `secure`, `mt19937` or `mt19937-legacy`.
pub const ENGINE_VAR: &str = "RANDOMIZER_ENGINE";
/// Seed for the Mersenne Twister engines.
pub const SEED_VAR: &str = "RANDOMIZER_SEED";
/// Consecutive rejections tolerated before sampling gives up.
pub const RETRY_BUDGET_VAR: &str = "RANDOMIZER_RETRY_BUDGET";

/// Reads the randomizer configuration from the process environment.
///
/// # Errors
///
/// Returns `AppError::Config` if a variable is set to an invalid value or a
/// seeded engine is selected without a seed.
pub fn from_env() -> Result<RandomizerConfig, AppError> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Reads the randomizer configuration through `lookup`.
///
/// # Errors
///
/// Same as [`from_env`].
pub fn from_lookup<F>(lookup: F) -> Result<RandomizerConfig, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let engine = lookup(ENGINE_VAR).unwrap_or_else(|| "secure".to_owned());
    let engine = match engine.as_str() {
        "secure" => EngineConfig::Secure,
        "mt19937" => EngineConfig::Mt19937 {
            seed: seed(&lookup)?,
            mode: MtMode::Mt19937,
        },
        "mt19937-legacy" => EngineConfig::Mt19937 {
            seed: seed(&lookup)?,
            mode: MtMode::Legacy,
        },
        other => {
            return Err(AppError::Config(format!(
                "{ENGINE_VAR} must be one of secure, mt19937, mt19937-legacy, got '{other}'"
            )));
        }
    };

    let retry_budget = match lookup(RETRY_BUDGET_VAR) {
        Some(value) => value.parse().map_err(|e| {
            AppError::Config(format!("{RETRY_BUDGET_VAR} must be a valid u32: {e}"))
        })?,
        None => RetryBudget::DEFAULT.attempts(),
    };

    Ok(RandomizerConfig {
        engine,
        retry_budget,
    })
}

fn seed<F>(lookup: &F) -> Result<u32, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(SEED_VAR)
        .ok_or_else(|| AppError::Config(format!("{SEED_VAR} must be set for seeded engines")))?
        .parse()
        .map_err(|e| AppError::Config(format!("{SEED_VAR} must be a valid u32: {e}")))
}
