//! Randomizer CLI error types.

use randomizer_core::RandomError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    /// A configuration variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The command line could not be understood.
    #[error("usage error: {0}")]
    Usage(String),

    /// Sampling failed.
    #[error(transparent)]
    Random(#[from] RandomError),

    /// The result could not be encoded.
    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl AppError {
    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_error",
            Self::Usage(_) => "usage_error",
            Self::Random(err) => match err {
                RandomError::InvalidArgument(_) => "invalid_argument",
                RandomError::InvalidRange(_) => "invalid_range",
                RandomError::Engine(_) => "engine_failure",
                RandomError::BrokenEngine(_) => "broken_engine",
                RandomError::EmptyInterval { .. } => "empty_interval",
                RandomError::InvalidSerialization(_) => "invalid_serialization",
                RandomError::NotSerializable(_) => "not_serializable",
            },
            Self::Output(_) => "output_error",
        }
    }

    /// Process exit status: 2 for bad invocations, 1 for everything else.
    #[must_use]
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Usage(_) => 2,
            Self::Random(_) | Self::Output(_) => 1,
        }
    }
}

/// JSON body written to stderr when a command fails.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            error: err.code(),
            message: err.to_string(),
        }
    }
}
