//! Sampling error types.

use thiserror::Error;

/// Top-level error type for engines and samplers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RandomError {
    /// A caller-supplied argument violates the operation's contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A caller-supplied range or count is out of its domain.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// The underlying engine reported a failure while generating.
    #[error("engine failure: {0}")]
    Engine(String),

    /// The engine could not satisfy a rejection-sampling request within
    /// the retry budget, or produced output that violates its contract.
    #[error("broken random engine: {0}")]
    BrokenEngine(String),

    /// The requested float interval holds no representable value.
    #[error("the interval ({min}, {max}) is empty, there are no floats between min and max")]
    EmptyInterval {
        /// Lower bound of the request.
        min: f64,
        /// Upper bound of the request.
        max: f64,
    },

    /// A serialized payload is malformed or names a non-conforming engine.
    #[error("invalid serialization data: {0}")]
    InvalidSerialization(String),

    /// The active engine cannot export its state.
    #[error("engine is not serializable: {0}")]
    NotSerializable(String),
}
