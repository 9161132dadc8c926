//! Randomizer serialization.
//!
//! A serialized randomizer is a one-element JSON array holding the
//! randomizer's members, of which there is exactly one:
//!
//! ```json
//! [{ "engine": { "algo": "mt19937", "state": { ... } } }]
//! ```
//!
//! Restoring resolves `algo` through an [`EngineRegistry`], so only engines
//! the caller registered can come back to life.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::{Engine, UserEngine, UserEngineAdapter};
use crate::engines::Mt19937;
use crate::error::RandomError;

const ENGINE_MEMBER: &str = "engine";

/// Exported engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSnapshot {
    /// Registered algorithm name.
    pub algo: String,
    /// Algorithm-specific state.
    pub state: Value,
}

impl EngineSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub fn new(algo: impl Into<String>, state: Value) -> Self {
        Self {
            algo: algo.into(),
            state,
        }
    }
}

type EngineFactory = Box<dyn Fn(&Value) -> Result<Box<dyn Engine>, RandomError>>;

/// Maps algorithm names to functions that rebuild engines from their state.
pub struct EngineRegistry {
    factories: HashMap<String, EngineFactory>,
}

impl EngineRegistry {
    /// A registry that knows no engines.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry that knows the serializable built-in engines.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(Mt19937::ALGO, |state| {
            Ok(Box::new(Mt19937::restore(state)?) as Box<dyn Engine>)
        });
        registry
    }

    /// Registers a factory for an engine implementing [`Engine`] directly.
    pub fn register<F>(&mut self, algo: impl Into<String>, factory: F)
    where
        F: Fn(&Value) -> Result<Box<dyn Engine>, RandomError> + 'static,
    {
        self.factories.insert(algo.into(), Box::new(factory));
    }

    /// Registers a factory for a [`UserEngine`]. Restored engines are bound
    /// through a fresh [`UserEngineAdapter`], exactly as at construction.
    pub fn register_user<U, F>(&mut self, algo: impl Into<String>, factory: F)
    where
        U: UserEngine + 'static,
        F: Fn(&Value) -> Result<U, RandomError> + 'static,
    {
        self.register(algo, move |state| {
            Ok(Box::new(UserEngineAdapter::new(factory(state)?)) as Box<dyn Engine>)
        });
    }

    /// Whether `algo` can be restored.
    #[must_use]
    pub fn contains(&self, algo: &str) -> bool {
        self.factories.contains_key(algo)
    }

    /// Rebuilds an engine from its snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::InvalidSerialization` if the algorithm is not
    /// registered or its factory rejects the state.
    pub fn restore(&self, snapshot: &EngineSnapshot) -> Result<Box<dyn Engine>, RandomError> {
        let factory = self.factories.get(&snapshot.algo).ok_or_else(|| {
            RandomError::InvalidSerialization(format!(
                "engine algorithm '{}' is not registered",
                snapshot.algo
            ))
        })?;

        factory(&snapshot.state).map_err(|e| match e {
            RandomError::InvalidSerialization(_) => e,
            other => RandomError::InvalidSerialization(other.to_string()),
        })
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut algos: Vec<&String> = self.factories.keys().collect();
        algos.sort();
        f.debug_struct("EngineRegistry")
            .field("algos", &algos)
            .finish()
    }
}

/// Exports an engine into the one-member container.
///
/// # Errors
///
/// Returns `RandomError::NotSerializable` if the engine has no snapshot.
pub(crate) fn export(engine: &dyn Engine) -> Result<Value, RandomError> {
    let snapshot = engine.snapshot().ok_or_else(|| {
        RandomError::NotSerializable("the active engine does not export its state".to_owned())
    })?;
    let snapshot = serde_json::to_value(snapshot)
        .map_err(|e| RandomError::NotSerializable(format!("engine snapshot: {e}")))?;

    let mut members = serde_json::Map::new();
    members.insert(ENGINE_MEMBER.to_owned(), snapshot);
    Ok(Value::Array(vec![Value::Object(members)]))
}

/// Validates the container and restores its engine.
///
/// # Errors
///
/// Returns `RandomError::InvalidSerialization` for any malformed payload.
pub(crate) fn import(
    payload: &Value,
    registry: &EngineRegistry,
) -> Result<Box<dyn Engine>, RandomError> {
    let invalid = |reason: &str| RandomError::InvalidSerialization(reason.to_owned());

    let fields = payload
        .as_array()
        .ok_or_else(|| invalid("payload must be an array"))?;
    if fields.len() != 1 {
        return Err(RandomError::InvalidSerialization(format!(
            "payload must hold exactly 1 field, got {}",
            fields.len()
        )));
    }

    let members = fields[0]
        .as_object()
        .ok_or_else(|| invalid("members must be an object"))?;
    if let Some(unknown) = members.keys().find(|key| *key != ENGINE_MEMBER) {
        return Err(RandomError::InvalidSerialization(format!(
            "unexpected member '{unknown}'"
        )));
    }

    let engine = members
        .get(ENGINE_MEMBER)
        .ok_or_else(|| invalid("missing engine member"))?;
    let snapshot: EngineSnapshot = serde_json::from_value(engine.clone())
        .map_err(|e| RandomError::InvalidSerialization(format!("engine is not an engine: {e}")))?;

    tracing::debug!(algo = %snapshot.algo, "restoring engine");
    registry.restore(&snapshot)
}
