//! OS-backed secure engine.

use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::engine::{Engine, Generated};
use crate::error::RandomError;

/// Engine that reads every output from the operating system's CSPRNG.
///
/// It keeps no state of its own and therefore cannot be serialized.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureEngine;

impl Engine for SecureEngine {
    fn generate(&mut self) -> Result<Generated, RandomError> {
        OsRng
            .try_next_u64()
            .map(Generated::from_u64)
            .map_err(|e| RandomError::Engine(format!("OS entropy source failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_engine_emits_full_width_results() {
        let mut engine = SecureEngine;

        let result = engine.generate().unwrap();

        assert_eq!(result.width(), 8);
    }

    #[test]
    fn test_secure_engine_has_no_snapshot() {
        assert!(SecureEngine.snapshot().is_none());
    }
}
