//! 32-bit Mersenne Twister engine.

use serde::{Deserialize, Serialize};

use crate::engine::{Engine, EngineMode, Generated};
use crate::error::RandomError;
use crate::serialization::EngineSnapshot;

const N: usize = 624;
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;

/// Twist variant of the Mersenne Twister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MtMode {
    /// The reference algorithm.
    #[default]
    Mt19937,
    /// The historical variant whose twist reads the low bit of the wrong
    /// word. Ranged requests against it use legacy scaling.
    Legacy,
}

/// Serialized form of an [`Mt19937`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct MtState {
    state: Vec<u32>,
    count: usize,
    mode: MtMode,
}

/// Mersenne Twister producing 4-byte outputs.
#[derive(Clone, PartialEq, Eq)]
pub struct Mt19937 {
    state: Vec<u32>,
    count: usize,
    mode: MtMode,
}

impl Mt19937 {
    /// Algorithm name used in serialized snapshots.
    pub const ALGO: &'static str = "mt19937";

    /// Seeds a reference-mode generator.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self::with_mode(seed, MtMode::Mt19937)
    }

    /// Seeds a generator in the given mode.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn with_mode(seed: u32, mode: MtMode) -> Self {
        let mut state = Vec::with_capacity(N);
        state.push(seed);
        for i in 1..N {
            let prev = state[i - 1];
            state.push(
                1_812_433_253u32
                    .wrapping_mul(prev ^ (prev >> 30))
                    .wrapping_add(i as u32),
            );
        }

        let mut engine = Self {
            state,
            count: N,
            mode,
        };
        engine.reload();
        engine
    }

    /// The twist variant in use.
    #[must_use]
    pub fn mt_mode(&self) -> MtMode {
        self.mode
    }

    /// Rebuilds an engine from the `state` member of a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::InvalidSerialization` if the state is malformed.
    pub fn restore(state: &serde_json::Value) -> Result<Self, RandomError> {
        let state: MtState = serde_json::from_value(state.clone())
            .map_err(|e| RandomError::InvalidSerialization(format!("mt19937 state: {e}")))?;
        if state.state.len() != N {
            return Err(RandomError::InvalidSerialization(format!(
                "mt19937 state must hold {N} words, got {}",
                state.state.len()
            )));
        }
        if state.count > N {
            return Err(RandomError::InvalidSerialization(format!(
                "mt19937 cursor {} is past the end of the state",
                state.count
            )));
        }

        Ok(Self {
            state: state.state,
            count: state.count,
            mode: state.mode,
        })
    }

    fn reload(&mut self) {
        let step: fn(u32, u32, u32) -> u32 = match self.mode {
            MtMode::Mt19937 => twist,
            MtMode::Legacy => twist_legacy,
        };
        let s = &mut self.state;

        for i in 0..N - M {
            s[i] = step(s[i + M], s[i], s[i + 1]);
        }
        for i in N - M..N - 1 {
            s[i] = step(s[i + M - N], s[i], s[i + 1]);
        }
        s[N - 1] = step(s[M - 1], s[N - 1], s[0]);

        self.count = 0;
    }

    fn next_u32(&mut self) -> u32 {
        if self.count >= N {
            self.reload();
        }

        let mut y = self.state[self.count];
        self.count += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^ (y >> 18)
    }
}

fn mix_bits(u: u32, v: u32) -> u32 {
    (u & 0x8000_0000) | (v & 0x7fff_ffff)
}

fn twist(m: u32, u: u32, v: u32) -> u32 {
    m ^ (mix_bits(u, v) >> 1) ^ (0u32.wrapping_sub(v & 1) & MATRIX_A)
}

fn twist_legacy(m: u32, u: u32, v: u32) -> u32 {
    m ^ (mix_bits(u, v) >> 1) ^ (0u32.wrapping_sub(u & 1) & MATRIX_A)
}

impl std::fmt::Debug for Mt19937 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mt19937")
            .field("count", &self.count)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl Engine for Mt19937 {
    fn generate(&mut self) -> Result<Generated, RandomError> {
        Ok(Generated::from_u32(self.next_u32()))
    }

    fn mode(&self) -> EngineMode {
        match self.mode {
            MtMode::Mt19937 => EngineMode::Standard,
            MtMode::Legacy => EngineMode::LegacyScaling,
        }
    }

    fn snapshot(&self) -> Option<EngineSnapshot> {
        let state = MtState {
            state: self.state.clone(),
            count: self.count,
            mode: self.mode,
        };
        serde_json::to_value(state)
            .ok()
            .map(|state| EngineSnapshot::new(Self::ALGO, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_sequence_for_default_seed() {
        let mut engine = Mt19937::new(5489);

        let first: Vec<u32> = (0..5).map(|_| engine.next_u32()).collect();

        assert_eq!(
            first,
            vec![3_499_211_612, 581_869_302, 3_890_346_734, 3_586_334_585, 545_404_204]
        );
    }

    #[test]
    fn test_outputs_are_four_bytes_wide() {
        let mut engine = Mt19937::new(1);

        assert_eq!(engine.generate().unwrap().width(), 4);
    }

    #[test]
    fn test_legacy_mode_diverges_after_first_reload() {
        let mut reference = Mt19937::new(42);
        let mut legacy = Mt19937::with_mode(42, MtMode::Legacy);

        let a: Vec<u32> = (0..N).map(|_| reference.next_u32()).collect();
        let b: Vec<u32> = (0..N).map(|_| legacy.next_u32()).collect();

        assert_ne!(a, b);
        assert_eq!(legacy.mt_mode(), MtMode::Legacy);
        assert_eq!(legacy.mode(), EngineMode::LegacyScaling);
    }

    #[test]
    fn test_snapshot_restores_identical_stream() {
        let mut original = Mt19937::new(7);
        for _ in 0..700 {
            original.next_u32();
        }

        let snapshot = original.snapshot().unwrap();
        let mut restored = Mt19937::restore(&snapshot.state).unwrap();

        assert_eq!(snapshot.algo, Mt19937::ALGO);
        for _ in 0..1000 {
            assert_eq!(original.next_u32(), restored.next_u32());
        }
    }

    #[test]
    fn test_restore_rejects_truncated_state() {
        let state = serde_json::json!({ "state": [1, 2, 3], "count": 0, "mode": "mt19937" });

        match Mt19937::restore(&state).unwrap_err() {
            RandomError::InvalidSerialization(msg) => {
                assert_eq!(msg, "mt19937 state must hold 624 words, got 3");
            }
            other => panic!("expected InvalidSerialization, got {other:?}"),
        }
    }

    #[test]
    fn test_restore_rejects_cursor_past_end() {
        let state = serde_json::json!({ "state": vec![0u32; N], "count": N + 1, "mode": "legacy" });

        assert!(matches!(
            Mt19937::restore(&state),
            Err(RandomError::InvalidSerialization(_))
        ));
    }
}
