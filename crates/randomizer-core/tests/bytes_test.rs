//! Byte-string and alphabet sampling tests.

use randomizer_core::{Mt19937, RandomError, Randomizer, RetryBudget};
use randomizer_test_support::{
    ConstantEngine, FailingEngine, ScriptedRangeEngine, SequenceEngine, chi_square,
    chi_square_limit,
};

// --- get_bytes ---

#[test]
fn test_get_bytes_returns_exact_length() {
    let mut randomizer = Randomizer::with_engine(Mt19937::new(8));

    for length in [1, 3, 7, 8, 9, 16, 17, 100] {
        assert_eq!(randomizer.get_bytes(length).unwrap().len(), length);
    }
}

#[test]
fn test_get_bytes_copies_full_words_little_endian() {
    let mut randomizer = Randomizer::with_engine(SequenceEngine::new(vec![
        0x0807_0605_0403_0201,
        0x0000_0000_0000_0A09,
    ]));

    let bytes = randomizer.get_bytes(10).unwrap();

    assert_eq!(bytes, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
}

#[test]
fn test_get_bytes_peels_narrow_results() {
    let mut randomizer = Randomizer::with_engine(SequenceEngine::with_width(
        vec![0x0403_0201, 0x0807_0605, 0x0C0B_0A09],
        4,
    ));

    let bytes = randomizer.get_bytes(10).unwrap();

    assert_eq!(bytes, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
}

#[test]
fn test_get_bytes_is_reproducible_for_a_seed() {
    let mut first = Randomizer::with_engine(Mt19937::new(1234));
    let mut second = Randomizer::with_engine(Mt19937::new(1234));

    assert_eq!(first.get_bytes(33).unwrap(), second.get_bytes(33).unwrap());
}

#[test]
fn test_get_bytes_zero_length_is_invalid() {
    let mut randomizer = Randomizer::with_engine(SequenceEngine::new(vec![]));

    match randomizer.get_bytes(0).unwrap_err() {
        RandomError::InvalidArgument(msg) => assert_eq!(msg, "length must be greater than 0"),
        other => panic!("expected InvalidArgument, got {other:?}"),
    }
}

#[test]
fn test_get_bytes_propagates_engine_failure_mid_fill() {
    let mut randomizer = Randomizer::with_engine(FailingEngine::after(1));

    match randomizer.get_bytes(16).unwrap_err() {
        RandomError::Engine(msg) => assert_eq!(msg, "entropy source unavailable"),
        other => panic!("expected Engine, got {other:?}"),
    }
}

// --- get_bytes_from_string ---

#[test]
fn test_two_character_alphabet_uses_only_its_characters() {
    let mut randomizer = Randomizer::with_engine(Mt19937::new(21));

    let out = randomizer.get_bytes_from_string(b"ab", 1000).unwrap();

    assert_eq!(out.len(), 1000);
    assert!(out.iter().all(|b| *b == b'a' || *b == b'b'));
    assert!(out.contains(&b'a'));
    assert!(out.contains(&b'b'));
}

#[test]
fn test_single_character_alphabet_repeats_it() {
    let mut randomizer = Randomizer::with_engine(Mt19937::new(2));

    assert_eq!(randomizer.get_bytes_from_string(b"z", 5).unwrap(), b"zzzzz");
}

#[test]
fn test_alphabet_sampling_is_uniform() {
    let alphabet = b"0123456789";
    let mut randomizer = Randomizer::with_engine(Mt19937::new(404));
    let mut counts = [0u64; 10];

    for byte in randomizer.get_bytes_from_string(alphabet, 50_000).unwrap() {
        counts[usize::from(byte - b'0')] += 1;
    }

    assert!(chi_square(&counts) < chi_square_limit(counts.len()));
}

#[test]
fn test_alphabet_rejection_counter_resets_on_accept() {
    // "abc" masks each byte to 0..=3; 3 is rejected.
    let engine = SequenceEngine::with_width(vec![3, 3, 0, 3, 3, 1], 1);
    let mut randomizer = Randomizer::with_engine(engine).with_retry_budget(RetryBudget::new(2));

    let out = randomizer.get_bytes_from_string(b"abc", 2).unwrap();

    assert_eq!(out, b"ab");
}

#[test]
fn test_alphabet_rejections_exhaust_budget() {
    let mut randomizer = Randomizer::with_engine(ConstantEngine::new(u64::MAX, 8));

    match randomizer.get_bytes_from_string(b"abc", 4).unwrap_err() {
        RandomError::BrokenEngine(msg) => {
            assert_eq!(msg, "failed to generate an acceptable random number in 50 attempts");
        }
        other => panic!("expected BrokenEngine, got {other:?}"),
    }
}

#[test]
#[allow(clippy::cast_possible_truncation)]
fn test_large_alphabet_draws_offsets_through_engine_range() {
    let alphabet: Vec<u8> = (0..300u32).map(|i| (i % 256) as u8).collect();
    let mut randomizer = Randomizer::with_engine(ScriptedRangeEngine::new(vec![5, 299, 0]));

    let out = randomizer.get_bytes_from_string(&alphabet, 3).unwrap();

    assert_eq!(out, [5, 43, 0]);
}

#[test]
fn test_large_alphabet_rejects_out_of_range_offsets() {
    let alphabet = vec![b'x'; 300];
    let mut randomizer = Randomizer::with_engine(ScriptedRangeEngine::new(vec![300]));

    assert!(matches!(
        randomizer.get_bytes_from_string(&alphabet, 1),
        Err(RandomError::BrokenEngine(_))
    ));
}

#[test]
fn test_empty_alphabet_is_invalid() {
    let mut randomizer = Randomizer::with_engine(SequenceEngine::new(vec![]));

    match randomizer.get_bytes_from_string(b"", 4).unwrap_err() {
        RandomError::InvalidArgument(msg) => assert_eq!(msg, "source must not be empty"),
        other => panic!("expected InvalidArgument, got {other:?}"),
    }
}

#[test]
fn test_alphabet_zero_length_is_invalid() {
    let mut randomizer = Randomizer::with_engine(SequenceEngine::new(vec![]));

    assert!(matches!(
        randomizer.get_bytes_from_string(b"abc", 0),
        Err(RandomError::InvalidArgument(_))
    ));
}

#[test]
fn test_alphabet_propagates_engine_failure_mid_fill() {
    // The first draw yields eight accepted bytes; the second fails.
    let mut randomizer = Randomizer::with_engine(FailingEngine::after(1));

    match randomizer.get_bytes_from_string(b"ab", 20).unwrap_err() {
        RandomError::Engine(msg) => assert_eq!(msg, "entropy source unavailable"),
        other => panic!("expected Engine, got {other:?}"),
    }
}

#[test]
fn test_large_alphabet_propagates_engine_failure() {
    let alphabet = vec![b'x'; 300];
    let mut randomizer = Randomizer::with_engine(FailingEngine::new());

    assert!(matches!(
        randomizer.get_bytes_from_string(&alphabet, 4),
        Err(RandomError::Engine(_))
    ));
}
