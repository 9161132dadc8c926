//! Facade-level tests: construction, engine sharing, raw integer draws.

use std::cell::RefCell;
use std::rc::Rc;

use randomizer_core::{
    Engine, EngineConfig, EngineMode, FnEngine, Mt19937, MtMode, RandomError, Randomizer,
    RandomizerConfig, RetryBudget,
};
use randomizer_test_support::{FailingEngine, SequenceEngine};

// --- construction ---

#[test]
fn test_default_randomizer_draws_from_secure_engine() {
    let mut randomizer = Randomizer::default();

    let value = randomizer.get_int(1, 6).unwrap();
    let bytes = randomizer.get_bytes(32).unwrap();

    assert!((1..=6).contains(&value));
    assert_eq!(bytes.len(), 32);
    assert_eq!(randomizer.engine().mode(), EngineMode::Standard);
}

#[test]
fn test_from_config_builds_seeded_engine_and_budget() {
    let config = RandomizerConfig {
        engine: EngineConfig::Mt19937 {
            seed: 5489,
            mode: MtMode::Mt19937,
        },
        retry_budget: 7,
    };

    let mut randomizer = Randomizer::from_config(&config);

    assert_eq!(randomizer.retry_budget(), RetryBudget::new(7));
    // First reference output of the seed-5489 generator, top bit dropped.
    assert_eq!(randomizer.next_int().unwrap(), 3_499_211_612 >> 1);
}

#[test]
fn test_debug_output_names_mode_and_budget() {
    let randomizer = Randomizer::with_engine(Mt19937::with_mode(1, MtMode::Legacy));

    let debug = format!("{randomizer:?}");

    assert!(debug.contains("LegacyScaling"), "{debug}");
    assert!(debug.contains("retry_budget"), "{debug}");
}

// --- next_int ---

#[test]
fn test_next_int_drops_the_top_bit() {
    let mut randomizer = Randomizer::with_engine(SequenceEngine::new(vec![u64::MAX, 0, 3]));

    assert_eq!(randomizer.next_int().unwrap(), i64::MAX);
    assert_eq!(randomizer.next_int().unwrap(), 0);
    assert_eq!(randomizer.next_int().unwrap(), 1);
}

#[test]
fn test_next_int_narrow_engine_stays_below_its_width() {
    let mut randomizer = Randomizer::with_engine(Mt19937::new(10));

    for _ in 0..1000 {
        let value = randomizer.next_int().unwrap();
        assert!((0..1 << 31).contains(&value));
    }
}

#[test]
fn test_next_int_propagates_engine_failure() {
    let mut randomizer = Randomizer::with_engine(FailingEngine::new());

    assert!(matches!(
        randomizer.next_int(),
        Err(RandomError::Engine(_))
    ));
}

// --- user engines ---

#[test]
fn test_closure_engine_drives_the_randomizer() {
    let mut counter = 0u8;
    let mut randomizer = Randomizer::from_user_engine(FnEngine::new(move || {
        counter = counter.wrapping_add(1);
        Ok(vec![counter; 8])
    }));

    assert_eq!(randomizer.get_bytes(8).unwrap(), [1; 8]);
    assert_eq!(randomizer.get_bytes(8).unwrap(), [2; 8]);
}

#[test]
fn test_user_engine_error_reaches_the_caller_unchanged() {
    let mut randomizer = Randomizer::from_user_engine(FnEngine::new(|| {
        Err(RandomError::Engine("hardware token unplugged".to_owned()))
    }));

    match randomizer.get_int(0, 10).unwrap_err() {
        RandomError::Engine(msg) => assert_eq!(msg, "hardware token unplugged"),
        other => panic!("expected Engine, got {other:?}"),
    }
}

#[test]
fn test_user_engine_empty_output_is_broken_engine() {
    let mut randomizer = Randomizer::from_user_engine(FnEngine::new(|| Ok(Vec::new())));

    assert!(matches!(
        randomizer.next_float(),
        Err(RandomError::BrokenEngine(_))
    ));
}

// --- shared engines ---

#[test]
fn test_shared_engine_is_advanced_by_the_randomizer() {
    let shared = Rc::new(RefCell::new(Mt19937::new(5489)));
    let mut randomizer = Randomizer::with_engine(Rc::clone(&shared));

    randomizer.next_int().unwrap();
    let second = shared.borrow_mut().generate().unwrap().value();

    assert_eq!(second, 581_869_302);
}

#[test]
fn test_busy_shared_engine_is_an_engine_error() {
    let shared = Rc::new(RefCell::new(Mt19937::new(5489)));
    let mut randomizer = Randomizer::with_engine(Rc::clone(&shared));
    let _guard = shared.borrow_mut();

    match randomizer.get_int(0, 10).unwrap_err() {
        RandomError::Engine(msg) => assert!(msg.starts_with("engine already in use"), "{msg}"),
        other => panic!("expected Engine, got {other:?}"),
    }
    assert!(matches!(
        randomizer.next_int(),
        Err(RandomError::Engine(_))
    ));
    assert!(matches!(
        randomizer.serialize(),
        Err(RandomError::NotSerializable(_))
    ));
    assert!(format!("{randomizer:?}").contains("Standard"));
}

#[test]
fn test_shared_engine_serializes_once_released_by_caller() {
    let shared = Rc::new(RefCell::new(Mt19937::new(1)));
    let randomizer = Randomizer::with_engine(Rc::clone(&shared));

    let payload = randomizer.serialize().unwrap();

    assert_eq!(payload[0]["engine"]["algo"], "mt19937");
}

#[test]
fn test_released_randomizer_hands_back_its_engine() {
    let randomizer = Randomizer::with_engine(Mt19937::new(5489));

    let mut engine = randomizer.into_engine();

    assert_eq!(engine.generate().unwrap().value(), 3_499_211_612);
}
