//! End-to-end command tests over seeded configurations.

use randomizer_cli::command::{self, Command};
use randomizer_cli::error::AppError;
use randomizer_core::{
    EngineConfig, IntervalBoundary, MtMode, Mt19937, RandomError, Randomizer, RandomizerConfig,
};
use serde_json::Value;

fn seeded_config(seed: u32) -> RandomizerConfig {
    RandomizerConfig {
        engine: EngineConfig::Mt19937 {
            seed,
            mode: MtMode::Mt19937,
        },
        ..RandomizerConfig::default()
    }
}

fn run(args: &[&str], seed: u32) -> Value {
    let line = command::execute(args, &seeded_config(seed)).unwrap();
    serde_json::from_str(&line).unwrap()
}

// --- parsing ---

#[test]
fn test_parse_int_command() {
    let command = Command::parse(&["int", "-5", "5"]).unwrap();

    assert_eq!(command, Command::Int { min: -5, max: 5 });
    assert_eq!(command.name(), "int");
}

#[test]
fn test_parse_float_defaults_to_closed_open() {
    let command = Command::parse(&["float", "0", "1"]).unwrap();

    assert_eq!(
        command,
        Command::Float {
            min: 0.0,
            max: 1.0,
            boundary: IntervalBoundary::ClosedOpen
        }
    );
}

#[test]
fn test_parse_pick_collects_items() {
    let command = Command::parse(&["pick", "2", "a", "b", "c"]).unwrap();

    assert_eq!(
        command,
        Command::Pick {
            count: 2,
            items: vec!["a".to_owned(), "b".to_owned(), "c".to_owned()]
        }
    );
}

#[test]
fn test_parse_rejects_bad_invocations() {
    let cases: [&[&str]; 6] = [
        &[],
        &["roll"],
        &["int", "1"],
        &["int", "one", "2"],
        &["next-int", "extra"],
        &["string", "äö", "3"],
    ];

    for args in cases {
        match Command::parse(args).unwrap_err() {
            AppError::Usage(_) => {}
            other => panic!("expected Usage for {args:?}, got {other:?}"),
        }
    }
}

// --- execution ---

#[test]
fn test_int_command_matches_library_draw() {
    let mut expected = Randomizer::with_engine(Mt19937::new(77));

    let value = run(&["int", "1", "100"], 77);

    assert_eq!(value, expected.get_int(1, 100).unwrap());
}

#[test]
fn test_float_command_respects_boundary() {
    let value = run(&["float", "2", "3", "open-open"], 8).as_f64().unwrap();

    assert!(2.0 < value && value < 3.0);
}

#[test]
fn test_bytes_command_prints_hex() {
    let mut expected = Randomizer::with_engine(Mt19937::new(3));

    let value = run(&["bytes", "6"], 3);

    let encoded = value.as_str().unwrap();
    assert_eq!(encoded.len(), 12);
    assert_eq!(encoded, hex::encode(expected.get_bytes(6).unwrap()));
}

#[test]
fn test_string_command_uses_alphabet() {
    let value = run(&["string", "xyz", "20"], 3);

    let text = value.as_str().unwrap();
    assert_eq!(text.len(), 20);
    assert!(text.chars().all(|c| "xyz".contains(c)));
}

#[test]
fn test_shuffle_command_keeps_items() {
    let value = run(&["shuffle", "a", "b", "c", "d"], 12);

    let mut items: Vec<String> = serde_json::from_value(value).unwrap();
    items.sort();
    assert_eq!(items, ["a", "b", "c", "d"]);
}

#[test]
fn test_pick_command_returns_count_items() {
    let value = run(&["pick", "2", "a", "b", "c", "d"], 12);

    assert_eq!(value.as_array().unwrap().len(), 2);
}

#[test]
fn test_state_command_prints_restorable_payload() {
    let value = run(&["state"], 5489);

    assert_eq!(value[0]["engine"]["algo"], "mt19937");
}

#[test]
fn test_state_command_on_secure_engine_fails() {
    let result = command::execute(&["state"], &RandomizerConfig::default());

    assert!(matches!(
        result,
        Err(AppError::Random(RandomError::NotSerializable(_)))
    ));
}

#[test]
fn test_sampling_errors_surface_as_random_errors() {
    let result = command::execute(&["int", "5", "1"], &seeded_config(1));

    match result.unwrap_err() {
        err @ AppError::Random(RandomError::InvalidRange(_)) => {
            assert_eq!(err.code(), "invalid_range");
        }
        other => panic!("expected InvalidRange, got {other:?}"),
    }
}
