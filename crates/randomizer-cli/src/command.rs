//! Commands understood by the `randomizer` binary.
//!
//! Each command draws once from a freshly configured [`Randomizer`] and
//! produces a single JSON value.

use std::fmt::Display;
use std::str::FromStr;

use randomizer_core::{IntervalBoundary, Randomizer, RandomizerConfig};
use serde_json::{Value, json};

use crate::error::AppError;

/// Help text printed on usage errors.
pub const USAGE: &str = "\
usage: randomizer <command> [args...]

commands:
  int MIN MAX                 integer in [MIN, MAX]
  float MIN MAX [BOUNDARY]    float; BOUNDARY is closed-open (default),
                              closed-closed, open-closed or open-open
  next-int                    non-negative integer from one raw draw
  next-float                  float in [0, 1)
  bytes LENGTH                LENGTH random bytes, hex encoded
  string ALPHABET LENGTH      LENGTH characters drawn from an ASCII ALPHABET
  shuffle ITEM...             the items in random order
  pick COUNT ITEM...          COUNT distinct items
  state                       the serialized randomizer

environment:
  RANDOMIZER_ENGINE           secure (default), mt19937 or mt19937-legacy
  RANDOMIZER_SEED             seed for the mt19937 engines
  RANDOMIZER_RETRY_BUDGET     consecutive rejections tolerated (default 50)";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Int { min: i64, max: i64 },
    Float {
        min: f64,
        max: f64,
        boundary: IntervalBoundary,
    },
    NextInt,
    NextFloat,
    Bytes { length: usize },
    String { alphabet: String, length: usize },
    Shuffle { items: Vec<String> },
    Pick { count: usize, items: Vec<String> },
    State,
}

impl Command {
    /// Parses the arguments following the program name.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Usage` for unknown commands, missing or malformed
    /// arguments, and trailing arguments a command does not take.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, AppError> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let (name, rest) = args
            .split_first()
            .ok_or_else(|| AppError::Usage("missing command".to_owned()))?;

        let command = match *name {
            "int" => Self::Int {
                min: arg(rest, 0, "MIN")?,
                max: arg(rest, 1, "MAX")?,
            },
            "float" => Self::Float {
                min: arg(rest, 0, "MIN")?,
                max: arg(rest, 1, "MAX")?,
                boundary: match rest.get(2) {
                    Some(boundary) => parse_boundary(boundary)?,
                    None => IntervalBoundary::default(),
                },
            },
            "next-int" => Self::NextInt,
            "next-float" => Self::NextFloat,
            "bytes" => Self::Bytes {
                length: arg(rest, 0, "LENGTH")?,
            },
            "string" => {
                let alphabet: String = arg(rest, 0, "ALPHABET")?;
                if !alphabet.is_ascii() {
                    return Err(AppError::Usage("ALPHABET must be ASCII".to_owned()));
                }
                Self::String {
                    alphabet,
                    length: arg(rest, 1, "LENGTH")?,
                }
            }
            "shuffle" => {
                return Ok(Self::Shuffle {
                    items: rest.iter().map(|item| (*item).to_owned()).collect(),
                });
            }
            "pick" => {
                return Ok(Self::Pick {
                    count: arg(rest, 0, "COUNT")?,
                    items: rest.iter().skip(1).map(|item| (*item).to_owned()).collect(),
                });
            }
            "state" => Self::State,
            other => return Err(AppError::Usage(format!("unknown command '{other}'"))),
        };

        let taken = command.arity();
        if rest.len() > taken {
            return Err(AppError::Usage(format!(
                "'{name}' takes at most {taken} argument(s), got {}",
                rest.len()
            )));
        }
        Ok(command)
    }

    /// The command's name on the command line.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int { .. } => "int",
            Self::Float { .. } => "float",
            Self::NextInt => "next-int",
            Self::NextFloat => "next-float",
            Self::Bytes { .. } => "bytes",
            Self::String { .. } => "string",
            Self::Shuffle { .. } => "shuffle",
            Self::Pick { .. } => "pick",
            Self::State => "state",
        }
    }

    fn arity(&self) -> usize {
        match self {
            Self::NextInt | Self::NextFloat | Self::State => 0,
            Self::Bytes { .. } => 1,
            Self::Int { .. } | Self::String { .. } => 2,
            Self::Float { .. } => 3,
            Self::Shuffle { items } => items.len(),
            Self::Pick { items, .. } => items.len() + 1,
        }
    }

    /// Runs the command against `randomizer`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Random` when sampling fails.
    pub fn run(&self, randomizer: &mut Randomizer) -> Result<Value, AppError> {
        tracing::debug!(command = self.name(), "running command");

        let value = match self {
            Self::Int { min, max } => json!(randomizer.get_int(*min, *max)?),
            Self::Float { min, max, boundary } => {
                json!(randomizer.get_float(*min, *max, *boundary)?)
            }
            Self::NextInt => json!(randomizer.next_int()?),
            Self::NextFloat => json!(randomizer.next_float()?),
            Self::Bytes { length } => json!(hex::encode(randomizer.get_bytes(*length)?)),
            Self::String { alphabet, length } => {
                let bytes = randomizer.get_bytes_from_string(alphabet.as_bytes(), *length)?;
                json!(String::from_utf8_lossy(&bytes))
            }
            Self::Shuffle { items } => json!(randomizer.shuffle_array(items)?),
            Self::Pick { count, items } => json!(randomizer.pick_array_keys(items, *count)?),
            Self::State => randomizer.serialize()?,
        };
        Ok(value)
    }
}

/// Parses `args`, builds a randomizer from `config`, runs the command and
/// returns its result as one line of JSON.
///
/// # Errors
///
/// Returns usage, sampling and encoding errors.
pub fn execute<S: AsRef<str>>(
    args: &[S],
    config: &RandomizerConfig,
) -> Result<String, AppError> {
    let command = Command::parse(args)?;
    let mut randomizer = Randomizer::from_config(config);
    let value = command.run(&mut randomizer)?;
    Ok(serde_json::to_string(&value)?)
}

fn arg<T>(args: &[&str], index: usize, name: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = args
        .get(index)
        .ok_or_else(|| AppError::Usage(format!("missing argument {name}")))?;
    raw.parse()
        .map_err(|e| AppError::Usage(format!("{name} is not valid: {e}")))
}

fn parse_boundary(raw: &str) -> Result<IntervalBoundary, AppError> {
    match raw {
        "closed-open" => Ok(IntervalBoundary::ClosedOpen),
        "closed-closed" => Ok(IntervalBoundary::ClosedClosed),
        "open-closed" => Ok(IntervalBoundary::OpenClosed),
        "open-open" => Ok(IntervalBoundary::OpenOpen),
        other => Err(AppError::Usage(format!("unknown boundary '{other}'"))),
    }
}
