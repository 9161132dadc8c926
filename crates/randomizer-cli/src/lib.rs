//! Randomizer CLI: environment configuration, command parsing and JSON
//! output for the `randomizer` binary.

pub mod command;
pub mod config;
pub mod error;
