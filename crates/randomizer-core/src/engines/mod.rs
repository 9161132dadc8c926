//! Built-in engines.

mod mt19937;
mod secure;

pub use mt19937::{MtMode, Mt19937};
pub use secure::SecureEngine;
