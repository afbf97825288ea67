//! Imports bank transaction exports into a monthly budget workbook.
//!
//! The pipeline runs strictly forward: `import::locate_newest` finds the export,
//! `import::parse` reads it, `import::clean` normalizes, rewrites and categorizes the rows, and
//! `ledger::insert_transactions` appends the new ones to a `ledger::Ledger`.

pub mod args;
pub mod commands;
mod config;
mod error;
pub mod import;
pub mod ledger;
pub mod model;
mod utils;

#[cfg(test)]
mod test;

pub use config::Config;
pub use error::{Error, ImportError, Result};
