//! CLI module for hbasta
//!
//! Offline inspection of the key encoding:
//! - encode: JSON value to tagged bytes
//! - decode: tagged bytes to JSON value
//! - bound: exclusive stop key of a prefix scan

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{execute, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
