//! CLI module
//!
//! Provides command-line access to the decoder:
//! - check: validate assertions, one JSON result line per input
//! - inspect: print the aspects and rules of a bundle
//! - canonical: re-encode an assertion in canonical header order
//! - resolve: map a concrete request to its storage path

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    canonical, check, check_summary, describe, inspect, resolution, resolve, run, run_command,
};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_input, write_error, write_response};
