//! asserts CLI entry point
//!
//! Parses arguments, dispatches to the CLI module, prints the error on
//! stderr and exits non-zero on failure.

use asserts::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
