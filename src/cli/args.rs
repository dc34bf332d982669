//! CLI argument definitions using clap
//!
//! Commands:
//! - asserts check <files...> [--config <path>]
//! - asserts inspect <file> [--config <path>]
//! - asserts canonical <file> [--config <path>]
//! - asserts resolve <file> <aspect> <request> [--config <path>]
//!
//! A file argument of `-` reads from stdin.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Decode and validate aspect-bundle assertions
#[derive(Parser, Debug)]
#[command(name = "asserts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one or more assertions, one result line per input
    Check {
        /// Assertion files (`-` for stdin)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Decode an assertion and print its aspects and rules
    Inspect {
        /// Assertion file (`-` for stdin)
        file: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Decode an assertion and print it re-encoded in canonical header order
    Canonical {
        /// Assertion file (`-` for stdin)
        file: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Resolve a concrete request through one aspect of a bundle
    Resolve {
        /// Assertion file (`-` for stdin)
        file: PathBuf,

        /// Aspect name
        aspect: String,

        /// Dotted request path, e.g. `private.home`
        request: String,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_many() {
        let cli = Cli::try_parse_from(["asserts", "check", "a.assert", "-", "--config", "c.json"])
            .unwrap();
        match cli.command {
            Command::Check { files, config } => {
                assert_eq!(files, vec![PathBuf::from("a.assert"), PathBuf::from("-")]);
                assert_eq!(config, Some(PathBuf::from("c.json")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_check_requires_files() {
        assert!(Cli::try_parse_from(["asserts", "check"]).is_err());
    }

    #[test]
    fn test_parse_resolve() {
        let cli =
            Cli::try_parse_from(["asserts", "resolve", "-", "wifi-setup", "private.home"]).unwrap();
        match cli.command {
            Command::Resolve {
                file,
                aspect,
                request,
                config,
            } => {
                assert_eq!(file, PathBuf::from("-"));
                assert_eq!(aspect, "wifi-setup");
                assert_eq!(request, "private.home");
                assert!(config.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_inspect_without_config() {
        let cli = Cli::try_parse_from(["asserts", "inspect", "bundle.assert"]).unwrap();
        match cli.command {
            Command::Inspect { file, config } => {
                assert_eq!(file, PathBuf::from("bundle.assert"));
                assert!(config.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
