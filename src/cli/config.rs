//! CLI configuration
//!
//! Loaded from a JSON file. Every field is optional; a missing `--config`
//! means defaults.
//!
//! ```json
//! {
//!   "max_assertion_size": 65536,
//!   "strict_storage_paths": false,
//!   "log_events": true
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::aspects::CompileOptions;
use crate::asserts::DecodeOptions;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Inputs larger than this are rejected before decoding (default 64KiB)
    #[serde(default = "default_max_assertion_size")]
    pub max_assertion_size: usize,

    /// Require every rule storage path to resolve in the storage schema
    #[serde(default)]
    pub strict_storage_paths: bool,

    /// Emit structured log lines on stderr
    #[serde(default = "default_log_events")]
    pub log_events: bool,
}

fn default_max_assertion_size() -> usize {
    65536
}
fn default_log_events() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_assertion_size: default_max_assertion_size(),
            strict_storage_paths: false,
            log_events: default_log_events(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from the given path, or defaults when none was given
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.max_assertion_size == 0 {
            return Err(CliError::config_error("max_assertion_size must be > 0"));
        }

        Ok(())
    }

    /// Decoder options derived from this configuration
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            max_assertion_size: Some(self.max_assertion_size),
            compile: CompileOptions {
                strict_storage_paths: self.strict_storage_paths,
            },
        }
    }
}
