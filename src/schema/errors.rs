//! Storage schema error types
//!
//! Error codes:
//! - ASSERT_SCHEMA_NOT_A_MAP (REJECT)
//! - ASSERT_SCHEMA_INVALID (REJECT)
//!
//! Message text is part of the compatibility contract and is rendered
//! verbatim inside assertion errors.

use thiserror::Error;

/// Errors produced while parsing a `storage` schema stanza.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Stanza text is not a JSON object
    #[error("cannot parse top level schema as map: {0}")]
    NotAMap(String),

    /// Top level object is structurally invalid
    #[error("cannot parse top level schema: {0}")]
    TopLevel(String),

    /// A nested type descriptor is invalid
    #[error("cannot parse \"{path}\" schema: {reason}")]
    Node {
        /// Dotted path of the offending descriptor
        path: String,
        /// What is wrong with it
        reason: String,
    },
}

impl SchemaError {
    /// Top level object without a `schema` key
    pub fn missing_schema_constraint() -> Self {
        SchemaError::TopLevel("must have a \"schema\" constraint".into())
    }

    /// Error at a dotted path; an empty path refers to the top level.
    pub fn at(path: &str, reason: impl Into<String>) -> Self {
        if path.is_empty() {
            SchemaError::TopLevel(reason.into())
        } else {
            SchemaError::Node {
                path: path.to_string(),
                reason: reason.into(),
            }
        }
    }

    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::NotAMap(_) => "ASSERT_SCHEMA_NOT_A_MAP",
            SchemaError::TopLevel(_) | SchemaError::Node { .. } => "ASSERT_SCHEMA_INVALID",
        }
    }

    /// Returns the dotted path the error refers to, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            SchemaError::Node { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
