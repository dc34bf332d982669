//! Aspect compilation error types
//!
//! Error codes:
//! - ASSERT_INVALID_PATTERN (REJECT)
//! - ASSERT_INVALID_RULE (REJECT)
//! - ASSERT_INVALID_ASPECT (REJECT)
//! - ASSERT_EMPTY_BUNDLE (REJECT)

use thiserror::Error;

/// Pattern syntax errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("cannot have empty subkeys")]
    EmptySubkey,

    #[error("invalid subkey {0:?}")]
    InvalidSubkey(String),

    #[error("invalid placeholder {0:?}")]
    InvalidPlaceholder(String),
}

/// Errors compiling a single rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("each rule must be a map")]
    NotAMap,

    #[error("{0:?} field must be a string")]
    FieldNotString(String),

    #[error("unknown field {0:?}")]
    UnknownField(String),

    #[error("\"storage\" field is mandatory")]
    MissingStorage,

    #[error("invalid request {pattern:?}: {source}")]
    InvalidRequest {
        pattern: String,
        source: PatternError,
    },

    #[error("invalid storage {pattern:?}: {source}")]
    InvalidStorage {
        pattern: String,
        source: PatternError,
    },

    #[error("request {request:?} and storage {storage:?} have mismatched placeholders")]
    MismatchedPlaceholders { request: String, storage: String },

    #[error("expected 'access' to be one of \"read-write\", \"read\", \"write\" but was {0:?}")]
    InvalidAccess(String),

    #[error("storage path {0:?} is not declared in the storage schema")]
    UndeclaredStoragePath(String),

    #[error("request {0:?} conflicts with an earlier rule")]
    ConflictingRequest(String),
}

/// Errors compiling aspects and bundles
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AspectError {
    #[error("cannot define aspects bundle: no aspects")]
    NoAspects,

    #[error("cannot define aspect {name:?}: {reason}")]
    InvalidAspect { name: String, reason: String },

    #[error("cannot define aspect {name:?}: cannot create aspect rule: {source}")]
    Rule { name: String, source: RuleError },
}

impl AspectError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            AspectError::NoAspects => "ASSERT_EMPTY_BUNDLE",
            AspectError::InvalidAspect { .. } => "ASSERT_INVALID_ASPECT",
            AspectError::Rule { source, .. } => match source {
                RuleError::InvalidRequest { .. } | RuleError::InvalidStorage { .. } => {
                    "ASSERT_INVALID_PATTERN"
                }
                _ => "ASSERT_INVALID_RULE",
            },
        }
    }

    /// Returns the name of the aspect that failed, if any
    pub fn aspect(&self) -> Option<&str> {
        match self {
            AspectError::NoAspects => None,
            AspectError::InvalidAspect { name, .. } | AspectError::Rule { name, .. } => Some(name),
        }
    }
}

/// Result type for aspect compilation
pub type AspectResult<T> = Result<T, AspectError>;
