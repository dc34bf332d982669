//! Assertion decode error types
//!
//! Error codes:
//! - ASSERT_TOO_LARGE (REJECT)
//! - ASSERT_MALFORMED_ENVELOPE (REJECT)
//! - ASSERT_INVALID_HEADER (REJECT)
//! - ASSERT_UNKNOWN_TYPE (REJECT)
//! - ASSERT_INVALID_BODY (REJECT)
//! - ASSERT_INVALID_SIGNATURE (REJECT)
//! - ASSERT_NOT_SELF_ISSUED (REJECT)
//! - ASSERT_INVALID_STANZA (REJECT)
//! - plus the schema and aspect codes, surfaced unchanged
//!
//! Every failure is terminal for the decode attempt. Rendered messages are
//! part of the compatibility contract.

use thiserror::Error;

use crate::aspects::AspectError;
use crate::envelope::EnvelopeError;
use crate::schema::SchemaError;

/// Generic header violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("{0:?} header is mandatory")]
    Mandatory(String),

    #[error("{0:?} header should not be empty")]
    Empty(String),

    #[error("{0:?} header must be a string")]
    NotString(String),

    #[error("{0:?} header must be a map")]
    NotMap(String),

    #[error("{0:?} primary key header cannot contain '/'")]
    PrimaryKeySlash(String),

    #[error("{name:?} header contains invalid characters: {value:?}")]
    InvalidCharacters { name: String, value: String },

    #[error("{name:?} header is not a RFC3339 date: {reason}")]
    NotRfc3339 { name: String, reason: String },

    #[error("{name:?} header is not an integer: {value:?}")]
    NotInteger { name: String, value: String },

    #[error("{name:?} header cannot be decoded: {reason}")]
    Undecodable { name: String, reason: String },

    #[error("{name:?} header does not have the expected bit length: {bits}")]
    WrongBitLength { name: String, bits: usize },
}

/// Type-specific assembly failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error("authority-id and account-id must match, {type_name} assertions are expected to be signed by the issuer account: {authority:?} != {account:?}")]
    AuthorityMismatch {
        type_name: &'static str,
        authority: String,
        account: String,
    },

    #[error("{0:?} stanza is mandatory")]
    StanzaMandatory(&'static str),

    #[error("invalid {0:?} schema stanza, expected schema text")]
    SchemaTextExpected(&'static str),

    #[error("invalid {stanza:?} schema stanza: {source}")]
    Schema {
        stanza: &'static str,
        source: SchemaError,
    },

    #[error(transparent)]
    Aspect(#[from] AspectError),
}

impl AssemblyError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            AssemblyError::Header(_) => "ASSERT_INVALID_HEADER",
            AssemblyError::AuthorityMismatch { .. } => "ASSERT_NOT_SELF_ISSUED",
            AssemblyError::StanzaMandatory(_) | AssemblyError::SchemaTextExpected(_) => {
                "ASSERT_INVALID_STANZA"
            }
            AssemblyError::Schema { source, .. } => source.code(),
            AssemblyError::Aspect(e) => e.code(),
        }
    }
}

/// Decode failure, rendered as a single descriptive message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssertionError {
    #[error("assertion exceeds maximum size: {size} > {max}")]
    TooLarge { size: usize, max: usize },

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("assertion: {0}")]
    Header(HeaderError),

    #[error("unknown assertion type: {0:?}")]
    UnknownType(String),

    #[error("assertion body length and declared body-length don't match: {actual} != {declared}")]
    BodyLength { actual: usize, declared: usize },

    #[error("body is not utf8")]
    BodyNotUtf8,

    #[error("assertion signature is not valid base64: {0}")]
    SignatureEncoding(String),

    #[error("assertion {type_name}: {source}")]
    Assembly {
        type_name: &'static str,
        source: AssemblyError,
    },
}

impl AssertionError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            AssertionError::TooLarge { .. } => "ASSERT_TOO_LARGE",
            AssertionError::Envelope(_) => "ASSERT_MALFORMED_ENVELOPE",
            AssertionError::Header(_) => "ASSERT_INVALID_HEADER",
            AssertionError::UnknownType(_) => "ASSERT_UNKNOWN_TYPE",
            AssertionError::BodyLength { .. } | AssertionError::BodyNotUtf8 => {
                "ASSERT_INVALID_BODY"
            }
            AssertionError::SignatureEncoding(_) => "ASSERT_INVALID_SIGNATURE",
            AssertionError::Assembly { source, .. } => source.code(),
        }
    }

    /// Returns the assertion type the failure was attributed to, if any
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            AssertionError::Assembly { type_name, .. } => Some(*type_name),
            _ => None,
        }
    }
}

/// Result type for decode operations
pub type AssertionResult<T> = Result<T, AssertionError>;
