//! Assertion decoding pipeline
//!
//! bytes -> envelope -> generic checks -> type assembly
//!
//! Generic checks, in order:
//! - body-length matches the body, body is UTF-8
//! - sign-key-sha3-384 is a 384 bit digest
//! - type is known
//! - authority-id is present
//! - signature is base64
//!
//! Decoding is pure: no I/O, no shared state, no logging.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::assertion::{lookup_type, AssertionBase, Decoded};
use super::checks::{check_digest, check_int_with_default, check_not_empty_string};
use super::errors::{AssertionError, AssertionResult};
use crate::aspects::CompileOptions;
use crate::envelope::Envelope;

const SIGN_KEY_DIGEST_LEN: usize = 48;

/// Options controlling a decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    /// Reject inputs larger than this many bytes before parsing
    pub max_assertion_size: Option<usize>,
    /// Rule compilation options for types embedding aspects
    pub compile: CompileOptions,
}

/// Decodes and fully validates a serialized assertion.
pub fn decode(serialized: &[u8]) -> AssertionResult<Decoded> {
    decode_with(serialized, &DecodeOptions::default())
}

/// Decodes with explicit options.
pub fn decode_with(serialized: &[u8], options: &DecodeOptions) -> AssertionResult<Decoded> {
    if let Some(max) = options.max_assertion_size {
        if serialized.len() > max {
            return Err(AssertionError::TooLarge {
                size: serialized.len(),
                max,
            });
        }
    }

    let envelope = Envelope::split(serialized)?;
    assemble(envelope, options)
}

fn assemble(envelope: Envelope, options: &DecodeOptions) -> AssertionResult<Decoded> {
    let headers = &envelope.headers;

    let declared = check_int_with_default(headers, "body-length", 0).map_err(AssertionError::Header)?;
    if declared != envelope.body.len() {
        return Err(AssertionError::BodyLength {
            actual: envelope.body.len(),
            declared,
        });
    }
    if std::str::from_utf8(&envelope.body).is_err() {
        return Err(AssertionError::BodyNotUtf8);
    }

    check_digest(headers, "sign-key-sha3-384", SIGN_KEY_DIGEST_LEN).map_err(AssertionError::Header)?;

    let type_name = check_not_empty_string(headers, "type").map_err(AssertionError::Header)?;
    let assertion_type =
        lookup_type(type_name).ok_or_else(|| AssertionError::UnknownType(type_name.to_string()))?;

    check_not_empty_string(headers, "authority-id").map_err(AssertionError::Header)?;

    let signature_bytes = STANDARD
        .decode(trim_trailing_whitespace(&envelope.signature))
        .map_err(|e| AssertionError::SignatureEncoding(e.to_string()))?;

    let base = AssertionBase::new(assertion_type, envelope, signature_bytes);
    assertion_type
        .assemble(base, options)
        .map_err(|source| AssertionError::Assembly {
            type_name: assertion_type.name(),
            source,
        })
}

fn trim_trailing_whitespace(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    &bytes[..end]
}
