//! Generic header checks shared by all assertion types

use std::collections::BTreeMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use regex::Regex;

use super::errors::HeaderError;
use crate::envelope::{HeaderValue, Headers};

/// Header must be present and a string (possibly empty).
pub fn check_string<'h>(headers: &'h Headers, name: &str) -> Result<&'h str, HeaderError> {
    match headers.get(name) {
        None => Err(HeaderError::Mandatory(name.to_string())),
        Some(HeaderValue::String(s)) => Ok(s),
        Some(_) => Err(HeaderError::NotString(name.to_string())),
    }
}

/// Header must be a non-empty string.
pub fn check_not_empty_string<'h>(headers: &'h Headers, name: &str) -> Result<&'h str, HeaderError> {
    let value = check_string(headers, name)?;
    if value.is_empty() {
        return Err(HeaderError::Empty(name.to_string()));
    }
    Ok(value)
}

/// Header may be absent; if present it must be a string.
pub fn check_optional_string<'h>(
    headers: &'h Headers,
    name: &str,
) -> Result<Option<&'h str>, HeaderError> {
    match headers.get(name) {
        None => Ok(None),
        Some(HeaderValue::String(s)) => Ok(Some(s)),
        Some(_) => Err(HeaderError::NotString(name.to_string())),
    }
}

/// Primary key headers are non-empty and cannot contain '/'.
pub fn check_primary_key<'h>(headers: &'h Headers, name: &str) -> Result<&'h str, HeaderError> {
    let value = check_not_empty_string(headers, name)?;
    if value.contains('/') {
        return Err(HeaderError::PrimaryKeySlash(name.to_string()));
    }
    Ok(value)
}

/// Value must match the given grammar.
pub fn check_matches(name: &str, value: &str, grammar: &Regex) -> Result<(), HeaderError> {
    if !grammar.is_match(value) {
        return Err(HeaderError::InvalidCharacters {
            name: name.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Mandatory RFC3339 date, normalized to UTC.
pub fn check_rfc3339(headers: &Headers, name: &str) -> Result<DateTime<Utc>, HeaderError> {
    let value = check_not_empty_string(headers, name)?;
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| HeaderError::NotRfc3339 {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

/// Optional non-negative integer with a default.
pub fn check_int_with_default(headers: &Headers, name: &str, default: usize) -> Result<usize, HeaderError> {
    let Some(value) = check_optional_string(headers, name)? else {
        return Ok(default);
    };
    let not_integer = || HeaderError::NotInteger {
        name: name.to_string(),
        value: value.to_string(),
    };
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_integer());
    }
    value.parse().map_err(|_| not_integer())
}

/// Mandatory digest, URL-safe unpadded base64 of `expected_len` bytes.
pub fn check_digest(headers: &Headers, name: &str, expected_len: usize) -> Result<Vec<u8>, HeaderError> {
    let value = check_not_empty_string(headers, name)?;
    let digest = URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|e| HeaderError::Undecodable {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
    if digest.len() != expected_len {
        return Err(HeaderError::WrongBitLength {
            name: name.to_string(),
            bits: digest.len() * 8,
        });
    }
    Ok(digest)
}

/// Header may be absent; if present it must be a map.
pub fn check_map<'h>(
    headers: &'h Headers,
    name: &str,
) -> Result<Option<&'h BTreeMap<String, HeaderValue>>, HeaderError> {
    match headers.get(name) {
        None => Ok(None),
        Some(HeaderValue::Map(m)) => Ok(Some(m)),
        Some(_) => Err(HeaderError::NotMap(name.to_string())),
    }
}
