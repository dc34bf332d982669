//! The aspect-bundle assertion
//!
//! Header checks run in a fixed order so that the reported error is stable:
//!
//! 1. account-id present and non-empty
//! 2. account-id equals authority-id (self-issuance)
//! 3. name present and non-empty
//! 4. name grammar
//! 5. timestamp
//! 6. aspects stanza
//! 7. storage stanza
//!
//! Only then is the storage schema parsed and the bundle compiled.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::assertion::{Assertion, AssertionBase, Decoded, ASPECT_BUNDLE_TYPE};
use super::checks::{
    check_map, check_matches, check_optional_string, check_primary_key, check_rfc3339,
};
use super::decode::DecodeOptions;
use super::errors::AssemblyError;
use crate::aspects::Bundle;
use crate::envelope::HeaderValue;
use crate::schema::parse_schema;

fn bundle_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("^[a-z0-9](?:-?[a-z0-9])*$").expect("valid bundle name regex"))
}

/// A decoded, fully validated aspect-bundle assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspectBundle {
    base: AssertionBase,
    account_id: String,
    name: String,
    summary: Option<String>,
    timestamp: DateTime<Utc>,
    bundle: Bundle,
}

impl AspectBundle {
    /// Returns the account the bundle governs
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Returns the compiled bundle of aspects
    pub fn bundle(&self) -> &Bundle {
        &self.bundle
    }
}

impl Assertion for AspectBundle {
    fn base(&self) -> &AssertionBase {
        &self.base
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

pub(crate) fn assemble_aspect_bundle(
    base: AssertionBase,
    options: &DecodeOptions,
) -> Result<Decoded, AssemblyError> {
    let headers = base.headers();

    let account_id = check_primary_key(headers, "account-id")?;
    let authority_id = base.authority_id();
    if account_id != authority_id {
        return Err(AssemblyError::AuthorityMismatch {
            type_name: ASPECT_BUNDLE_TYPE.name(),
            authority: authority_id.to_string(),
            account: account_id.to_string(),
        });
    }

    let name = check_primary_key(headers, "name")?;
    check_matches("name", name, bundle_name_regex())?;

    let timestamp = check_rfc3339(headers, "timestamp")?;
    let summary = check_optional_string(headers, "summary")?;

    let aspects = check_map(headers, "aspects")?.ok_or(AssemblyError::StanzaMandatory("aspects"))?;

    let schema_text = match headers.get("storage") {
        None => return Err(AssemblyError::StanzaMandatory("storage")),
        Some(HeaderValue::String(text)) => text,
        Some(_) => return Err(AssemblyError::SchemaTextExpected("storage")),
    };
    let schema = parse_schema(schema_text).map_err(|source| AssemblyError::Schema {
        stanza: "storage",
        source,
    })?;

    let bundle = Bundle::compile(account_id, name, aspects, schema, &options.compile)?;
    let account_id = account_id.to_string();
    let name = name.to_string();
    let summary = summary.map(str::to_string);

    Ok(Decoded::AspectBundle(AspectBundle {
        base,
        account_id,
        name,
        summary,
        timestamp,
        bundle,
    }))
}
