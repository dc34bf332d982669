//! Generic assertion model and the type registry

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha384};

use super::aspect_bundle::{assemble_aspect_bundle, AspectBundle};
use super::decode::DecodeOptions;
use super::errors::AssemblyError;
use crate::envelope::{encode_headers, Envelope, HeaderValue, Headers};

/// Assembles a typed assertion from a generically validated base
pub type Assembler = fn(AssertionBase, &DecodeOptions) -> Result<Decoded, AssemblyError>;

/// Describes a known assertion type
pub struct AssertionType {
    name: &'static str,
    primary_key: &'static [&'static str],
    assembler: Assembler,
}

impl AssertionType {
    /// Returns the type name used in the `type` header
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the headers forming the primary key, in order
    pub fn primary_key(&self) -> &'static [&'static str] {
        self.primary_key
    }

    pub(crate) fn assemble(
        &'static self,
        base: AssertionBase,
        options: &DecodeOptions,
    ) -> Result<Decoded, AssemblyError> {
        (self.assembler)(base, options)
    }
}

impl fmt::Debug for AssertionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssertionType")
            .field("name", &self.name)
            .field("primary_key", &self.primary_key)
            .finish()
    }
}

impl PartialEq for AssertionType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for AssertionType {}

/// The aspect-bundle assertion type
pub static ASPECT_BUNDLE_TYPE: AssertionType = AssertionType {
    name: "aspect-bundle",
    primary_key: &["account-id", "name"],
    assembler: assemble_aspect_bundle,
};

static TYPES: &[&AssertionType] = &[&ASPECT_BUNDLE_TYPE];

/// Looks up a known assertion type by name
pub fn lookup_type(name: &str) -> Option<&'static AssertionType> {
    TYPES.iter().copied().find(|t| t.name == name)
}

/// Headers, body and signature of an assertion that passed the generic
/// envelope checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionBase {
    assertion_type: &'static AssertionType,
    headers: Headers,
    body: Vec<u8>,
    content: Vec<u8>,
    signature: Vec<u8>,
    signature_bytes: Vec<u8>,
}

impl AssertionBase {
    pub(crate) fn new(
        assertion_type: &'static AssertionType,
        envelope: Envelope,
        signature_bytes: Vec<u8>,
    ) -> Self {
        Self {
            assertion_type,
            headers: envelope.headers,
            body: envelope.body,
            content: envelope.content,
            signature: envelope.signature,
            signature_bytes,
        }
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the issuing authority; checked non-empty before assembly
    pub fn authority_id(&self) -> &str {
        self.headers
            .get("authority-id")
            .and_then(HeaderValue::as_str)
            .unwrap_or_default()
    }
}

/// Read access shared by every decoded assertion
pub trait Assertion: fmt::Debug + Send + Sync {
    /// Returns the generic part of the assertion
    fn base(&self) -> &AssertionBase;

    /// Returns the signing timestamp
    fn timestamp(&self) -> DateTime<Utc>;

    fn assertion_type(&self) -> &'static AssertionType {
        self.base().assertion_type
    }

    fn headers(&self) -> &Headers {
        self.base().headers()
    }

    fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers().get(name)
    }

    fn header_string(&self, name: &str) -> Option<&str> {
        self.header(name).and_then(HeaderValue::as_str)
    }

    fn authority_id(&self) -> &str {
        self.base().authority_id()
    }

    fn body(&self) -> &[u8] {
        &self.base().body
    }

    /// Returns the signed content (headers and body)
    fn content(&self) -> &[u8] {
        &self.base().content
    }

    /// Returns the signature block as encoded in the assertion
    fn signature(&self) -> &[u8] {
        &self.base().signature
    }

    /// Returns the decoded signature bytes
    fn signature_bytes(&self) -> &[u8] {
        &self.base().signature_bytes
    }

    /// Returns the primary key values in type order
    fn primary_key(&self) -> Vec<&str> {
        self.assertion_type()
            .primary_key()
            .iter()
            .map(|key| self.header_string(key).unwrap_or_default())
            .collect()
    }

    /// Re-encodes the assertion with headers in canonical order.
    fn canonical_bytes(&self) -> Vec<u8> {
        let head = encode_headers(self.headers(), &["type", "authority-id"]);
        Envelope::join(&head, self.body(), self.signature())
    }

    /// SHA-384 of the signed content, URL-safe unpadded base64
    fn content_digest(&self) -> String {
        URL_SAFE_NO_PAD.encode(Sha384::digest(self.content()))
    }
}

/// A successfully decoded, typed assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    AspectBundle(AspectBundle),
}

impl Decoded {
    /// Returns the generic view of the assertion
    pub fn as_assertion(&self) -> &dyn Assertion {
        match self {
            Decoded::AspectBundle(a) => a,
        }
    }

    pub fn as_aspect_bundle(&self) -> Option<&AspectBundle> {
        match self {
            Decoded::AspectBundle(a) => Some(a),
        }
    }

    pub fn into_aspect_bundle(self) -> Option<AspectBundle> {
        match self {
            Decoded::AspectBundle(a) => Some(a),
        }
    }
}
