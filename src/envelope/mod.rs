//! Assertion envelope: header block, body and signature
//!
//! Layout:
//!
//! ```text
//! <headers>\n\n[<body>\n\n]<signature>
//! ```
//!
//! The content/signature split is at the last blank line. Inside the
//! content, the first blank line separates headers from the body.

mod encode;
mod headers;

pub use encode::encode_headers;
pub use headers::{parse_headers, HeaderParseError, HeaderValue, Headers};

use thiserror::Error;

/// Envelope-level errors (malformed byte structure)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("assertion content/signature separator not found")]
    SeparatorNotFound,

    #[error("parsing assertion headers: {0}")]
    Headers(#[from] HeaderParseError),

    #[error("empty assertion signature")]
    EmptySignature,
}

const NLNL: &[u8] = b"\n\n";

/// A split assertion, headers parsed, nothing validated yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Parsed header block
    pub headers: Headers,
    /// Body bytes, empty when absent
    pub body: Vec<u8>,
    /// Signed content: headers plus optional body
    pub content: Vec<u8>,
    /// Signature block as found in the input
    pub signature: Vec<u8>,
}

impl Envelope {
    /// Splits serialized assertion bytes into their parts.
    pub fn split(serialized: &[u8]) -> Result<Self, EnvelopeError> {
        let split = rfind(serialized, NLNL).ok_or(EnvelopeError::SeparatorNotFound)?;
        let content = &serialized[..split];
        let signature = &serialized[split + NLNL.len()..];

        let (head, body) = match find(content, NLNL) {
            Some(i) => (&content[..i], &content[i + NLNL.len()..]),
            None => (content, &[][..]),
        };

        let head = std::str::from_utf8(head).map_err(|_| HeaderParseError::NotUtf8)?;
        let headers = parse_headers(head)?;

        if signature.is_empty() {
            return Err(EnvelopeError::EmptySignature);
        }

        Ok(Self {
            headers,
            body: body.to_vec(),
            content: content.to_vec(),
            signature: signature.to_vec(),
        })
    }

    /// Serializes parts back into envelope layout.
    pub fn join(head: &str, body: &[u8], signature: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(head.len() + body.len() + signature.len() + 4);
        out.extend_from_slice(head.as_bytes());
        if !body.is_empty() {
            out.extend_from_slice(NLNL);
            out.extend_from_slice(body);
        }
        out.extend_from_slice(NLNL);
        out.extend_from_slice(signature);
        out
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}
