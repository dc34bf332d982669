//! Assertion decoding and validation
//!
//! An assertion is a header block, an optional body and a signature. This
//! module splits the bytes, runs the generic header checks and hands the
//! result to the assembler registered for the declared type.
//!
//! # Design Principles
//!
//! - First failure wins, one error per decode
//! - No partially validated assertion is ever returned
//! - Error messages are stable and part of the contract
//! - Decoding is pure and safe to call concurrently

mod aspect_bundle;
mod assertion;
mod checks;
mod decode;
mod errors;

pub use aspect_bundle::AspectBundle;
pub use assertion::{
    lookup_type, Assertion, AssertionBase, AssertionType, Decoded, ASPECT_BUNDLE_TYPE,
};
pub use decode::{decode, decode_with, DecodeOptions};
pub use errors::{AssemblyError, AssertionError, AssertionResult, HeaderError};
