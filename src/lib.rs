//! asserts - decoding and validation of aspect-bundle assertions
//!
//! An aspect-bundle is a signed assertion declaring a storage schema and a
//! set of aspects: named rule lists that map request paths onto storage
//! paths with an access level. Decoding either yields a fully validated,
//! immutable [`asserts::AspectBundle`] or a single descriptive error.
//!
//! Layers, bottom-up:
//! - `envelope`: header block lexer, body and signature split
//! - `schema`: storage schema parser and path lookup
//! - `aspects`: patterns, rules, aspects and bundles
//! - `asserts`: generic header checks and typed assembly
//! - `cli`, `observability`: command-line front-end and its logging

pub mod aspects;
pub mod asserts;
pub mod cli;
pub mod envelope;
pub mod observability;
pub mod schema;
