//! Storage schema subsystem
//!
//! An aspect-bundle carries a `storage` stanza describing the shape of the
//! data its aspects map onto. The stanza is parsed once per bundle and is
//! immutable afterwards; every rule compilation borrows it read-only.
//!
//! # Design Principles
//!
//! - Fixed, small grammar (no extensibility)
//! - Tagged-union tree, matched exhaustively
//! - Errors name the offending dotted path
//! - Deterministic parsing

mod errors;
mod lookup;
mod parser;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use parser::parse_schema;
pub use types::{PathKey, Schema, SchemaNode};
