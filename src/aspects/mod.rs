//! Aspect rule language
//!
//! An aspect maps externally visible request paths onto internal storage
//! paths. Each rule binds a request pattern to a storage pattern through
//! named placeholders and grants an access level:
//!
//! ```text
//! request: private.{key}    storage: wifi.{key}    access: read-write
//! ```
//!
//! Compilation is pure and first-failure-wins: a bundle is either fully
//! validated or not built at all.

mod aspect;
mod bundle;
mod errors;
mod pattern;
mod rule;

pub use aspect::{Aspect, Resolution};
pub use bundle::Bundle;
pub use errors::{AspectError, AspectResult, PatternError, RuleError};
pub use pattern::{is_valid_subkey, Pattern, Segment, ShapeSegment, SUBKEY_GRAMMAR};
pub use rule::{AccessLevel, Rule};

/// Options controlling rule compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompileOptions {
    /// Resolve full storage paths against the schema instead of only the
    /// leading key
    pub strict_storage_paths: bool,
}
