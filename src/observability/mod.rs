//! Observability for the assertion tooling
//!
//! Structured logging only:
//! - one JSON object per line
//! - `event`, then `severity`, then fields sorted by key
//! - synchronous, written to stderr so stdout stays machine-readable
//!
//! The decoding library never logs. The CLI reports each decode through
//! [`log_event_with_fields`].
//!
//! # Usage
//!
//! ```ignore
//! use asserts::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::AssertionRejected, &[("code", "ASSERT_INVALID_HEADER")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Severity an event is reported at
pub fn severity_for(event: Event) -> Severity {
    if event.is_rejection() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log an event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}
