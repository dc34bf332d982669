//! Observable events for the assertion tooling
//!
//! Events are explicit and typed. The library itself never logs; these are
//! emitted by the CLI around each decode.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded and validated
    ConfigLoaded,

    // Decoding
    /// Decode of one input begins
    DecodeStart,
    /// Input decoded and fully validated
    AssertionAccepted,
    /// Input rejected by the decoder
    AssertionRejected,
    /// Input exceeded the configured size limit
    InputTooLarge,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DecodeStart => "DECODE_START",
            Event::AssertionAccepted => "ASSERTION_ACCEPTED",
            Event::AssertionRejected => "ASSERTION_REJECTED",
            Event::InputTooLarge => "INPUT_TOO_LARGE",
        }
    }

    /// Returns true if this event reports a rejected input
    pub fn is_rejection(&self) -> bool {
        matches!(self, Event::AssertionRejected | Event::InputTooLarge)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
