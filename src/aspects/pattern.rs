//! Dotted path patterns
//!
//! A pattern is a `.`-separated list of segments. A segment wrapped in
//! braces (`{key}`) is a placeholder; anything else is a literal subkey.
//! Both must follow the subkey grammar: lowercase alphanumerics and single
//! dashes, with at least one letter.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::errors::PatternError;
use crate::schema::PathKey;

/// Subkey grammar shared by literals, placeholders and aspect names
pub const SUBKEY_GRAMMAR: &str = "(?:[a-z0-9]+-?)*[a-z](?:-?[a-z0-9])*";

fn subkey_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!("^{}$", SUBKEY_GRAMMAR)).expect("valid subkey regex"))
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^\{{({})\}}$", SUBKEY_GRAMMAR)).expect("valid placeholder regex")
    })
}

/// Whether a string matches the subkey grammar
pub fn is_valid_subkey(s: &str) -> bool {
    subkey_regex().is_match(s)
}

/// One component of a pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Literal subkey
    Literal(String),
    /// Named placeholder, without braces
    Placeholder(String),
}

impl Segment {
    fn parse(raw: &str) -> Result<Self, PatternError> {
        if raw.is_empty() {
            return Err(PatternError::EmptySubkey);
        }
        if raw.starts_with('{') || raw.ends_with('}') {
            return placeholder_regex()
                .captures(raw)
                .and_then(|c| c.get(1))
                .map(|name| Segment::Placeholder(name.as_str().to_string()))
                .ok_or_else(|| PatternError::InvalidPlaceholder(raw.to_string()));
        }
        if !is_valid_subkey(raw) {
            return Err(PatternError::InvalidSubkey(raw.to_string()));
        }
        Ok(Segment::Literal(raw.to_string()))
    }

    /// Returns the placeholder name, if this is a placeholder
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Segment::Placeholder(name) => Some(name),
            Segment::Literal(_) => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(s) => write!(f, "{}", s),
            Segment::Placeholder(name) => write!(f, "{{{}}}", name),
        }
    }
}

/// A parsed request or storage pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    segments: Vec<Segment>,
}

impl Pattern {
    /// Parses a dotted pattern such as `private.{key}`.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let segments = raw
            .split('.')
            .map(Segment::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    /// Returns the segments in order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the set of placeholder names
    pub fn placeholders(&self) -> BTreeSet<&str> {
        self.segments.iter().filter_map(Segment::placeholder).collect()
    }

    /// Returns the pattern as schema path keys; placeholders match any key.
    pub fn path_keys(&self) -> Vec<PathKey<'_>> {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(s) => PathKey::Key(s),
                Segment::Placeholder(_) => PathKey::Any,
            })
            .collect()
    }

    /// Shape of the pattern with placeholders numbered by first occurrence.
    ///
    /// `{a}.{a}` and `{b}.{b}` share a shape; `{a}.{b}` does not, since a
    /// repeated placeholder binds the same key every time. Two patterns
    /// with the same shape match exactly the same paths.
    pub fn shape(&self) -> Vec<ShapeSegment> {
        let mut seen: Vec<&str> = Vec::new();
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(s) => ShapeSegment::Literal(s.clone()),
                Segment::Placeholder(name) => {
                    let index = match seen.iter().position(|n| *n == name.as_str()) {
                        Some(index) => index,
                        None => {
                            seen.push(name);
                            seen.len() - 1
                        }
                    };
                    ShapeSegment::Placeholder(index)
                }
            })
            .collect()
    }

    /// Matches a concrete path against this pattern.
    ///
    /// Returns the placeholder bindings. A placeholder repeated in the
    /// pattern must bind the same key every time.
    pub fn bind<'p>(&self, path: &[&'p str]) -> Option<BTreeMap<&str, &'p str>> {
        if path.len() != self.segments.len() {
            return None;
        }

        let mut bindings = BTreeMap::new();
        for (segment, key) in self.segments.iter().zip(path) {
            match segment {
                Segment::Literal(s) if s == key => {}
                Segment::Literal(_) => return None,
                Segment::Placeholder(name) => {
                    if let Some(prev) = bindings.insert(name.as_str(), *key) {
                        if prev != *key {
                            return None;
                        }
                    }
                }
            }
        }
        Some(bindings)
    }

    /// Renders a concrete path, substituting placeholders from `bindings`.
    pub fn render(&self, bindings: &BTreeMap<&str, &str>) -> Option<String> {
        let parts = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(s) => Some(s.as_str()),
                Segment::Placeholder(name) => bindings.get(name.as_str()).copied(),
            })
            .collect::<Option<Vec<_>>>()?;
        Some(parts.join("."))
    }
}

/// One segment of a [`Pattern::shape`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShapeSegment {
    Literal(String),
    Placeholder(usize),
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
