//! Header block lexer
//!
//! The header block is a small indentation-based format:
//!
//! ```text
//! name: value              single line string
//! aspects:                 map, entries indented by 2
//!   wifi-setup:
//!     rules:               list, items indented by 2 and starting with '-'
//!       -
//!         request: ssid
//! storage:                 multiline text, lines indented by 4
//!     {"schema": {}}
//! ```
//!
//! Keys are unique at every level. Top-level header names are lowercase
//! alphanumerics separated by single dashes.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// A header value: text, list or map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HeaderValue {
    String(String),
    List(Vec<HeaderValue>),
    Map(BTreeMap<String, HeaderValue>),
}

impl HeaderValue {
    /// Returns the text if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the entries if this is a list value
    pub fn as_list(&self) -> Option<&[HeaderValue]> {
        match self {
            HeaderValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries if this is a map value
    pub fn as_map(&self) -> Option<&BTreeMap<String, HeaderValue>> {
        match self {
            HeaderValue::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(s: &str) -> Self {
        HeaderValue::String(s.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(s: String) -> Self {
        HeaderValue::String(s)
    }
}

/// Key-unique header set. Order is not part of the contract.
pub type Headers = BTreeMap<String, HeaderValue>;

/// Header block syntax errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderParseError {
    #[error("header entry missing ':' separator: {0:?}")]
    MissingSeparator(String),

    #[error("header entry should have a space or newline after ':': {0:?}")]
    MissingSpace(String),

    #[error("invalid header name: {0:?}")]
    InvalidName(String),

    #[error("repeated header: {0:?}")]
    Repeated(String),

    #[error("unexpected indentation: {0:?}")]
    UnexpectedIndentation(String),

    #[error("expected list item: {0:?}")]
    ExpectedListItem(String),

    #[error("header nesting exceeds {} levels: {0:?}", MAX_DEPTH)]
    TooDeep(String),

    #[error("header block is not valid utf8")]
    NotUtf8,
}

const NESTING: usize = 2;
const TEXT_NESTING: usize = 4;

/// Deepest map or list nesting accepted below the top level
pub const MAX_DEPTH: usize = 64;

fn header_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z](?:-?[a-z0-9])*$").expect("valid header name regex"))
}

/// Parses a header block into a [`Headers`] map.
pub fn parse_headers(head: &str) -> Result<Headers, HeaderParseError> {
    let mut lexer = Lexer {
        lines: head.lines().collect(),
        pos: 0,
        depth: 0,
    };
    lexer.parse_map(0)
}

struct Lexer<'a> {
    lines: Vec<&'a str>,
    pos: usize,
    depth: usize,
}

impl<'a> Lexer<'a> {
    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn parse_map(&mut self, indent: usize) -> Result<BTreeMap<String, HeaderValue>, HeaderParseError> {
        let mut map = BTreeMap::new();

        while let Some(line) = self.peek() {
            let n = leading_spaces(line);
            if n < indent {
                break;
            }
            if n > indent {
                return Err(HeaderParseError::UnexpectedIndentation(line.to_string()));
            }

            let entry = &line[indent..];
            let (key, rest) = entry
                .split_once(':')
                .ok_or_else(|| HeaderParseError::MissingSeparator(line.to_string()))?;

            let valid = if indent == 0 {
                header_name_regex().is_match(key)
            } else {
                !key.is_empty() && !key.chars().any(char::is_whitespace)
            };
            if !valid {
                return Err(HeaderParseError::InvalidName(key.to_string()));
            }
            if map.contains_key(key) {
                return Err(HeaderParseError::Repeated(key.to_string()));
            }

            self.pos += 1;
            let value = self.parse_value(rest, indent, line)?;
            map.insert(key.to_string(), value);
        }

        Ok(map)
    }

    fn parse_list(&mut self, indent: usize) -> Result<Vec<HeaderValue>, HeaderParseError> {
        let mut items = Vec::new();

        while let Some(line) = self.peek() {
            let n = leading_spaces(line);
            if n < indent {
                break;
            }
            if n > indent {
                return Err(HeaderParseError::UnexpectedIndentation(line.to_string()));
            }

            let rest = line[indent..]
                .strip_prefix('-')
                .ok_or_else(|| HeaderParseError::ExpectedListItem(line.to_string()))?;

            self.pos += 1;
            items.push(self.parse_value(rest, indent, line)?);
        }

        Ok(items)
    }

    /// Parses what follows a `key:` or `-` marker at the given indentation.
    fn parse_value(
        &mut self,
        rest: &str,
        indent: usize,
        line: &str,
    ) -> Result<HeaderValue, HeaderParseError> {
        if rest.is_empty() {
            return self.parse_nested(indent);
        }
        match rest.strip_prefix(' ') {
            Some(value) if !value.is_empty() => Ok(HeaderValue::String(value.to_string())),
            Some(_) => self.parse_nested(indent),
            None => Err(HeaderParseError::MissingSpace(line.to_string())),
        }
    }

    fn parse_nested(&mut self, indent: usize) -> Result<HeaderValue, HeaderParseError> {
        let Some(next) = self.peek() else {
            return Ok(HeaderValue::String(String::new()));
        };

        let n = leading_spaces(next);
        if n >= indent + TEXT_NESTING {
            return Ok(HeaderValue::String(self.parse_text(indent + TEXT_NESTING)));
        }
        if n == indent + NESTING {
            if self.depth == MAX_DEPTH {
                return Err(HeaderParseError::TooDeep(next.to_string()));
            }
            self.depth += 1;
            let value = if next[n..].starts_with('-') {
                self.parse_list(indent + NESTING).map(HeaderValue::List)
            } else {
                self.parse_map(indent + NESTING).map(HeaderValue::Map)
            };
            self.depth -= 1;
            return value;
        }
        if n > indent {
            return Err(HeaderParseError::UnexpectedIndentation(next.to_string()));
        }

        Ok(HeaderValue::String(String::new()))
    }

    fn parse_text(&mut self, indent: usize) -> String {
        let mut text: Vec<&str> = Vec::new();
        while let Some(line) = self.peek() {
            if leading_spaces(line) < indent {
                break;
            }
            text.push(&line[indent..]);
            self.pos += 1;
        }
        text.join("\n")
    }
}

fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> HeaderValue {
        HeaderValue::from(v)
    }

    #[test]
    fn test_simple_headers() {
        let headers = parse_headers("type: aspect-bundle\nname: my-network").unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["type"], s("aspect-bundle"));
        assert_eq!(headers["name"], s("my-network"));
    }

    #[test]
    fn test_empty_values() {
        let headers = parse_headers("account-id: \nname:\nsummary: x").unwrap();
        assert_eq!(headers["account-id"], s(""));
        assert_eq!(headers["name"], s(""));
        assert_eq!(headers["summary"], s("x"));
    }

    #[test]
    fn test_value_keeps_inner_colons() {
        let headers = parse_headers("timestamp: 2024-01-01T10:00:00Z").unwrap();
        assert_eq!(headers["timestamp"], s("2024-01-01T10:00:00Z"));
    }

    #[test]
    fn test_nested_map_and_list() {
        let head = "aspects:\n  wifi-setup:\n    rules:\n      -\n        request: ssid\n        storage: wifi.ssid\n      -\n        storage: wifi.psk\nname: x";
        let headers = parse_headers(head).unwrap();

        let aspects = headers["aspects"].as_map().unwrap();
        let rules = aspects["wifi-setup"].as_map().unwrap()["rules"]
            .as_list()
            .unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].as_map().unwrap()["request"], s("ssid"));
        assert_eq!(rules[1].as_map().unwrap()["storage"], s("wifi.psk"));
        assert_eq!(headers["name"], s("x"));
    }

    #[test]
    fn test_inline_list_items() {
        let headers = parse_headers("storage:\n  - foo\n  - bar").unwrap();
        assert_eq!(
            headers["storage"],
            HeaderValue::List(vec![s("foo"), s("bar")])
        );
    }

    #[test]
    fn test_multiline_text() {
        let head = "storage:\n    {\n      \"schema\": {}\n    }\ntimestamp: now";
        let headers = parse_headers(head).unwrap();
        assert_eq!(headers["storage"], s("{\n  \"schema\": {}\n}"));
        assert_eq!(headers["timestamp"], s("now"));
    }

    #[test]
    fn test_repeated_header() {
        let err = parse_headers("name: a\nname: b").unwrap_err();
        assert_eq!(err, HeaderParseError::Repeated("name".into()));
        assert_eq!(err.to_string(), "repeated header: \"name\"");
    }

    #[test]
    fn test_missing_separator() {
        let err = parse_headers("name a").unwrap_err();
        assert!(matches!(err, HeaderParseError::MissingSeparator(_)));
    }

    #[test]
    fn test_missing_space() {
        let err = parse_headers("name:a").unwrap_err();
        assert!(matches!(err, HeaderParseError::MissingSpace(_)));
    }

    #[test]
    fn test_invalid_top_level_name() {
        let err = parse_headers("Name: a").unwrap_err();
        assert_eq!(err, HeaderParseError::InvalidName("Name".into()));
    }

    #[test]
    fn test_unexpected_indentation() {
        let err = parse_headers("aspects:\n   odd: 1").unwrap_err();
        assert!(matches!(err, HeaderParseError::UnexpectedIndentation(_)));

        let err = parse_headers("  name: a").unwrap_err();
        assert!(matches!(err, HeaderParseError::UnexpectedIndentation(_)));
    }

    fn nested_block(levels: usize) -> String {
        let mut head = String::from("x:");
        for level in 1..=levels {
            head.push('\n');
            head.push_str(&" ".repeat(level * NESTING));
            head.push_str("k:");
        }
        head
    }

    #[test]
    fn test_nesting_limit() {
        assert!(parse_headers(&nested_block(MAX_DEPTH)).is_ok());

        let err = parse_headers(&nested_block(MAX_DEPTH + 1)).unwrap_err();
        assert!(matches!(err, HeaderParseError::TooDeep(_)));
    }

    #[test]
    fn test_very_deep_nesting_is_an_error() {
        let err = parse_headers(&nested_block(5000)).unwrap_err();
        assert!(matches!(err, HeaderParseError::TooDeep(_)));
    }

    #[test]
    fn test_map_entry_inside_list() {
        let err = parse_headers("rules:\n  - a\n  b: c").unwrap_err();
        assert!(matches!(err, HeaderParseError::ExpectedListItem(_)));
    }
}
