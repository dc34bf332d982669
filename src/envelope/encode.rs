//! Canonical header block encoding
//!
//! Produces text that [`parse_headers`](super::parse_headers) reads back
//! into an equal [`Headers`] map. Leading headers are written first in the
//! order given, the rest in sorted order.

use super::headers::{HeaderValue, Headers};

/// Encodes a header set in canonical form (no trailing newline).
pub fn encode_headers(headers: &Headers, leading: &[&str]) -> String {
    let mut out = String::with_capacity(256);

    for key in leading {
        if let Some(value) = headers.get(*key) {
            write_entry(&mut out, 0, key, value);
        }
    }
    for (key, value) in headers {
        if !leading.contains(&key.as_str()) {
            write_entry(&mut out, 0, key, value);
        }
    }

    if out.ends_with('\n') {
        out.pop();
    }
    out
}

fn write_entry(out: &mut String, indent: usize, key: &str, value: &HeaderValue) {
    push_indent(out, indent);
    out.push_str(key);
    out.push(':');
    write_value(out, indent, value);
}

fn write_item(out: &mut String, indent: usize, value: &HeaderValue) {
    push_indent(out, indent);
    out.push('-');
    write_value(out, indent, value);
}

/// Writes the part after a `key:` or `-` marker, including the newline.
fn write_value(out: &mut String, indent: usize, value: &HeaderValue) {
    match value {
        HeaderValue::String(s) if s.is_empty() => out.push('\n'),
        HeaderValue::String(s) if s.contains('\n') => {
            out.push('\n');
            for line in s.split('\n') {
                push_indent(out, indent + 4);
                out.push_str(line);
                out.push('\n');
            }
        }
        HeaderValue::String(s) => {
            out.push(' ');
            out.push_str(s);
            out.push('\n');
        }
        HeaderValue::List(items) => {
            out.push('\n');
            for item in items {
                write_item(out, indent + 2, item);
            }
        }
        HeaderValue::Map(entries) => {
            out.push('\n');
            for (key, entry) in entries {
                write_entry(out, indent + 2, key, entry);
            }
        }
    }
}

fn push_indent(out: &mut String, n: usize) {
    out.extend(std::iter::repeat(' ').take(n));
}
