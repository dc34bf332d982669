//! Recursive descent parser for `storage` schema stanzas
//!
//! The stanza is a JSON object that must carry a `schema` constraint:
//!
//! ```text
//! {
//!   "schema": {
//!     "wifi": { "type": "map", "values": "any" }
//!   }
//! }
//! ```
//!
//! A type descriptor is either a type name or an object with a `type`
//! field. Maps take exactly one of `values` (free-form keys) or `schema`
//! (declared keys).

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult};
use super::types::{Schema, SchemaNode};

/// Parses the text of a `storage` stanza into a [`Schema`].
pub fn parse_schema(raw: &str) -> SchemaResult<Schema> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| SchemaError::NotAMap(e.to_string()))?;

    let top = value
        .as_object()
        .ok_or_else(|| SchemaError::NotAMap(format!("expected object, got {}", json_type_name(&value))))?;

    let constraint = top
        .get("schema")
        .ok_or_else(SchemaError::missing_schema_constraint)?;

    for key in top.keys() {
        if key != "schema" {
            return Err(SchemaError::at("", format!("unknown constraint {:?}", key)));
        }
    }

    let root = parse_fields(constraint, "")?;
    Ok(Schema::new(root))
}

/// Parses a `schema` constraint: an object of key -> type descriptor.
fn parse_fields(value: &Value, path: &str) -> SchemaResult<BTreeMap<String, SchemaNode>> {
    let obj = value
        .as_object()
        .ok_or_else(|| SchemaError::at(path, "\"schema\" constraint must be a map"))?;

    if obj.is_empty() {
        return Err(SchemaError::at(path, "\"schema\" constraint must declare at least one key"));
    }

    let mut fields = BTreeMap::new();
    for (key, descriptor) in obj {
        if key.is_empty() || key.contains('.') || key.chars().any(char::is_whitespace) {
            return Err(SchemaError::at(path, format!("invalid key {:?}", key)));
        }
        let field_path = make_path(path, key);
        fields.insert(key.clone(), parse_node(descriptor, &field_path)?);
    }

    Ok(fields)
}

/// Parses a single type descriptor.
fn parse_node(value: &Value, path: &str) -> SchemaResult<SchemaNode> {
    match value {
        Value::String(name) => parse_type_name(name, path),
        Value::Object(obj) => parse_type_object(obj, path),
        other => Err(SchemaError::at(
            path,
            format!("expected type name or map, got {}", json_type_name(other)),
        )),
    }
}

fn parse_type_name(name: &str, path: &str) -> SchemaResult<SchemaNode> {
    if name == "map" {
        return Err(SchemaError::at(
            path,
            "map must have a \"values\" or \"schema\" constraint",
        ));
    }
    SchemaNode::scalar(name).ok_or_else(|| SchemaError::at(path, format!("unknown type {:?}", name)))
}

fn parse_type_object(obj: &Map<String, Value>, path: &str) -> SchemaResult<SchemaNode> {
    let type_name = match obj.get("type") {
        Some(Value::String(name)) => name.as_str(),
        Some(_) => return Err(SchemaError::at(path, "type must be a string")),
        None => return Err(SchemaError::at(path, "must have a \"type\" constraint")),
    };

    if type_name != "map" {
        let node = parse_type_name(type_name, path)?;
        reject_unknown_constraints(obj, &["type"], path)?;
        return Ok(node);
    }

    reject_unknown_constraints(obj, &["type", "values", "schema"], path)?;

    match (obj.get("values"), obj.get("schema")) {
        (Some(_), Some(_)) => Err(SchemaError::at(
            path,
            "map cannot have both \"values\" and \"schema\" constraints",
        )),
        (Some(values), None) => {
            let values_path = make_path(path, "*");
            Ok(SchemaNode::MapOf(Box::new(parse_node(values, &values_path)?)))
        }
        (None, Some(schema)) => Ok(SchemaNode::Object(parse_fields(schema, path)?)),
        (None, None) => Err(SchemaError::at(
            path,
            "map must have a \"values\" or \"schema\" constraint",
        )),
    }
}

fn reject_unknown_constraints(
    obj: &Map<String, Value>,
    allowed: &[&str],
    path: &str,
) -> SchemaResult<()> {
    match obj.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(SchemaError::at(path, format!("unknown constraint {:?}", key))),
        None => Ok(()),
    }
}

/// Creates a dotted path from prefix and key
fn make_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Returns JSON type name for error messages
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
