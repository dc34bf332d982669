//! Storage schema type definitions
//!
//! Supported node kinds:
//! - any: matches any value, including nested composite values
//! - string, int, number, bool: scalar leaves
//! - map with "values": free-form keys, one value type
//! - map with "schema": fixed set of declared keys

use std::collections::BTreeMap;

/// A node in the storage schema tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    /// Matches any value
    Any,
    /// UTF-8 string
    String,
    /// Integer
    Int,
    /// Any JSON number
    Number,
    /// Boolean
    Bool,
    /// Map whose keys are free-form and whose values share one type
    MapOf(Box<SchemaNode>),
    /// Map with a fixed set of declared keys
    Object(BTreeMap<String, SchemaNode>),
}

impl SchemaNode {
    /// Returns the type name as written in schema text
    pub fn type_name(&self) -> &'static str {
        match self {
            SchemaNode::Any => "any",
            SchemaNode::String => "string",
            SchemaNode::Int => "int",
            SchemaNode::Number => "number",
            SchemaNode::Bool => "bool",
            SchemaNode::MapOf(_) | SchemaNode::Object(_) => "map",
        }
    }

    /// Scalar node for a bare type name. `map` is not a scalar.
    pub fn scalar(name: &str) -> Option<Self> {
        match name {
            "any" => Some(SchemaNode::Any),
            "string" => Some(SchemaNode::String),
            "int" => Some(SchemaNode::Int),
            "number" => Some(SchemaNode::Number),
            "bool" => Some(SchemaNode::Bool),
            _ => None,
        }
    }
}

/// A key in a storage path being resolved against the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKey<'a> {
    /// Concrete key
    Key(&'a str),
    /// Placeholder standing for any key
    Any,
}

/// A parsed `storage` schema.
///
/// The root is always an object of named top-level keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    root: BTreeMap<String, SchemaNode>,
}

impl Schema {
    /// Create a schema from its top-level keys
    pub fn new(root: BTreeMap<String, SchemaNode>) -> Self {
        Self { root }
    }

    /// Returns the declared top-level keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    /// Returns the node declared for a top-level key
    pub fn get(&self, key: &str) -> Option<&SchemaNode> {
        self.root.get(key)
    }

    /// Whether a top-level key is declared
    pub fn declares(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_names() {
        assert_eq!(SchemaNode::scalar("any"), Some(SchemaNode::Any));
        assert_eq!(SchemaNode::scalar("string"), Some(SchemaNode::String));
        assert_eq!(SchemaNode::scalar("int"), Some(SchemaNode::Int));
        assert_eq!(SchemaNode::scalar("number"), Some(SchemaNode::Number));
        assert_eq!(SchemaNode::scalar("bool"), Some(SchemaNode::Bool));
        assert_eq!(SchemaNode::scalar("map"), None);
        assert_eq!(SchemaNode::scalar("float"), None);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(SchemaNode::Any.type_name(), "any");
        assert_eq!(
            SchemaNode::MapOf(Box::new(SchemaNode::Any)).type_name(),
            "map"
        );
        assert_eq!(SchemaNode::Object(BTreeMap::new()).type_name(), "map");
    }

    #[test]
    fn test_top_level_keys() {
        let mut root = BTreeMap::new();
        root.insert("wifi".to_string(), SchemaNode::Any);
        root.insert("audio".to_string(), SchemaNode::Int);
        let schema = Schema::new(root);

        assert!(schema.declares("wifi"));
        assert!(!schema.declares("network"));
        assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["audio", "wifi"]);
        assert_eq!(schema.get("audio"), Some(&SchemaNode::Int));
    }
}
