//! Storage path resolution against a parsed schema
//!
//! Resolution semantics:
//! - `any` accepts every sub-path and governs the leaf
//! - a map with `values` accepts any key
//! - a map with `schema` accepts only declared keys
//! - scalars have no sub-paths
//!
//! A placeholder key matches any declared key; the first declared key (in
//! sorted order) under which the rest of the path resolves wins.

use super::types::{PathKey, Schema, SchemaNode};

impl Schema {
    /// Resolves a storage path and returns the node governing its leaf.
    ///
    /// Returns `None` when the path is not addressable under this schema.
    pub fn lookup(&self, path: &[PathKey<'_>]) -> Option<&SchemaNode> {
        let (head, rest) = path.split_first()?;
        match head {
            PathKey::Key(key) => self.get(key).and_then(|node| resolve(node, rest)),
            PathKey::Any => self.root_nodes().find_map(|node| resolve(node, rest)),
        }
    }

    /// Resolves a plain dotted path such as `wifi.ssid`.
    pub fn lookup_dotted(&self, path: &str) -> Option<&SchemaNode> {
        let keys: Vec<PathKey<'_>> = path.split('.').map(PathKey::Key).collect();
        self.lookup(&keys)
    }

    fn root_nodes(&self) -> impl Iterator<Item = &SchemaNode> {
        self.keys().filter_map(move |key| self.get(key))
    }
}

fn resolve<'s>(node: &'s SchemaNode, path: &[PathKey<'_>]) -> Option<&'s SchemaNode> {
    let Some((head, rest)) = path.split_first() else {
        return Some(node);
    };

    match node {
        SchemaNode::Any => Some(node),
        SchemaNode::MapOf(values) => resolve(values, rest),
        SchemaNode::Object(fields) => match head {
            PathKey::Key(key) => fields.get(*key).and_then(|child| resolve(child, rest)),
            PathKey::Any => fields.values().find_map(|child| resolve(child, rest)),
        },
        SchemaNode::String | SchemaNode::Int | SchemaNode::Number | SchemaNode::Bool => None,
    }
}
