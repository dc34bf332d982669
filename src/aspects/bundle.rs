//! Bundle assembly from the `aspects` stanza

use std::collections::BTreeMap;

use super::aspect::Aspect;
use super::errors::{AspectError, AspectResult};
use super::CompileOptions;
use crate::envelope::HeaderValue;
use crate::schema::Schema;

/// A set of named aspects compiled against one storage schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    account: String,
    name: String,
    schema: Schema,
    aspects: BTreeMap<String, Aspect>,
}

impl Bundle {
    /// Compiles every entry of the `aspects` map.
    ///
    /// Entries are compiled in sorted name order, so the error reported for
    /// a document with several invalid aspects does not depend on input
    /// order. Any failure aborts the whole bundle.
    pub fn compile(
        account: &str,
        name: &str,
        aspects: &BTreeMap<String, HeaderValue>,
        schema: Schema,
        options: &CompileOptions,
    ) -> AspectResult<Self> {
        if aspects.is_empty() {
            return Err(AspectError::NoAspects);
        }

        let compiled = aspects
            .iter()
            .map(|(aspect_name, value)| {
                Aspect::compile(aspect_name, value, &schema, options)
                    .map(|aspect| (aspect_name.clone(), aspect))
            })
            .collect::<AspectResult<BTreeMap<_, _>>>()?;

        Ok(Self {
            account: account.to_string(),
            name: name.to_string(),
            schema,
            aspects: compiled,
        })
    }

    /// Returns the account the bundle belongs to
    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the storage schema the aspects were compiled against
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Looks up an aspect by name
    pub fn aspect(&self, name: &str) -> Option<&Aspect> {
        self.aspects.get(name)
    }

    /// Returns all aspects in name order
    pub fn aspects(&self) -> impl Iterator<Item = &Aspect> {
        self.aspects.values()
    }

    pub fn len(&self) -> usize {
        self.aspects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }
}
