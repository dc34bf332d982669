//! Aspect compilation and request resolution

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use super::errors::{AspectError, AspectResult, RuleError};
use super::pattern::SUBKEY_GRAMMAR;
use super::rule::{AccessLevel, Rule};
use super::CompileOptions;
use crate::envelope::HeaderValue;
use crate::schema::Schema;

fn aspect_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!("^{}$", SUBKEY_GRAMMAR)).expect("valid aspect name regex"))
}

/// A named, ordered list of rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aspect {
    name: String,
    rules: Vec<Rule>,
}

/// Outcome of resolving a concrete request through an aspect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Concrete storage path with placeholders substituted
    pub storage_path: String,
    /// Access granted by the matching rule
    pub access: AccessLevel,
    /// Index of the matching rule
    pub rule_index: usize,
}

impl Aspect {
    /// Compiles an aspect from its header map form.
    ///
    /// The entry must be a non-empty map with a non-empty `rules` list.
    /// Rules are compiled in declaration order; the first failure stops
    /// compilation.
    pub fn compile(
        name: &str,
        value: &HeaderValue,
        schema: &Schema,
        options: &CompileOptions,
    ) -> AspectResult<Self> {
        let invalid = |reason: String| AspectError::InvalidAspect {
            name: name.to_string(),
            reason,
        };

        if !aspect_name_regex().is_match(name) {
            return Err(invalid(format!("name must conform to {}", SUBKEY_GRAMMAR)));
        }

        let entry = value
            .as_map()
            .filter(|m| !m.is_empty())
            .ok_or_else(|| invalid("aspect must be a non-empty map".into()))?;

        let rules = entry
            .get("rules")
            .and_then(HeaderValue::as_list)
            .filter(|rules| !rules.is_empty())
            .ok_or_else(|| invalid("\"rules\" must be a non-empty list".into()))?;

        if let Some(key) = entry.keys().find(|k| k.as_str() != "rules") {
            return Err(invalid(format!("unknown field {:?}", key)));
        }

        let rule_error = |source: RuleError| AspectError::Rule {
            name: name.to_string(),
            source,
        };

        let mut compiled = Vec::with_capacity(rules.len());
        let mut shapes = HashSet::new();
        for raw in rules {
            let rule = Rule::from_header(raw, schema, options).map_err(rule_error)?;

            if !shapes.insert(rule.request().shape()) {
                return Err(rule_error(RuleError::ConflictingRequest(
                    rule.request().to_string(),
                )));
            }

            compiled.push(rule);
        }

        Ok(Self {
            name: name.to_string(),
            rules: compiled,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rules in declaration order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Resolves a concrete dotted request; the first matching rule wins.
    pub fn match_request(&self, request: &str) -> Option<Resolution> {
        let path: Vec<&str> = request.split('.').collect();

        self.rules.iter().enumerate().find_map(|(rule_index, rule)| {
            let bindings = rule.request().bind(&path)?;
            let storage_path = rule.storage().render(&bindings)?;
            Some(Resolution {
                storage_path,
                access: rule.access(),
                rule_index,
            })
        })
    }
}
