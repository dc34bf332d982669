//! Aspect rules: request pattern -> storage pattern with an access level

use std::fmt;
use std::str::FromStr;

use super::errors::RuleError;
use super::pattern::{Pattern, Segment};
use super::CompileOptions;
use crate::envelope::HeaderValue;
use crate::schema::Schema;

/// Access granted through a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessLevel {
    Read,
    Write,
    #[default]
    ReadWrite,
}

impl AccessLevel {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Read => "read",
            AccessLevel::Write => "write",
            AccessLevel::ReadWrite => "read-write",
        }
    }

    pub fn can_read(&self) -> bool {
        matches!(self, AccessLevel::Read | AccessLevel::ReadWrite)
    }

    pub fn can_write(&self) -> bool {
        matches!(self, AccessLevel::Write | AccessLevel::ReadWrite)
    }

    /// Normalizes an optional declared access, defaulting to read-write.
    ///
    /// An empty declaration counts as unspecified.
    pub fn from_declared(declared: Option<&str>) -> Result<Self, RuleError> {
        match declared {
            None | Some("") => Ok(AccessLevel::default()),
            Some(s) => s.parse(),
        }
    }
}

impl FromStr for AccessLevel {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read-write" => Ok(AccessLevel::ReadWrite),
            "read" => Ok(AccessLevel::Read),
            "write" => Ok(AccessLevel::Write),
            other => Err(RuleError::InvalidAccess(other.to_string())),
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A compiled, validated rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    request: Pattern,
    storage: Pattern,
    access: AccessLevel,
}

impl Rule {
    /// Compiles one rule.
    ///
    /// Steps, first failure wins:
    /// 1. parse both patterns
    /// 2. placeholder names must be the same set on both sides
    /// 3. normalize the access level
    /// 4. the storage path must be addressable under the schema
    pub fn compile(
        request: &str,
        storage: &str,
        access: Option<&str>,
        schema: &Schema,
        options: &CompileOptions,
    ) -> Result<Self, RuleError> {
        let request_pattern = Pattern::parse(request).map_err(|source| RuleError::InvalidRequest {
            pattern: request.to_string(),
            source,
        })?;
        let storage_pattern = Pattern::parse(storage).map_err(|source| RuleError::InvalidStorage {
            pattern: storage.to_string(),
            source,
        })?;

        let request_names = request_pattern.placeholders();
        let storage_names = storage_pattern.placeholders();
        if request_names.difference(&storage_names).next().is_some()
            || storage_names.difference(&request_names).next().is_some()
        {
            return Err(RuleError::MismatchedPlaceholders {
                request: request.to_string(),
                storage: storage.to_string(),
            });
        }

        let access = AccessLevel::from_declared(access)?;

        if !is_addressable(&storage_pattern, schema, options) {
            return Err(RuleError::UndeclaredStoragePath(storage.to_string()));
        }

        Ok(Self {
            request: request_pattern,
            storage: storage_pattern,
            access,
        })
    }

    /// Compiles a rule from its header map form.
    ///
    /// `storage` is mandatory; a missing or empty `request` defaults to the
    /// storage pattern.
    pub fn from_header(
        value: &HeaderValue,
        schema: &Schema,
        options: &CompileOptions,
    ) -> Result<Self, RuleError> {
        let fields = value.as_map().ok_or(RuleError::NotAMap)?;

        let mut request = None;
        let mut storage = None;
        let mut access = None;
        for (key, field) in fields {
            let text = field
                .as_str()
                .ok_or_else(|| RuleError::FieldNotString(key.clone()))?;
            match key.as_str() {
                "request" => request = Some(text),
                "storage" => storage = Some(text),
                "access" => access = Some(text),
                other => return Err(RuleError::UnknownField(other.to_string())),
            }
        }

        let storage = storage
            .filter(|s| !s.is_empty())
            .ok_or(RuleError::MissingStorage)?;
        let request = request.filter(|r| !r.is_empty()).unwrap_or(storage);

        Self::compile(request, storage, access, schema, options)
    }

    pub fn request(&self) -> &Pattern {
        &self.request
    }

    pub fn storage(&self) -> &Pattern {
        &self.storage
    }

    pub fn access(&self) -> AccessLevel {
        self.access
    }
}

/// Checks the storage pattern against the schema.
///
/// By default only the leading literal is checked against the top-level
/// keys; strict mode resolves the whole path.
fn is_addressable(storage: &Pattern, schema: &Schema, options: &CompileOptions) -> bool {
    if options.strict_storage_paths {
        return schema.lookup(&storage.path_keys()).is_some();
    }
    match storage.segments().first() {
        Some(Segment::Literal(key)) => schema.declares(key),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::parse_headers;
    use crate::schema::parse_schema;

    fn wifi_schema() -> Schema {
        parse_schema(r#"{"schema": {"wifi": {"type": "map", "values": "any"}}}"#).unwrap()
    }

    fn compile(request: &str, storage: &str, access: Option<&str>) -> Result<Rule, RuleError> {
        Rule::compile(request, storage, access, &wifi_schema(), &CompileOptions::default())
    }

    #[test]
    fn test_access_levels() {
        assert_eq!(AccessLevel::from_declared(None).unwrap(), AccessLevel::ReadWrite);
        assert_eq!(AccessLevel::from_declared(Some("")).unwrap(), AccessLevel::ReadWrite);
        assert_eq!("read".parse::<AccessLevel>().unwrap(), AccessLevel::Read);
        assert_eq!("write".parse::<AccessLevel>().unwrap(), AccessLevel::Write);
        assert_eq!(
            "update".parse::<AccessLevel>().unwrap_err(),
            RuleError::InvalidAccess("update".into())
        );
        assert!(AccessLevel::Read.can_read() && !AccessLevel::Read.can_write());
        assert!(AccessLevel::Write.can_write() && !AccessLevel::Write.can_read());
        assert!(AccessLevel::ReadWrite.can_read() && AccessLevel::ReadWrite.can_write());
    }

    #[test]
    fn test_compile_literal_rule() {
        let rule = compile("ssid", "wifi.ssid", Some("read")).unwrap();
        assert_eq!(rule.request().to_string(), "ssid");
        assert_eq!(rule.storage().to_string(), "wifi.ssid");
        assert_eq!(rule.access(), AccessLevel::Read);
    }

    #[test]
    fn test_compile_placeholder_rule() {
        let rule = compile("private.{key}", "wifi.{key}", None).unwrap();
        assert_eq!(rule.access(), AccessLevel::ReadWrite);
    }

    #[test]
    fn test_placeholder_missing_in_storage() {
        let err = compile("private.{key}", "wifi.ssid", None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "request \"private.{key}\" and storage \"wifi.ssid\" have mismatched placeholders"
        );
    }

    #[test]
    fn test_placeholder_missing_in_request() {
        let err = compile("private", "wifi.{key}", None).unwrap_err();
        assert!(matches!(err, RuleError::MismatchedPlaceholders { .. }));
    }

    #[test]
    fn test_repeated_placeholder_needs_one_counterpart() {
        assert!(compile("{a}.{a}", "wifi.{a}", None).is_ok());
        assert!(compile("{a}.{b}", "wifi.{a}.{a}", None).is_err());
    }

    #[test]
    fn test_placeholder_position_is_irrelevant() {
        assert!(compile("{a}.x.{b}", "wifi.{b}.{a}", None).is_ok());
    }

    #[test]
    fn test_invalid_access() {
        let err = compile("ssid", "wifi.ssid", Some("update")).unwrap_err();
        assert_eq!(err, RuleError::InvalidAccess("update".into()));
    }

    #[test]
    fn test_undeclared_storage_path() {
        let err = compile("ssid", "network.ssid", None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "storage path \"network.ssid\" is not declared in the storage schema"
        );
    }

    #[test]
    fn test_leading_placeholder_is_addressable() {
        assert!(compile("{k}", "{k}.x", None).is_ok());
    }

    #[test]
    fn test_strict_storage_paths() {
        let schema = parse_schema(
            r#"{"schema": {"audio": {"type": "map", "schema": {"volume": "int"}}}}"#,
        )
        .unwrap();
        let loose = CompileOptions::default();
        let strict = CompileOptions {
            strict_storage_paths: true,
        };

        assert!(Rule::compile("balance", "audio.balance", None, &schema, &loose).is_ok());
        assert_eq!(
            Rule::compile("balance", "audio.balance", None, &schema, &strict).unwrap_err(),
            RuleError::UndeclaredStoragePath("audio.balance".into())
        );
        assert!(Rule::compile("volume", "audio.volume", None, &schema, &strict).is_ok());
        assert!(Rule::compile("volume", "audio.volume.left", None, &schema, &strict).is_err());
    }

    #[test]
    fn test_pattern_errors_name_side() {
        let err = compile("a..b", "wifi.x", None).unwrap_err();
        assert_eq!(err.to_string(), "invalid request \"a..b\": cannot have empty subkeys");

        let err = compile("x", "wifi.X", None).unwrap_err();
        assert_eq!(err.to_string(), "invalid storage \"wifi.X\": invalid subkey \"X\"");
    }

    fn rule_header(text: &str) -> HeaderValue {
        parse_headers(text).unwrap().remove("rule").unwrap()
    }

    #[test]
    fn test_from_header() {
        let value = rule_header("rule:\n  request: password\n  storage: wifi.psk\n  access: write");
        let rule = Rule::from_header(&value, &wifi_schema(), &CompileOptions::default()).unwrap();
        assert_eq!(rule.request().to_string(), "password");
        assert_eq!(rule.access(), AccessLevel::Write);

        let value = rule_header("rule:\n  storage: wifi.psk\n  access: ");
        let rule = Rule::from_header(&value, &wifi_schema(), &CompileOptions::default()).unwrap();
        assert_eq!(rule.access(), AccessLevel::ReadWrite);
    }

    #[test]
    fn test_from_header_defaults_request_to_storage() {
        let value = rule_header("rule:\n  storage: wifi.psk");
        let rule = Rule::from_header(&value, &wifi_schema(), &CompileOptions::default()).unwrap();
        assert_eq!(rule.request(), rule.storage());
    }

    #[test]
    fn test_from_header_errors() {
        let schema = wifi_schema();
        let options = CompileOptions::default();

        let value = rule_header("rule:\n  request: password");
        assert_eq!(
            Rule::from_header(&value, &schema, &options).unwrap_err(),
            RuleError::MissingStorage
        );

        let value = rule_header("rule:\n  storage: wifi.psk\n  content: x");
        assert_eq!(
            Rule::from_header(&value, &schema, &options).unwrap_err(),
            RuleError::UnknownField("content".into())
        );

        let value = rule_header("rule:\n  storage:\n    - wifi.psk");
        assert_eq!(
            Rule::from_header(&value, &schema, &options).unwrap_err(),
            RuleError::FieldNotString("storage".into())
        );

        let value = rule_header("rule: wifi.psk");
        assert_eq!(
            Rule::from_header(&value, &schema, &options).unwrap_err(),
            RuleError::NotAMap
        );
    }
}
