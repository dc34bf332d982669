//! Aspect Rule Tests
//!
//! Compilation of aspects against a storage schema through the public API:
//! - schema lookups drive storage path checks
//! - rule compilation is first-failure-wins
//! - compiled bundles are deterministic

use asserts::aspects::{AccessLevel, AspectError, Bundle, CompileOptions, Pattern, Rule, RuleError};
use asserts::envelope::{parse_headers, HeaderValue};
use asserts::schema::{parse_schema, PathKey, Schema, SchemaNode};
use std::collections::BTreeMap;

// =============================================================================
// Helper Functions
// =============================================================================

const SCHEMA: &str = r#"{
  "schema": {
    "wifi": {
      "type": "map",
      "schema": {
        "ssid": "string",
        "psk": "string",
        "ssids": {"type": "map", "values": "string"}
      }
    },
    "volume": "int"
  }
}"#;

fn schema() -> Schema {
    parse_schema(SCHEMA).unwrap()
}

fn aspects(text: &str) -> BTreeMap<String, HeaderValue> {
    match parse_headers(text).unwrap().remove("aspects") {
        Some(HeaderValue::Map(m)) => m,
        other => panic!("aspects is not a map: {:?}", other),
    }
}

fn compile(text: &str, options: &CompileOptions) -> Result<Bundle, AspectError> {
    Bundle::compile("acc", "net", &aspects(text), schema(), options)
}

const STRICT: CompileOptions = CompileOptions {
    strict_storage_paths: true,
};

// =============================================================================
// Schema Lookup Tests
// =============================================================================

/// Declared object fields resolve; undeclared ones do not.
#[test]
fn test_schema_lookup_object_fields() {
    let schema = schema();

    assert_eq!(schema.lookup_dotted("wifi.ssid"), Some(&SchemaNode::String));
    assert_eq!(schema.lookup_dotted("wifi.ssids.home"), Some(&SchemaNode::String));
    assert_eq!(schema.lookup_dotted("volume"), Some(&SchemaNode::Int));
    assert!(schema.lookup_dotted("wifi.status").is_none());
    assert!(schema.lookup_dotted("volume.level").is_none());
    assert!(schema.lookup_dotted("cellular").is_none());
}

/// A placeholder resolves when any declared key accepts the rest of the path.
#[test]
fn test_schema_lookup_placeholder() {
    let schema = schema();

    let path = [PathKey::Key("wifi"), PathKey::Any, PathKey::Key("home")];
    assert_eq!(schema.lookup(&path), Some(&SchemaNode::String));

    let path = [PathKey::Key("wifi"), PathKey::Any, PathKey::Key("a"), PathKey::Key("b")];
    assert!(schema.lookup(&path).is_none());
}

// =============================================================================
// Rule Compilation Tests
// =============================================================================

/// Request defaults to the storage pattern and access to read-write.
#[test]
fn test_rule_defaults() {
    let value = parse_headers("rule:\n  storage: wifi.ssid").unwrap().remove("rule").unwrap();
    let rule = Rule::from_header(&value, &schema(), &CompileOptions::default()).unwrap();

    assert_eq!(rule.request(), rule.storage());
    assert_eq!(rule.access(), AccessLevel::ReadWrite);
    assert_eq!(rule.request().to_string(), "wifi.ssid");
}

/// Placeholders must be the same set on both sides, in any order.
#[test]
fn test_rule_placeholder_sets() {
    let opts = CompileOptions::default();

    let rule = Rule::compile("a.{x}.{y}", "wifi.{y}.{x}", None, &schema(), &opts).unwrap();
    assert_eq!(
        rule.request().placeholders(),
        Pattern::parse("wifi.{y}.{x}").unwrap().placeholders()
    );

    let err = Rule::compile("a.{x}", "wifi.{x}.{y}", None, &schema(), &opts).unwrap_err();
    assert!(matches!(err, RuleError::MismatchedPlaceholders { .. }));

    let err = Rule::compile("a.{x}.{y}", "wifi.{x}", None, &schema(), &opts).unwrap_err();
    assert!(matches!(err, RuleError::MismatchedPlaceholders { .. }));
}

/// Pattern errors come before access errors.
#[test]
fn test_rule_first_failure_wins() {
    let err = Rule::compile("a..b", "wifi.{x}", Some("update"), &schema(), &CompileOptions::default())
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid request \"a..b\": cannot have empty subkeys");
}

/// Strict mode resolves the full storage path, placeholders included.
#[test]
fn test_rule_strict_storage_paths() {
    assert!(Rule::compile("n.{k}", "wifi.ssids.{k}", None, &schema(), &STRICT).is_ok());
    assert!(Rule::compile("p", "wifi.psk", Some("write"), &schema(), &STRICT).is_ok());

    let err = Rule::compile("s", "wifi.status", None, &schema(), &STRICT).unwrap_err();
    assert_eq!(err, RuleError::UndeclaredStoragePath("wifi.status".into()));

    // Only the leading key is checked by default
    assert!(Rule::compile("s", "wifi.status", None, &schema(), &CompileOptions::default()).is_ok());
}

// =============================================================================
// Bundle Compilation Tests
// =============================================================================

/// A valid bundle compiles with aspects in name order.
#[test]
fn test_bundle_compiles() {
    let bundle = compile(
        "aspects:
  wifi-setup:
    rules:
      -
        request: ssid
        storage: wifi.ssid
      -
        request: known.{name}
        storage: wifi.ssids.{name}
        access: read
  audio:
    rules:
      -
        storage: volume",
        &STRICT,
    )
    .unwrap();

    let names: Vec<&str> = bundle.aspects().map(|a| a.name()).collect();
    assert_eq!(names, vec!["audio", "wifi-setup"]);

    let resolved = bundle
        .aspect("wifi-setup")
        .unwrap()
        .match_request("known.home")
        .unwrap();
    assert_eq!(resolved.storage_path, "wifi.ssids.home");
    assert_eq!(resolved.access, AccessLevel::Read);
}

/// Two rules with the same request shape conflict.
#[test]
fn test_bundle_conflicting_requests() {
    let err = compile(
        "aspects:
  wifi-setup:
    rules:
      -
        request: known.{a}
        storage: wifi.ssids.{a}
      -
        request: known.{b}
        storage: wifi.ssids.{b}",
        &CompileOptions::default(),
    )
    .unwrap_err();

    assert_eq!(err.aspect(), Some("wifi-setup"));
    assert_eq!(
        err.to_string(),
        "cannot define aspect \"wifi-setup\": cannot create aspect rule: request \"known.{b}\" conflicts with an earlier rule"
    );
}

/// A repeated placeholder narrows the request, so it does not conflict
/// with distinct placeholders in the same positions.
#[test]
fn test_bundle_repeated_placeholders_do_not_conflict() {
    let bundle = compile(
        "aspects:
  pairs:
    rules:
      -
        request: {a}.{a}
        storage: wifi.{a}
      -
        request: {a}.{b}
        storage: wifi.{a}.{b}",
        &CompileOptions::default(),
    )
    .unwrap();

    let aspect = bundle.aspect("pairs").unwrap();
    assert_eq!(aspect.match_request("x.x").unwrap().storage_path, "wifi.x");
    assert_eq!(aspect.match_request("x.y").unwrap().storage_path, "wifi.x.y");

    let err = compile(
        "aspects:
  pairs:
    rules:
      -
        request: {a}.{b}
        storage: wifi.{a}.{b}
      -
        request: {y}.{x}
        storage: wifi.{x}.{y}",
        &CompileOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot define aspect \"pairs\": cannot create aspect rule: request \"{y}.{x}\" conflicts with an earlier rule"
    );
}

/// Unknown fields are rejected at aspect and rule level.
#[test]
fn test_bundle_unknown_fields() {
    let err = compile(
        "aspects:
  wifi-setup:
    rules:
      -
        storage: wifi.ssid
    summary: nope",
        &CompileOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot define aspect \"wifi-setup\": unknown field \"summary\""
    );

    let err = compile(
        "aspects:
  wifi-setup:
    rules:
      -
        storage: wifi.ssid
        mode: fast",
        &CompileOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot define aspect \"wifi-setup\": cannot create aspect rule: unknown field \"mode\""
    );
}

/// Aspect names follow the subkey grammar.
#[test]
fn test_bundle_invalid_aspect_name() {
    let err = compile(
        "aspects:
  Wifi:
    rules:
      -
        storage: wifi.ssid",
        &CompileOptions::default(),
    )
    .unwrap_err();
    assert!(err
        .to_string()
        .starts_with("cannot define aspect \"Wifi\": name must conform to "));
}

/// Compiling the same input twice yields equal bundles.
#[test]
fn test_bundle_compilation_is_deterministic() {
    let text = "aspects:
  b:
    rules:
      -
        storage: volume
  a:
    rules:
      -
        request: x.{k}
        storage: wifi.ssids.{k}";

    let first = compile(text, &STRICT).unwrap();
    for _ in 0..20 {
        assert_eq!(compile(text, &STRICT).unwrap(), first);
    }
}

/// An empty aspects map cannot form a bundle.
#[test]
fn test_bundle_requires_aspects() {
    let err = Bundle::compile("acc", "net", &BTreeMap::new(), schema(), &CompileOptions::default())
        .unwrap_err();
    assert_eq!(err, AspectError::NoAspects);
    assert_eq!(err.to_string(), "cannot define aspects bundle: no aspects");
}
