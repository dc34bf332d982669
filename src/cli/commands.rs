//! CLI command implementations
//!
//! Every command loads the configuration first, then decodes each input
//! with the derived decoder options. Results go to stdout as JSON lines;
//! decode events are logged on stderr when `log_events` is enabled.

use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

use crate::asserts::{decode_with, AspectBundle, Assertion, AssertionError, Decoded};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::Schema;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{input_label, read_input, write_error, write_raw, write_response};

/// Run the CLI: parse arguments and dispatch
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Check { files, config } => check(&files, config.as_deref()),
        Command::Inspect { file, config } => inspect(&file, config.as_deref()),
        Command::Canonical { file, config } => canonical(&file, config.as_deref()),
        Command::Resolve {
            file,
            aspect,
            request,
            config,
        } => resolve(&file, &aspect, &request, config.as_deref()),
    }
}

/// Validate every input, reporting one line each.
///
/// Unreadable and rejected inputs are reported and counted; the command
/// fails after all inputs were processed if any of them failed.
pub fn check(files: &[PathBuf], config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let mut rejected = 0;

    for path in files {
        let label = input_label(path);
        let outcome = read_input(path).map(|bytes| decode_logged(&bytes, &label, &config));

        match outcome {
            Ok(Ok(decoded)) => write_response(check_summary(&label, &decoded))?,
            Ok(Err(e)) => {
                rejected += 1;
                write_error(e.code(), &e.to_string())?;
            }
            Err(e) => {
                rejected += 1;
                write_error(e.code_str(), e.message())?;
            }
        }
    }

    if rejected > 0 {
        return Err(CliError::rejected(rejected, files.len()));
    }
    Ok(())
}

/// Decode one input and print its full description
pub fn inspect(file: &Path, config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let decoded = decode_one(file, &config)?;
    write_response(describe(&decoded))
}

/// Decode one input and print it re-encoded in canonical order
pub fn canonical(file: &Path, config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let decoded = decode_one(file, &config)?;
    write_raw(&decoded.as_assertion().canonical_bytes())
}

/// Resolve a concrete request through one aspect of a decoded bundle
pub fn resolve(
    file: &Path,
    aspect: &str,
    request: &str,
    config_path: Option<&Path>,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let decoded = decode_one(file, &config)?;

    match resolution(&decoded, aspect, request) {
        Ok(data) => write_response(data),
        Err(message) => {
            write_error(RESOLVE_FAILED, &message)?;
            Err(CliError::rejected(1, 1))
        }
    }
}

const RESOLVE_FAILED: &str = "ASSERT_CLI_UNRESOLVED";

fn load_config(path: Option<&Path>) -> CliResult<Config> {
    let config = Config::load_or_default(path)?;

    if config.log_events {
        let max = config.max_assertion_size.to_string();
        let strict = config.strict_storage_paths.to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("max_assertion_size", max.as_str()), ("strict_storage_paths", strict.as_str())],
        );
    }

    Ok(config)
}

fn decode_one(path: &Path, config: &Config) -> CliResult<Decoded> {
    let label = input_label(path);
    let bytes = read_input(path)?;

    match decode_logged(&bytes, &label, config) {
        Ok(decoded) => Ok(decoded),
        Err(e) => {
            // The rejection is reported on stdout before the command fails
            write_error(e.code(), &e.to_string())?;
            Err(CliError::rejected(1, 1))
        }
    }
}

/// Decode with the configured options, logging the outcome
fn decode_logged(bytes: &[u8], label: &str, config: &Config) -> Result<Decoded, AssertionError> {
    let size = bytes.len().to_string();
    if config.log_events {
        log_event_with_fields(Event::DecodeStart, &[("input", label), ("size", size.as_str())]);
    }

    let result = decode_with(bytes, &config.decode_options());

    if config.log_events {
        match &result {
            Ok(decoded) => {
                let assertion = decoded.as_assertion();
                let digest = assertion.content_digest();
                log_event_with_fields(
                    Event::AssertionAccepted,
                    &[
                        ("digest", digest.as_str()),
                        ("input", label),
                        ("type", assertion.assertion_type().name()),
                    ],
                );
            }
            Err(e @ AssertionError::TooLarge { .. }) => {
                let max = config.max_assertion_size.to_string();
                log_event_with_fields(
                    Event::InputTooLarge,
                    &[
                        ("code", e.code()),
                        ("input", label),
                        ("max", max.as_str()),
                        ("size", size.as_str()),
                    ],
                );
            }
            Err(e) => {
                let message = e.to_string();
                log_event_with_fields(
                    Event::AssertionRejected,
                    &[("code", e.code()), ("input", label), ("message", message.as_str())],
                );
            }
        }
    }

    result
}

/// One-line summary for `check`
pub fn check_summary(label: &str, decoded: &Decoded) -> Value {
    let assertion = decoded.as_assertion();
    json!({
        "input": label,
        "type": assertion.assertion_type().name(),
        "primary-key": assertion.primary_key(),
        "digest": assertion.content_digest(),
    })
}

/// Full description for `inspect`
pub fn describe(decoded: &Decoded) -> Value {
    match decoded {
        Decoded::AspectBundle(bundle) => describe_aspect_bundle(bundle),
    }
}

fn describe_aspect_bundle(assertion: &AspectBundle) -> Value {
    let bundle = assertion.bundle();

    let mut aspects = Map::new();
    for aspect in bundle.aspects() {
        let rules: Vec<Value> = aspect
            .rules()
            .iter()
            .map(|rule| {
                json!({
                    "request": rule.request().to_string(),
                    "storage": rule.storage().to_string(),
                    "access": rule.access().as_str(),
                })
            })
            .collect();
        aspects.insert(aspect.name().to_string(), Value::Array(rules));
    }

    json!({
        "type": assertion.assertion_type().name(),
        "authority-id": assertion.authority_id(),
        "account-id": assertion.account_id(),
        "name": assertion.name(),
        "summary": assertion.summary(),
        "timestamp": assertion.timestamp().to_rfc3339(),
        "digest": assertion.content_digest(),
        "storage": storage_types(bundle.schema()),
        "aspects": Value::Object(aspects),
    })
}

/// Top-level storage keys with their declared types
fn storage_types(schema: &Schema) -> Value {
    let types: Map<String, Value> = schema
        .keys()
        .filter_map(|key| {
            let node = schema.get(key)?;
            Some((key.to_string(), Value::from(node.type_name())))
        })
        .collect();
    Value::Object(types)
}

/// Resolution result for `resolve`, or the reason it failed
pub fn resolution(decoded: &Decoded, aspect: &str, request: &str) -> Result<Value, String> {
    let bundle = match decoded {
        Decoded::AspectBundle(assertion) => assertion.bundle(),
    };

    let aspect_def = bundle
        .aspect(aspect)
        .ok_or_else(|| format!("aspect {:?} not found in bundle {:?}", aspect, bundle.name()))?;

    let resolved = aspect_def
        .match_request(request)
        .ok_or_else(|| format!("no rule of aspect {:?} matches request {:?}", aspect, request))?;

    Ok(json!({
        "aspect": aspect,
        "request": request,
        "storage": resolved.storage_path,
        "access": resolved.access.as_str(),
        "rule": resolved.rule_index,
    }))
}
