//! Input and output handling for the CLI
//!
//! - Input: raw assertion bytes from a file, or stdin for `-`
//! - Output: one JSON object per line on stdout
//! - Logs never go to stdout

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Path argument that selects stdin
pub const STDIN_PATH: &str = "-";

/// Human-readable label for an input path
pub fn input_label(path: &Path) -> String {
    if path == Path::new(STDIN_PATH) {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

/// Read raw assertion bytes from a file or stdin
pub fn read_input(path: &Path) -> CliResult<Vec<u8>> {
    if path == Path::new(STDIN_PATH) {
        let mut buffer = Vec::new();
        io::stdin().lock().read_to_end(&mut buffer)?;
        return Ok(buffer);
    }

    fs::read(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))
}

/// Build a success response object
pub fn ok_response(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

/// Build an error response object
pub fn error_response(code: &str, message: &str) -> Value {
    json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&ok_response(data))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_line(&error_response(code, message))
}

/// Write raw bytes to stdout, newline terminated
pub fn write_raw(bytes: &[u8]) -> CliResult<()> {
    let mut stdout = io::stdout();
    stdout.write_all(bytes)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

fn write_line(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
