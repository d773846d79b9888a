//! Template functions and filters
//!
//! Every helper here is a pure function of its arguments. Nothing reads the
//! clock, the environment or the filesystem, so rendering the same template
//! against the same context always yields the same bytes. System information
//! reaches templates only through the render context.

use minijinja::{Error, ErrorKind, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Names of the functions registered on the engine
pub const FUNCTION_NAMES: [&str; 5] = ["joinPath", "regexMatch", "regexReplaceAll", "split", "join"];

static REGEX_CACHE: OnceLock<RwLock<HashMap<String, regex::Regex>>> = OnceLock::new();
const MAX_REGEX_CACHE_SIZE: usize = 32;
const MAX_PATTERN_LEN: usize = 200;

fn invalid(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::InvalidOperation, message.into())
}

/// Join path components
///
/// Usage: `{{ joinPath(system.homeDir, ".config", "git") }}`
#[must_use]
pub fn join_path(args: &[Value]) -> String {
    let mut path = PathBuf::new();
    for arg in args {
        if let Some(s) = arg.as_str() {
            path.push(s);
        }
    }
    path.to_string_lossy().into_owned()
}

/// Quote a string for shell or config files
///
/// Wraps the value in double quotes and escapes internal double quotes and
/// backslashes.
///
/// Usage: `{{ some_var | quote }}`
///
/// Examples:
/// - `hello` → `"hello"`
/// - `say "hi"` → `"say \"hi\""`
#[must_use]
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Convert a value to JSON
///
/// Usage: `{{ some_data | toJson }}`
///
/// # Errors
///
/// Returns error if value cannot be converted to JSON
pub fn to_json(value: &Value) -> Result<String, Error> {
    serde_json::to_string(value).map_err(|e| invalid(e.to_string()))
}

/// Parse a JSON string
///
/// Usage: `{{ json_string | fromJson }}`
///
/// # Errors
///
/// Returns error if value is not valid JSON
pub fn from_json(value: &str) -> Result<Value, Error> {
    let json_value: serde_json::Value =
        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?;
    Ok(Value::from_serialize(&json_value))
}

/// Convert a mapping to TOML
///
/// Usage: `{{ settings | toToml }}`
///
/// # Errors
///
/// Returns error if value is not a mapping or cannot be serialized
pub fn to_toml(value: &Value) -> Result<String, Error> {
    let json_value =
        serde_json::to_value(value).map_err(|e| invalid(format!("Failed to convert value: {e}")))?;

    toml::to_string(&json_value).map_err(|e| invalid(format!("Failed to serialize to TOML: {e}")))
}

/// Parse a TOML string
///
/// Usage: `{% set cfg = fromToml(text) %}{{ cfg.database.host }}`
///
/// # Errors
///
/// Returns error if value is not valid TOML
pub fn from_toml(value: &str) -> Result<Value, Error> {
    let json_value: serde_json::Value =
        toml::from_str(value).map_err(|e| invalid(format!("Failed to parse TOML: {e}")))?;
    Ok(Value::from_serialize(&json_value))
}

/// Trim whitespace from both ends of a string
#[must_use]
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Trim leading whitespace
#[must_use]
pub fn trim_start(value: &str) -> String {
    value.trim_start().to_string()
}

/// Trim trailing whitespace
#[must_use]
pub fn trim_end(value: &str) -> String {
    value.trim_end().to_string()
}

/// Test if a string matches a regular expression
///
/// # Usage
///
/// ```jinja2
/// {{ regexMatch("hello123", "\\d+") }}  {# Output: true #}
/// ```
///
/// Patterns are limited to 200 characters and compiled with size limits.
///
/// # Errors
///
/// Returns error if pattern is invalid or exceeds complexity limits
pub fn regex_match(text: &str, pattern: &str) -> Result<bool, Error> {
    let re = get_compiled_regex(pattern)?;
    Ok(re.is_match(text))
}

/// Replace all matches of a regular expression
///
/// # Usage
///
/// ```jinja2
/// {{ regexReplaceAll("hello 123 world 456", "\\d+", "X") }}  {# Output: "hello X world X" #}
/// ```
///
/// # Errors
///
/// Returns error if pattern is invalid or exceeds complexity limits
pub fn regex_replace_all(text: &str, pattern: &str, replacement: &str) -> Result<String, Error> {
    let re = get_compiled_regex(pattern)?;
    Ok(re.replace_all(text, replacement).into_owned())
}

/// Get a compiled regex from the cache or compile and cache it
fn get_compiled_regex(pattern: &str) -> Result<regex::Regex, Error> {
    if pattern.len() > MAX_PATTERN_LEN {
        return Err(invalid(format!(
            "Regex pattern too long ({} chars, max {MAX_PATTERN_LEN})",
            pattern.len()
        )));
    }

    let cache = REGEX_CACHE.get_or_init(|| RwLock::new(HashMap::new()));

    if let Some(re) = cache
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(pattern)
    {
        return Ok(re.clone());
    }

    let re = regex::RegexBuilder::new(pattern)
        .size_limit(10 * (1 << 20))
        .dfa_size_limit(2 * (1 << 20))
        .build()
        .map_err(|e| invalid(format!("Invalid regex pattern: {e}")))?;

    let mut write_guard = cache.write().unwrap_or_else(PoisonError::into_inner);
    if write_guard.len() >= MAX_REGEX_CACHE_SIZE {
        write_guard.clear();
    }
    write_guard.insert(pattern.to_string(), re.clone());
    Ok(re)
}

/// Split a string by a delimiter
///
/// Usage: `{% for part in split(path, "/") %}{{ part }}{% endfor %}`
#[must_use]
pub fn split(text: &str, delimiter: &str) -> Vec<String> {
    text.split(delimiter).map(ToString::to_string).collect()
}

/// Join a list of strings with a delimiter
///
/// Non-string items are skipped.
///
/// Usage: `{{ join(["a", "b", "c"], ", ") }}`
#[must_use]
pub fn join(items: &[Value], delimiter: &str) -> String {
    items
        .iter()
        .filter_map(|v| v.as_str())
        .collect::<Vec<_>>()
        .join(delimiter)
}
