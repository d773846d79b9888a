//! Render context management
//!
//! The context holds the named values available to templates. It is built
//! once per run and shared read-only across all renders.

use dotweave_core::{ContextProvider, Result as CoreResult};
use indexmap::IndexMap;
use minijinja::Value;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::env;
use std::path::PathBuf;

/// Top-level keys populated by [`SystemContextProvider`]
pub const RESERVED_KEYS: [&str; 3] = ["system", "env", "dotweave"];

/// Immutable mapping of top-level names to values
#[derive(Debug, Clone)]
pub struct RenderContext {
    values: IndexMap<String, JsonValue>,
    value: Value,
}

impl RenderContext {
    /// Create a context from top-level values
    #[must_use]
    pub fn new(values: IndexMap<String, JsonValue>) -> Self {
        let value = Value::from_serialize(&values);
        Self { values, value }
    }

    /// Build the context from a provider
    ///
    /// # Errors
    ///
    /// Returns the provider's error unchanged
    pub fn from_provider(provider: &dyn ContextProvider) -> CoreResult<Self> {
        provider.provide().map(Self::new)
    }

    /// Top-level keys, in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Whether a top-level key is defined
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Look up a dotted path such as `git.email`
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&JsonValue> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        parts.try_fold(self.values.get(first)?, |value, part| value.get(part))
    }

    /// Raw values
    pub fn values(&self) -> &IndexMap<String, JsonValue> {
        &self.values
    }

    /// The context as a minijinja value
    pub(crate) fn as_value(&self) -> &Value {
        &self.value
    }
}

impl Serialize for RenderContext {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

/// System information available to templates as `system`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system ("linux", "darwin", "windows")
    pub os: String,

    /// Operating system family ("unix", "windows")
    #[serde(rename = "osFamily")]
    pub os_family: String,

    /// Architecture (e.g., "`x86_64`", "aarch64")
    pub arch: String,

    /// Hostname
    pub hostname: String,

    /// Username
    pub username: String,

    /// Home directory path
    #[serde(rename = "homeDir")]
    pub home_dir: String,
}

impl SystemInfo {
    /// Detect system information
    #[must_use]
    pub fn detect() -> Self {
        let platform = &*dotweave_core::platform::CURRENT_PLATFORM;
        Self {
            os: platform.os.to_string(),
            os_family: platform.family.to_string(),
            arch: platform.arch.to_string(),
            hostname: Self::detect_hostname(),
            username: Self::detect_username(),
            home_dir: Self::detect_home_dir(),
        }
    }

    fn detect_hostname() -> String {
        hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn detect_username() -> String {
        env::var("USER")
            .or_else(|_| env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }

    fn detect_home_dir() -> String {
        dirs::home_dir()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Paths of the current run, available as `dotweave`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    /// Template store location
    #[serde(rename = "srcDir")]
    pub src_dir: String,

    /// Home directory targets are rendered into
    #[serde(rename = "dstDir")]
    pub dst_dir: String,
}

/// Production context provider
///
/// Detects system information and captures the environment once, then adds
/// the run's directories and user variables. User variables are flattened to
/// the top level; a variable named like a reserved key is ignored.
#[derive(Debug, Clone)]
pub struct SystemContextProvider {
    src_dir: PathBuf,
    dst_dir: PathBuf,
    variables: IndexMap<String, JsonValue>,
    env: Option<IndexMap<String, String>>,
}

impl SystemContextProvider {
    /// Create a provider for the given directories
    #[must_use]
    pub fn new(src_dir: PathBuf, dst_dir: PathBuf) -> Self {
        Self {
            src_dir,
            dst_dir,
            variables: IndexMap::new(),
            env: None,
        }
    }

    /// Set user variables (takes ownership)
    #[must_use]
    pub fn with_variables(mut self, variables: IndexMap<String, JsonValue>) -> Self {
        self.variables = variables;
        self
    }

    /// Use a fixed environment instead of the process environment
    #[must_use]
    pub fn with_env(mut self, env: IndexMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    fn to_json<T: Serialize>(value: &T) -> CoreResult<JsonValue> {
        serde_json::to_value(value)
            .map_err(|e| dotweave_core::Error::Message(format!("Failed to build context: {e}")))
    }
}

impl ContextProvider for SystemContextProvider {
    fn provide(&self) -> CoreResult<IndexMap<String, JsonValue>> {
        let mut values = IndexMap::new();

        let env = match &self.env {
            Some(env) => env.clone(),
            None => {
                // Non-UTF-8 variables cannot be represented in templates
                let mut vars: IndexMap<String, String> = env::vars_os()
                    .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                    .collect();
                vars.sort_keys();
                vars
            }
        };

        let run = RunInfo {
            src_dir: self.src_dir.to_string_lossy().into_owned(),
            dst_dir: self.dst_dir.to_string_lossy().into_owned(),
        };

        values.insert("system".to_string(), Self::to_json(&SystemInfo::detect())?);
        values.insert("env".to_string(), Self::to_json(&env)?);
        values.insert("dotweave".to_string(), Self::to_json(&run)?);

        for (key, value) in &self.variables {
            if RESERVED_KEYS.contains(&key.as_str()) {
                tracing::warn!(key = %key, "Ignoring variable that shadows a built-in context key");
                continue;
            }
            values.insert(key.clone(), value.clone());
        }

        Ok(values)
    }
}
