//! Configuration management
//!
//! This module handles loading the dotweave configuration file.

use crate::Result;
use crate::variables::{load_variables, merge_variables};
use dotweave_core::Error;
use dotweave_core::path::{expand_tilde, home_dir};
use dotweave_core::platform::CURRENT_PLATFORM;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix identifying template files in the source directory
pub const DEFAULT_TEMPLATE_SUFFIX: &str = ".tmpl";

/// How divergent targets are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Overwrite divergent targets without asking
    #[serde(rename = "overwrite")]
    AutoOverwrite,
    /// Show the diff and ask before overwriting
    #[default]
    Interactive,
}

/// General configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Template store location
    #[serde(default, rename = "srcDir")]
    pub src_dir: Option<PathBuf>,

    /// Home directory override for rendered targets
    #[serde(default, rename = "dstDir")]
    pub dst_dir: Option<PathBuf>,

    /// File suffix that marks a template
    #[serde(default = "default_template_suffix", rename = "templateSuffix")]
    pub template_suffix: String,

    /// Conflict policy for divergent targets
    #[serde(default)]
    pub conflict: ConflictPolicy,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            src_dir: None,
            dst_dir: None,
            template_suffix: default_template_suffix(),
            conflict: ConflictPolicy::default(),
        }
    }
}

/// UI configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Number of context lines for diffs
    #[serde(default = "default_context_lines", rename = "contextLines")]
    pub context_lines: usize,

    /// Enable colored output
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            context_lines: default_context_lines(),
            color: default_color(),
        }
    }
}

/// dotweave configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// General configuration section
    #[serde(default)]
    pub general: GeneralConfig,

    /// Template name to target path; empty means every discovered template
    #[serde(default)]
    pub templates: IndexMap<String, String>,

    /// Template variables
    #[serde(default)]
    pub variables: IndexMap<String, serde_json::Value>,

    /// UI configuration
    #[serde(default)]
    pub ui: UiConfig,

    /// Directory relative paths were resolved against (not serialized)
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

fn default_template_suffix() -> String {
    DEFAULT_TEMPLATE_SUFFIX.to_string()
}

fn default_context_lines() -> usize {
    3
}

fn default_color() -> bool {
    true
}

impl Config {
    /// Load configuration from a file
    ///
    /// Relative paths in the file resolve against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or TOML parsing fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Message(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml_str(&content, base_dir).map_err(|e| {
            Error::Message(format!("Failed to parse config file {}: {e}", path.display()))
        })
    }

    /// Load configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns error if TOML parsing fails
    pub fn from_toml_str(toml_content: &str, base_dir: &Path) -> Result<Self> {
        let mut config: Self = toml::from_str(toml_content)
            .map_err(|e| Error::Message(format!("Failed to parse config TOML: {e}")))?;

        if config.general.template_suffix.is_empty() {
            return Err(Error::Message(
                "general.templateSuffix must not be empty".to_string(),
            ));
        }

        config.resolve_relative_paths(base_dir);
        Ok(config)
    }

    /// Locate and load the configuration
    ///
    /// An explicit path must exist. Otherwise the XDG config file is used when
    /// present, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the chosen file cannot be read or parsed
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "Loading config file");
            return Self::load(path);
        }

        match crate::dirs::default_config_file() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "Loading config file");
                Self::load(path)
            }
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Merge variables files from the source directory
    ///
    /// Values from `[variables]` in the config file take precedence over the
    /// files under `.dotweave/variables/`.
    ///
    /// # Errors
    ///
    /// Returns error if a variables file cannot be read or parsed
    pub fn merge_source_variables(&mut self, source_dir: &Path) -> Result<()> {
        let mut merged = load_variables(source_dir, CURRENT_PLATFORM.os)?;
        merge_variables(&mut merged, std::mem::take(&mut self.variables));
        self.variables = merged;
        Ok(())
    }

    /// Resolve relative paths against `base_dir` and expand `~`
    fn resolve_relative_paths(&mut self, base_dir: &Path) {
        self.base_dir = Some(base_dir.to_path_buf());

        if let Some(ref src_dir) = self.general.src_dir {
            self.general.src_dir = Some(Self::resolve_path(src_dir, base_dir));
        }
        if let Some(ref dst_dir) = self.general.dst_dir {
            self.general.dst_dir = Some(Self::resolve_path(dst_dir, base_dir));
        }
        // Template targets are resolved against the destination, not here
    }

    /// Resolve a single path: expand `~` then anchor relative paths
    fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
        let path = match home_dir() {
            Ok(home) => expand_tilde(&path.to_string_lossy(), home.as_path()),
            Err(_) => path.to_path_buf(),
        };

        if path.is_relative() {
            base_dir.join(path)
        } else {
            path
        }
    }

    /// Directory the config was resolved against, if loaded from disk
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Effective template store location
    ///
    /// # Errors
    ///
    /// Returns error if neither the config nor XDG provide a location
    pub fn source_dir(&self) -> Result<PathBuf> {
        self.general
            .src_dir
            .clone()
            .or_else(crate::dirs::default_source_dir)
            .ok_or_else(|| Error::Message("Could not determine source directory".to_string()))
    }

    /// Effective home directory for targets
    ///
    /// # Errors
    ///
    /// Returns [`Error::HomeDirUnavailable`] when no override is set and the
    /// home directory is unknown
    pub fn dest_dir(&self) -> Result<PathBuf> {
        match &self.general.dst_dir {
            Some(dst_dir) => Ok(dst_dir.clone()),
            None => Ok(home_dir()?.into_path_buf()),
        }
    }
}
