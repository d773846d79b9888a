//! Template to target mappings

use crate::error::{Error, Result};
use dotweave_config::Config;
use dotweave_core::TemplateStore;
use dotweave_core::path::{AbsPath, expand_tilde};
use std::fmt;

/// One template and the file it renders into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMapping {
    /// Template name relative to the store
    pub source_name: String,
    /// Configured target; empty means the default derived from the name
    pub target_path: String,
}

impl TemplateMapping {
    /// Create a mapping
    pub fn new(source_name: impl Into<String>, target_path: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            target_path: target_path.into(),
        }
    }

    /// Create a mapping that uses the default target
    pub fn with_default_target(source_name: impl Into<String>) -> Self {
        Self::new(source_name, String::new())
    }

    /// Resolve the absolute target path
    ///
    /// An empty target becomes `<home>/.<name without suffix>`. A leading `~`
    /// expands to `home`. Anything else must already be absolute.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMapping`] for an empty source name or a
    /// relative target path
    ///
    /// # Examples
    ///
    /// ```
    /// use dotweave_core::path::AbsPath;
    /// use dotweave_engine::TemplateMapping;
    ///
    /// let home = AbsPath::new("/home/user".into()).unwrap();
    ///
    /// let target = TemplateMapping::with_default_target("bashrc.tmpl")
    ///     .resolve_target(&home, ".tmpl")
    ///     .unwrap();
    /// assert_eq!(target.as_path().to_str(), Some("/home/user/.bashrc"));
    ///
    /// let target = TemplateMapping::new("gitconfig.tmpl", "~/.config/git/config")
    ///     .resolve_target(&home, ".tmpl")
    ///     .unwrap();
    /// assert_eq!(target.as_path().to_str(), Some("/home/user/.config/git/config"));
    /// ```
    pub fn resolve_target(&self, home: &AbsPath, suffix: &str) -> Result<AbsPath> {
        if self.source_name.is_empty() {
            return Err(self.invalid("template name is empty"));
        }

        let path = if self.target_path.is_empty() {
            home.as_path()
                .join(default_target_name(&self.source_name, suffix))
        } else {
            expand_tilde(&self.target_path, home.as_path())
        };

        if path.is_relative() {
            return Err(self.invalid(format!(
                "target '{}' must be absolute or start with ~",
                self.target_path
            )));
        }

        Ok(AbsPath::new(path)?)
    }

    fn invalid(&self, reason: impl Into<String>) -> Error {
        Error::InvalidMapping {
            name: self.source_name.clone(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TemplateMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.target_path.is_empty() {
            write!(f, "{}", self.source_name)
        } else {
            write!(f, "{} -> {}", self.source_name, self.target_path)
        }
    }
}

/// Default target name for a template, relative to home
///
/// Strips `suffix` and prefixes a dot unless the name already starts with one.
///
/// # Examples
///
/// ```
/// use dotweave_engine::mapping::default_target_name;
///
/// assert_eq!(default_target_name("bashrc.tmpl", ".tmpl"), ".bashrc");
/// assert_eq!(default_target_name(".vimrc.tmpl", ".tmpl"), ".vimrc");
/// assert_eq!(default_target_name("config/nvim/init.lua.tmpl", ".tmpl"), ".config/nvim/init.lua");
/// ```
#[must_use]
pub fn default_target_name(source_name: &str, suffix: &str) -> String {
    let stem = source_name.strip_suffix(suffix).unwrap_or(source_name);
    if stem.starts_with('.') {
        stem.to_string()
    } else {
        format!(".{stem}")
    }
}

/// Build the mapping table for a run
///
/// The configured `[templates]` table is used in file order. When it is empty,
/// every template the store discovers is mapped to its default target.
///
/// # Errors
///
/// Returns error if the table is empty and the store cannot be listed
pub fn mappings_from_config(config: &Config, store: &dyn TemplateStore) -> Result<Vec<TemplateMapping>> {
    if !config.templates.is_empty() {
        return Ok(config
            .templates
            .iter()
            .map(|(name, target)| TemplateMapping::new(name.clone(), target.clone()))
            .collect());
    }

    Ok(store
        .list_templates()?
        .into_iter()
        .map(TemplateMapping::with_default_target)
        .collect())
}

/// Keep only mappings whose source name is in `names`, preserving table order
///
/// An empty filter keeps everything. Returns the filtered table and the names
/// that matched nothing.
pub fn filter_mappings(mappings: Vec<TemplateMapping>, names: &[String]) -> (Vec<TemplateMapping>, Vec<String>) {
    if names.is_empty() {
        return (mappings, Vec::new());
    }

    let unmatched = names
        .iter()
        .filter(|name| !mappings.iter().any(|m| &m.source_name == *name))
        .cloned()
        .collect();

    let kept = mappings
        .into_iter()
        .filter(|m| names.contains(&m.source_name))
        .collect();

    (kept, unmatched)
}
