//! Common utilities and types shared across CLI commands

use anyhow::{Context, Result};
use dotweave_config::Config;
use dotweave_core::TemplateStore;
use dotweave_core::path::AbsPath;
use dotweave_engine::{SyncSettings, TemplateMapping, filter_mappings, mappings_from_config};
use dotweave_template::{DirTemplateStore, RenderContext, SystemContextProvider};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::CommandError;

/// Runtime context for CLI commands
///
/// Holds the loaded configuration and the two directories every command
/// works with. Built once per invocation and passed explicitly to commands.
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    /// Shared configuration, with source variables already merged
    pub config: Arc<Config>,
    source_dir: AbsPath,
    dest_dir: AbsPath,
}

impl RuntimeContext {
    /// Load configuration and apply command-line overrides
    ///
    /// `source` and `dest` take precedence over the config file and are
    /// resolved against the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file or variable files cannot be loaded,
    /// or if either directory cannot be determined.
    pub fn load(config_path: Option<&Path>, source: Option<&Path>, dest: Option<&Path>) -> Result<Self> {
        let mut config = Config::discover(config_path).context("Failed to load configuration")?;

        if let Some(source) = source {
            config.general.src_dir = Some(absolute(source)?);
        }
        if let Some(dest) = dest {
            config.general.dst_dir = Some(absolute(dest)?);
        }

        Self::new(config)
    }

    /// Create a context from an already-loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be determined or the variable
    /// files in the source directory are invalid.
    pub fn new(mut config: Config) -> Result<Self> {
        let source_dir = AbsPath::new(absolute(&config.source_dir()?)?)?;
        let dest_dir = AbsPath::new(absolute(&config.dest_dir()?)?)?;
        config.general.dst_dir = Some(dest_dir.as_path().to_path_buf());

        config
            .merge_source_variables(source_dir.as_path())
            .with_context(|| format!("Failed to load variables from {source_dir}"))?;

        tracing::debug!(source = %source_dir, dest = %dest_dir, "Resolved directories");

        Ok(Self {
            config: Arc::new(config),
            source_dir,
            dest_dir,
        })
    }

    /// Template store location
    #[inline]
    pub fn source_dir(&self) -> &AbsPath {
        &self.source_dir
    }

    /// Home directory targets are rendered into
    #[inline]
    pub fn dest_dir(&self) -> &AbsPath {
        &self.dest_dir
    }

    /// Open the template store
    ///
    /// # Errors
    ///
    /// Returns an error if the store root is missing or unreadable. Commands
    /// abort on it before touching any mapping.
    pub fn store(&self) -> Result<DirTemplateStore> {
        let store = DirTemplateStore::new(
            self.source_dir.as_path().to_path_buf(),
            self.config.general.template_suffix.clone(),
        )?;
        store.check()?;
        Ok(store)
    }

    /// Build the render context for this run
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be serialized
    pub fn render_context(&self) -> Result<RenderContext> {
        let provider = SystemContextProvider::new(
            self.source_dir.as_path().to_path_buf(),
            self.dest_dir.as_path().to_path_buf(),
        )
        .with_variables(self.config.variables.clone());

        RenderContext::from_provider(&provider).context("Failed to build render context")
    }

    /// Mapping table for this run, narrowed to `names` when given
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnknownTemplates`] if a name matches no mapping,
    /// or an error if the store cannot be listed.
    pub fn mappings(
        &self,
        store: &dyn TemplateStore,
        names: &[String],
    ) -> crate::error::Result<Vec<TemplateMapping>> {
        let all = mappings_from_config(&self.config, store)?;
        let (kept, unmatched) = filter_mappings(all, names);
        if !unmatched.is_empty() {
            return Err(CommandError::UnknownTemplates(unmatched));
        }
        Ok(kept)
    }

    /// Settings for the sync driver
    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            home: self.dest_dir.clone(),
            template_suffix: self.config.general.template_suffix.clone(),
            policy: self.config.general.conflict,
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("Invalid path: {}", path.display()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use dotweave_config::ConflictPolicy;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn context_for(source: &TempDir, home: &TempDir, extra: &str) -> RuntimeContext {
        let toml = format!(
            "[general]\nsrcDir = {:?}\ndstDir = {:?}\n{extra}",
            source.path(),
            home.path()
        );
        let config = Config::from_toml_str(&toml, Path::new("/")).unwrap();
        RuntimeContext::new(config).unwrap()
    }

    #[test]
    fn test_variables_files_are_merged() {
        let source = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        let vars_dir = source.path().join(".dotweave/variables");
        fs::create_dir_all(&vars_dir).unwrap();
        fs::write(vars_dir.join("git.toml"), "email = \"file@example.com\"\n").unwrap();

        let context = context_for(&source, &home, "[variables]\nname = \"Ada\"\n");
        let render = context.render_context().unwrap();

        assert_eq!(render.lookup("git.email"), Some(&json!("file@example.com")));
        assert_eq!(render.lookup("name"), Some(&json!("Ada")));
        assert_eq!(
            render.lookup("dotweave.dstDir"),
            Some(&json!(home.path().to_string_lossy()))
        );
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        let source = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(source.path().join("bashrc.tmpl"), "x").unwrap();

        let context = context_for(&source, &home, "");
        let store = context.store().unwrap();

        let mappings = context.mappings(&store, &["bashrc.tmpl".to_string()]).unwrap();
        assert_eq!(mappings, [TemplateMapping::with_default_target("bashrc.tmpl")]);

        let err = context
            .mappings(&store, &["nope.tmpl".to_string()])
            .unwrap_err();
        assert!(matches!(err, CommandError::UnknownTemplates(names) if names == ["nope.tmpl"]));
    }

    #[test]
    fn test_sync_settings_follow_config() {
        let source = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        let context = context_for(&source, &home, "conflict = \"overwrite\"\n");

        let settings = context.sync_settings();
        assert_eq!(settings.home.as_path(), home.path());
        assert_eq!(settings.policy, ConflictPolicy::AutoOverwrite);
        assert_eq!(settings.template_suffix, ".tmpl");
    }
}
