//! Variables command implementation
//!
//! Print the render context templates see, as pretty JSON.

use anyhow::{Context, anyhow};
use clap::Args;
use std::io::{self, Write};

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;

/// Variables command arguments
#[derive(Debug, Default, Args)]
pub struct VariablesCommand {
    /// Only print the value at this dotted path (e.g. `system.os`)
    #[arg(value_name = "KEY")]
    pub key: Option<String>,
}

impl Command for VariablesCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        self.run_with(context, &mut io::stdout())
    }
}

impl VariablesCommand {
    /// Write the context (or one value of it) to `out`
    ///
    /// # Errors
    ///
    /// Returns error if the key is not in the context or output fails
    pub fn run_with(&self, context: &RuntimeContext, out: &mut dyn Write) -> Result<()> {
        let render_context = context.render_context()?;

        let json = match &self.key {
            Some(key) => {
                let value = render_context
                    .lookup(key)
                    .ok_or_else(|| anyhow!("No variable named '{key}'"))?;
                serde_json::to_string_pretty(value)
            }
            None => serde_json::to_string_pretty(&render_context),
        }
        .context("Failed to serialize variables")?;

        writeln!(out, "{json}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use dotweave_config::Config;
    use std::path::Path;
    use tempfile::TempDir;

    fn context(source: &TempDir, home: &TempDir) -> RuntimeContext {
        let toml = format!(
            "[general]\nsrcDir = {:?}\ndstDir = {:?}\n\n[variables]\neditor = {{ command = \"nvim\" }}\n",
            source.path(),
            home.path()
        );
        RuntimeContext::new(Config::from_toml_str(&toml, Path::new("/")).unwrap()).unwrap()
    }

    #[test]
    fn test_prints_whole_context() {
        let source = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        let mut out = Vec::new();

        VariablesCommand::default()
            .run_with(&context(&source, &home), &mut out)
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(value.get("system").is_some());
        assert!(value.get("env").is_some());
        assert_eq!(value["editor"]["command"], "nvim");
        assert_eq!(value["dotweave"]["dstDir"], &*home.path().to_string_lossy());
    }

    #[test]
    fn test_prints_single_key() {
        let source = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        let mut out = Vec::new();

        VariablesCommand {
            key: Some("editor.command".to_string()),
        }
        .run_with(&context(&source, &home), &mut out)
        .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "\"nvim\"\n");
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        let source = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();

        let result = VariablesCommand {
            key: Some("nope".to_string()),
        }
        .run_with(&context(&source, &home), &mut Vec::new());

        assert!(result.unwrap_err().to_string().contains("nope"));
    }
}
