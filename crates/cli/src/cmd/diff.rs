//! Diff command implementation
//!
//! Render templates and show how their targets would change. Never writes.

use clap::Args;
use dotweave_config::ConflictPolicy;
use dotweave_core::ConfirmationOracle;
use dotweave_engine::{
    DiffSink, DryRunSystem, ReconciliationOutcome, Reconciler, SyncDriver, SyncReport,
};
use dotweave_template::Renderer;
use owo_colors::OwoColorize;
use std::io::{self, Write};

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::{CommandError, Result};
use crate::ui::DiffViewer;

/// Diff command arguments
#[derive(Debug, Default, Args)]
pub struct DiffCommand {
    /// Template names to diff (all mapped templates if omitted)
    #[arg(value_name = "NAMES")]
    pub names: Vec<String>,
}

/// Dry runs never ask
struct NoPrompt;

impl ConfirmationOracle for NoPrompt {
    fn confirm(&mut self, _prompt: &str, _default: bool) -> bool {
        false
    }
}

impl Command for DiffCommand {
    type Output = SyncReport;

    fn execute(&self, context: &RuntimeContext) -> Result<SyncReport> {
        let viewer = DiffViewer::new(io::stdout(), context.config.ui.color);
        self.run_with(context, Box::new(viewer), &mut io::stdout())
    }
}

impl DiffCommand {
    /// Run with an explicit diff sink and status output
    ///
    /// Divergent targets have their diff sent to `sink`; new targets and
    /// failures are reported on `out`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::SyncFailed`] if any template failed to render
    /// or its target could not be read.
    pub fn run_with(
        &self,
        context: &RuntimeContext,
        sink: Box<dyn DiffSink>,
        out: &mut dyn Write,
    ) -> Result<SyncReport> {
        let store = context.store()?;
        let mappings = context.mappings(&store, &self.names)?;
        let render_context = context.render_context()?;

        // Interactive under a dry run shows every diff and never prompts
        let settings = context
            .sync_settings()
            .with_policy(ConflictPolicy::Interactive);
        let reconciler = Reconciler::new(Box::new(DryRunSystem::new()), Box::new(NoPrompt), sink)
            .with_context_lines(context.config.ui.context_lines)
            .dry_run(true);

        let mut driver = SyncDriver::new(Renderer::new(store), reconciler, settings);
        let mut output_error = None;
        let report = driver.run_with(&mappings, &render_context, |entry| {
            let line = match &entry.outcome {
                ReconciliationOutcome::Written => entry
                    .target
                    .as_ref()
                    .map(|target| format!("{} {target}", "new file:".bright_green())),
                ReconciliationOutcome::Failed(reason) => Some(format!(
                    "{} {}: {reason}",
                    "error:".bright_red(),
                    entry.mapping.source_name
                )),
                _ => None,
            };
            if let Some(line) = line
                && let Err(e) = writeln!(out, "{line}")
                && output_error.is_none()
            {
                output_error = Some(e);
            }
        });
        if let Some(e) = output_error {
            return Err(e.into());
        }

        let counts = report.counts();
        if counts.failed > 0 {
            return Err(CommandError::SyncFailed {
                failed: counts.failed,
                declined: 0,
                total: report.len(),
            });
        }

        Ok(report)
    }
}
