//! Apply command implementation
//!
//! Render every mapped template and reconcile it with its target.

use clap::Args;
use dotweave_config::ConflictPolicy;
use dotweave_core::ConfirmationOracle;
use dotweave_engine::{
    DiffSink, DryRunSystem, RealSystem, Reconciler, SyncDriver, SyncReport, System,
};
use dotweave_template::Renderer;
use std::io::{self, Write};

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::{CommandError, Result};
use crate::stats;
use crate::ui::{DiffViewer, LineConfirmation};

/// Apply command arguments
#[derive(Debug, Default, Args)]
pub struct ApplyCommand {
    /// Template names to apply (all mapped templates if omitted)
    #[arg(value_name = "NAMES")]
    pub names: Vec<String>,

    /// Overwrite divergent targets without asking
    #[arg(short, long)]
    pub force: bool,

    /// Show what would change without writing or prompting
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl Command for ApplyCommand {
    type Output = SyncReport;

    fn execute(&self, context: &RuntimeContext) -> Result<SyncReport> {
        let oracle = LineConfirmation::stdio();
        let viewer = DiffViewer::new(io::stdout(), context.config.ui.color);
        self.run_with(context, Box::new(oracle), Box::new(viewer), &mut io::stdout())
    }
}

impl ApplyCommand {
    /// Run with explicit terminal collaborators
    ///
    /// Status lines and the summary go to `out`; prompts and diffs go through
    /// `oracle` and `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::SyncFailed`] when any mapping failed or was
    /// declined, after every mapping has been processed. Errors raised before
    /// the run starts (unknown names, unreadable store) abort it.
    pub fn run_with(
        &self,
        context: &RuntimeContext,
        oracle: Box<dyn ConfirmationOracle>,
        sink: Box<dyn DiffSink>,
        out: &mut dyn Write,
    ) -> Result<SyncReport> {
        let store = context.store()?;
        let mappings = context.mappings(&store, &self.names)?;
        let render_context = context.render_context()?;

        let mut settings = context.sync_settings();
        if self.force {
            settings = settings.with_policy(ConflictPolicy::AutoOverwrite);
        }

        let system: Box<dyn System> = if self.dry_run {
            Box::new(DryRunSystem::new())
        } else {
            Box::new(RealSystem)
        };
        let reconciler = Reconciler::new(system, oracle, sink)
            .with_context_lines(context.config.ui.context_lines)
            .dry_run(self.dry_run);

        tracing::info!(
            count = mappings.len(),
            dry_run = self.dry_run,
            policy = ?settings.policy,
            "Applying templates"
        );

        let mut driver = SyncDriver::new(Renderer::new(store), reconciler, settings);
        let mut output_error = None;
        let report = driver.run_with(&mappings, &render_context, |entry| {
            if let Err(e) = stats::write_entry(out, entry, self.dry_run)
                && output_error.is_none()
            {
                output_error = Some(e);
            }
        });
        if let Some(e) = output_error {
            return Err(e.into());
        }

        writeln!(out)?;
        let counts = report.counts();
        stats::write_summary(out, &counts, self.dry_run)?;

        if report.has_failures() {
            return Err(CommandError::SyncFailed {
                failed: counts.failed,
                declined: counts.skipped,
                total: report.len(),
            });
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use dotweave_config::Config;
    use dotweave_engine::{NullSink, ReconciliationOutcome};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    struct Always(bool);

    impl ConfirmationOracle for Always {
        fn confirm(&mut self, _prompt: &str, _default: bool) -> bool {
            self.0
        }
    }

    struct Fixture {
        source: TempDir,
        home: TempDir,
    }

    impl Fixture {
        fn new(templates: &[(&str, &str)]) -> Self {
            let source = TempDir::new().unwrap();
            for (name, body) in templates {
                fs::write(source.path().join(name), body).unwrap();
            }
            Self {
                source,
                home: TempDir::new().unwrap(),
            }
        }

        fn context(&self) -> RuntimeContext {
            let toml = format!(
                "[general]\nsrcDir = {:?}\ndstDir = {:?}\n\n[variables]\nname = \"Ada\"\n",
                self.source.path(),
                self.home.path()
            );
            RuntimeContext::new(Config::from_toml_str(&toml, Path::new("/")).unwrap()).unwrap()
        }

        fn apply(&self, command: &ApplyCommand, answer: bool) -> (Result<SyncReport>, String) {
            let mut out = Vec::new();
            let result = command.run_with(
                &self.context(),
                Box::new(Always(answer)),
                Box::new(NullSink),
                &mut out,
            );
            (result, String::from_utf8(out).unwrap())
        }
    }

    #[test]
    fn test_apply_writes_and_reports() {
        let fixture = Fixture::new(&[("bashrc.tmpl", "# {{ name }}\n")]);

        let (result, output) = fixture.apply(&ApplyCommand::default(), false);

        let report = result.unwrap();
        assert_eq!(report.counts().written, 1);
        assert_eq!(
            fs::read_to_string(fixture.home.path().join(".bashrc")).unwrap(),
            "# Ada\n"
        );
        let status = output.lines().next().unwrap();
        assert!(status.contains("bashrc.tmpl"));
        assert!(status.contains(&fixture.home.path().join(".bashrc").display().to_string()));
        assert!(output.contains("unchanged"));
    }

    #[test]
    fn test_declined_conflict_fails_the_run() {
        let fixture = Fixture::new(&[("bashrc.tmpl", "# {{ name }}\n")]);
        fs::write(fixture.home.path().join(".bashrc"), "# mine\n").unwrap();

        let (result, _) = fixture.apply(&ApplyCommand::default(), false);

        let err = result.unwrap_err();
        assert!(matches!(
            err,
            CommandError::SyncFailed {
                failed: 0,
                declined: 1,
                total: 1
            }
        ));
        assert_eq!(
            fs::read_to_string(fixture.home.path().join(".bashrc")).unwrap(),
            "# mine\n"
        );
    }

    #[test]
    fn test_force_overwrites_without_asking() {
        let fixture = Fixture::new(&[("bashrc.tmpl", "# {{ name }}\n")]);
        fs::write(fixture.home.path().join(".bashrc"), "# mine\n").unwrap();
        let command = ApplyCommand {
            force: true,
            ..ApplyCommand::default()
        };

        let (result, _) = fixture.apply(&command, false);

        assert_eq!(result.unwrap().counts().written, 1);
        assert_eq!(
            fs::read_to_string(fixture.home.path().join(".bashrc")).unwrap(),
            "# Ada\n"
        );
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let fixture = Fixture::new(&[("bashrc.tmpl", "new\n"), ("vimrc.tmpl", "new\n")]);
        fs::write(fixture.home.path().join(".vimrc"), "old\n").unwrap();
        let command = ApplyCommand {
            dry_run: true,
            ..ApplyCommand::default()
        };

        let (result, output) = fixture.apply(&command, true);

        let report = result.unwrap();
        let outcomes: Vec<_> = report.outcomes().cloned().collect();
        assert_eq!(
            outcomes,
            [ReconciliationOutcome::Written, ReconciliationOutcome::Conflict]
        );
        assert!(!fixture.home.path().join(".bashrc").exists());
        assert_eq!(
            fs::read_to_string(fixture.home.path().join(".vimrc")).unwrap(),
            "old\n"
        );
        assert!(output.contains("would write"));
    }

    #[test]
    fn test_names_filter_and_failure_count() {
        let fixture = Fixture::new(&[("a.tmpl", "{{ undefined_thing }}\n"), ("b.tmpl", "b\n")]);
        let command = ApplyCommand {
            names: vec!["b.tmpl".to_string(), "a.tmpl".to_string()],
            ..ApplyCommand::default()
        };

        let (result, output) = fixture.apply(&command, true);

        assert!(matches!(
            result.unwrap_err(),
            CommandError::SyncFailed {
                failed: 1,
                declined: 0,
                total: 2
            }
        ));
        assert!(fixture.home.path().join(".b").exists());
        assert!(!fixture.home.path().join(".a").exists());
        assert!(output.contains("undefined_thing"));
    }

    #[test]
    fn test_missing_store_aborts_configured_run() {
        let fixture = Fixture::new(&[]);
        let toml = format!(
            "[general]\nsrcDir = {:?}\ndstDir = {:?}\n\n[templates]\n\"bashrc.tmpl\" = \"\"\n\"vimrc.tmpl\" = \"\"\n",
            fixture.source.path().join("absent"),
            fixture.home.path()
        );
        let context =
            RuntimeContext::new(Config::from_toml_str(&toml, Path::new("/")).unwrap()).unwrap();
        let mut out = Vec::new();

        let err = ApplyCommand::default()
            .run_with(&context, Box::new(Always(true)), Box::new(NullSink), &mut out)
            .unwrap_err();

        assert!(!matches!(err, CommandError::SyncFailed { .. }));
        assert!(format!("{err:#}").contains("not accessible"));
        assert!(out.is_empty());
        assert!(!fixture.home.path().join(".bashrc").exists());
    }

    #[test]
    fn test_unknown_name_aborts_before_writing() {
        let fixture = Fixture::new(&[("a.tmpl", "a\n")]);
        let command = ApplyCommand {
            names: vec!["zzz.tmpl".to_string()],
            ..ApplyCommand::default()
        };

        let (result, _) = fixture.apply(&command, true);

        assert!(matches!(result.unwrap_err(), CommandError::UnknownTemplates(_)));
        assert!(!fixture.home.path().join(".a").exists());
    }
}
