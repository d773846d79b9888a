//! Sync driver
//!
//! Runs every mapping through the renderer and the reconciler, in table order,
//! collecting one outcome per mapping. A failing mapping never stops the run.

use crate::error::{Error, Result};
use crate::mapping::TemplateMapping;
use crate::reconcile::{ReconciliationOutcome, Reconciler};
use dotweave_config::{Config, ConflictPolicy};
use dotweave_core::TemplateStore;
use dotweave_core::path::AbsPath;
use dotweave_template::{RenderContext, Renderer};

/// Settings fixed for one run
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Home directory for default targets and `~` expansion
    pub home: AbsPath,
    /// Template suffix stripped from default targets
    pub template_suffix: String,
    /// Conflict policy for divergent targets
    pub policy: ConflictPolicy,
}

impl SyncSettings {
    /// Derive settings from a loaded configuration
    ///
    /// # Errors
    ///
    /// Returns error if the destination directory is unknown or not absolute
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            home: AbsPath::new(config.dest_dir()?)?,
            template_suffix: config.general.template_suffix.clone(),
            policy: config.general.conflict,
        })
    }

    /// Override the conflict policy
    #[must_use]
    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Outcome for one mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEntry {
    /// The mapping processed
    pub mapping: TemplateMapping,
    /// Resolved target, if resolution succeeded
    pub target: Option<AbsPath>,
    /// What happened
    pub outcome: ReconciliationOutcome,
}

/// Per-kind outcome counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncCounts {
    /// Targets created or replaced
    pub written: usize,
    /// Targets already up to date
    pub unchanged: usize,
    /// Divergent targets the user declined to overwrite
    pub skipped: usize,
    /// Divergent targets awaiting a decision (dry runs)
    pub conflicts: usize,
    /// Mappings that failed
    pub failed: usize,
}

/// Ordered outcomes of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    entries: Vec<SyncEntry>,
}

impl SyncReport {
    /// Entries in mapping-table order
    pub fn entries(&self) -> &[SyncEntry] {
        &self.entries
    }

    /// Outcomes in mapping-table order
    pub fn outcomes(&self) -> impl Iterator<Item = &ReconciliationOutcome> {
        self.entries.iter().map(|e| &e.outcome)
    }

    /// Number of mappings processed
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no mappings were processed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count outcomes by kind
    pub fn counts(&self) -> SyncCounts {
        let mut counts = SyncCounts::default();
        for outcome in self.outcomes() {
            match outcome {
                ReconciliationOutcome::Written => counts.written += 1,
                ReconciliationOutcome::Unchanged => counts.unchanged += 1,
                ReconciliationOutcome::Skipped(_) => counts.skipped += 1,
                ReconciliationOutcome::Conflict => counts.conflicts += 1,
                ReconciliationOutcome::Failed(_) => counts.failed += 1,
            }
        }
        counts
    }

    /// Whether any mapping failed or had its conflict declined
    pub fn has_failures(&self) -> bool {
        self.outcomes().any(ReconciliationOutcome::is_failure)
    }

    /// Entries that failed or were declined
    pub fn failures(&self) -> impl Iterator<Item = &SyncEntry> {
        self.entries.iter().filter(|e| e.outcome.is_failure())
    }
}

/// Drives rendering and reconciliation over a mapping table
pub struct SyncDriver<S> {
    renderer: Renderer<S>,
    reconciler: Reconciler,
    settings: SyncSettings,
}

impl<S: TemplateStore> SyncDriver<S> {
    /// Create a driver with explicit settings
    pub fn new(renderer: Renderer<S>, reconciler: Reconciler, settings: SyncSettings) -> Self {
        Self {
            renderer,
            reconciler,
            settings,
        }
    }

    /// Settings for this driver
    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Process every mapping and return the full report
    pub fn run(&mut self, mappings: &[TemplateMapping], context: &RenderContext) -> SyncReport {
        self.run_with(mappings, context, |_| {})
    }

    /// Like [`SyncDriver::run`], calling `on_entry` as each mapping completes
    pub fn run_with<F>(
        &mut self,
        mappings: &[TemplateMapping],
        context: &RenderContext,
        mut on_entry: F,
    ) -> SyncReport
    where
        F: FnMut(&SyncEntry),
    {
        let mut report = SyncReport::default();

        for mapping in mappings {
            let entry = self.process(mapping, context);
            match &entry.outcome {
                ReconciliationOutcome::Failed(reason) => {
                    tracing::warn!(name = %mapping.source_name, %reason, "Mapping failed");
                }
                outcome => {
                    tracing::debug!(name = %mapping.source_name, outcome = outcome.kind(), "Mapping processed");
                }
            }
            on_entry(&entry);
            report.entries.push(entry);
        }

        report
    }

    fn process(&mut self, mapping: &TemplateMapping, context: &RenderContext) -> SyncEntry {
        let target = match mapping.resolve_target(&self.settings.home, &self.settings.template_suffix) {
            Ok(target) => target,
            Err(e) => return Self::failed(mapping, None, &e),
        };

        let rendered = match self.renderer.render(&mapping.source_name, context) {
            Ok(rendered) => rendered,
            Err(e) => return Self::failed(mapping, Some(target), &Error::Render(e)),
        };

        let outcome = self
            .reconciler
            .reconcile(&rendered.bytes, &target, self.settings.policy);

        SyncEntry {
            mapping: mapping.clone(),
            target: Some(target),
            outcome,
        }
    }

    fn failed(mapping: &TemplateMapping, target: Option<AbsPath>, error: &Error) -> SyncEntry {
        SyncEntry {
            mapping: mapping.clone(),
            target,
            outcome: ReconciliationOutcome::Failed(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    fn entry(outcome: ReconciliationOutcome) -> SyncEntry {
        SyncEntry {
            mapping: TemplateMapping::with_default_target("x.tmpl"),
            target: None,
            outcome,
        }
    }

    #[test]
    fn test_counts_and_failures() {
        let report = SyncReport {
            entries: vec![
                entry(ReconciliationOutcome::Written),
                entry(ReconciliationOutcome::Unchanged),
                entry(ReconciliationOutcome::Unchanged),
                entry(ReconciliationOutcome::Skipped("declined".to_string())),
                entry(ReconciliationOutcome::Failed("boom".to_string())),
                entry(ReconciliationOutcome::Conflict),
            ],
        };

        assert_eq!(
            report.counts(),
            SyncCounts {
                written: 1,
                unchanged: 2,
                skipped: 1,
                conflicts: 1,
                failed: 1,
            }
        );
        assert!(report.has_failures());
        assert_eq!(report.failures().count(), 2);
        assert_eq!(report.len(), 6);
    }

    #[test]
    fn test_empty_report_is_success() {
        let report = SyncReport::default();
        assert!(report.is_empty());
        assert!(!report.has_failures());
    }

    #[test]
    fn test_settings_from_config() {
        let config = dotweave_config::Config::from_toml_str(
            "[general]\ndstDir = \"/home/tester\"\nconflict = \"overwrite\"\n",
            std::path::Path::new("/"),
        )
        .unwrap();
        let settings = SyncSettings::from_config(&config).unwrap();
        assert_eq!(settings.home.as_path(), std::path::Path::new("/home/tester"));
        assert_eq!(settings.policy, ConflictPolicy::AutoOverwrite);
        assert_eq!(
            settings.with_policy(ConflictPolicy::Interactive).policy,
            ConflictPolicy::Interactive
        );
    }
}
