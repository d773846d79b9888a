//! Reconciliation of rendered output with existing targets
//!
//! For one rendered output and one target the reconciler decides between
//! writing, leaving the target alone, or asking the user, according to the
//! configured conflict policy.

use crate::diff::{Comparison, DEFAULT_CONTEXT_LINES, compare};
use crate::error::{Error, Result};
use crate::system::System;
use dotweave_config::ConflictPolicy;
use dotweave_core::ConfirmationOracle;
use dotweave_core::path::AbsPath;
use std::fmt;
use std::io::{self, Write};

/// What happened to one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    /// Target was created or replaced
    Written,
    /// Divergent target left in place because the user declined
    Skipped(String),
    /// Target already had the rendered content
    Unchanged,
    /// Divergent target that needs a decision (dry runs only)
    Conflict,
    /// Mapping could not be processed
    Failed(String),
}

impl ReconciliationOutcome {
    /// Short lowercase name of the outcome kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Written => "written",
            Self::Skipped(_) => "skipped",
            Self::Unchanged => "unchanged",
            Self::Conflict => "conflict",
            Self::Failed(_) => "failed",
        }
    }

    /// Failure or declined-conflict message, if any
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Skipped(reason) | Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Whether this outcome makes the run unsuccessful
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::Skipped(_))
    }
}

impl fmt::Display for ReconciliationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "{}: {reason}", self.kind()),
            None => f.write_str(self.kind()),
        }
    }
}

/// Destination for diffs shown before a decision
pub trait DiffSink {
    /// Display the diff for `target`
    fn show_diff(&mut self, target: &AbsPath, diff: &str) -> io::Result<()>;
}

/// Writes diffs verbatim to any writer
pub struct WriterSink<W>(pub W);

impl<W: Write> DiffSink for WriterSink<W> {
    fn show_diff(&mut self, _target: &AbsPath, diff: &str) -> io::Result<()> {
        self.0.write_all(diff.as_bytes())?;
        self.0.flush()
    }
}

/// Discards diffs
pub struct NullSink;

impl DiffSink for NullSink {
    fn show_diff(&mut self, _target: &AbsPath, _diff: &str) -> io::Result<()> {
        Ok(())
    }
}

/// Compares rendered output with a target and applies the conflict policy
pub struct Reconciler {
    system: Box<dyn System>,
    oracle: Box<dyn ConfirmationOracle>,
    sink: Box<dyn DiffSink>,
    context_lines: usize,
    dry_run: bool,
}

impl Reconciler {
    /// Create a reconciler
    pub fn new(
        system: Box<dyn System>,
        oracle: Box<dyn ConfirmationOracle>,
        sink: Box<dyn DiffSink>,
    ) -> Self {
        Self {
            system,
            oracle,
            sink,
            context_lines: DEFAULT_CONTEXT_LINES,
            dry_run: false,
        }
    }

    /// Set the number of diff context lines
    #[must_use]
    pub fn with_context_lines(mut self, context_lines: usize) -> Self {
        self.context_lines = context_lines;
        self
    }

    /// Never prompt; divergent targets under the interactive policy become
    /// [`ReconciliationOutcome::Conflict`] and their diff is still shown
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Reconcile one rendered output with its target
    ///
    /// Never returns an error: I/O problems become
    /// [`ReconciliationOutcome::Failed`] so the caller can continue.
    pub fn reconcile(
        &mut self,
        rendered: &[u8],
        target: &AbsPath,
        policy: ConflictPolicy,
    ) -> ReconciliationOutcome {
        match self.try_reconcile(rendered, target, policy) {
            Ok(outcome) => outcome,
            Err(declined @ Error::ConflictDeclined { .. }) => {
                ReconciliationOutcome::Skipped(declined.to_string())
            }
            Err(e) => ReconciliationOutcome::Failed(e.to_string()),
        }
    }

    fn try_reconcile(
        &mut self,
        rendered: &[u8],
        target: &AbsPath,
        policy: ConflictPolicy,
    ) -> Result<ReconciliationOutcome> {
        let Some(current) = self.system.read_target(target)? else {
            tracing::debug!(path = %target, "Target absent");
            self.system.write_file(target, rendered)?;
            return Ok(ReconciliationOutcome::Written);
        };

        let diff = match compare(&current, rendered, &target.to_string(), self.context_lines) {
            Comparison::Identical => return Ok(ReconciliationOutcome::Unchanged),
            Comparison::Differs { diff } if diff.is_empty() => {
                return Ok(ReconciliationOutcome::Unchanged);
            }
            Comparison::Differs { diff } => diff,
        };

        tracing::debug!(path = %target, ?policy, "Target diverges");

        if policy == ConflictPolicy::Interactive || self.dry_run {
            self.sink
                .show_diff(target, &diff)
                .map_err(|e| Error::Diff {
                    path: target.clone(),
                    message: e.to_string(),
                })?;
        }

        match policy {
            ConflictPolicy::AutoOverwrite => {}
            ConflictPolicy::Interactive if self.dry_run => {
                return Ok(ReconciliationOutcome::Conflict);
            }
            ConflictPolicy::Interactive => {
                let prompt = format!("'{target}' already exists. Overwrite?");
                if !self.oracle.confirm(&prompt, true) {
                    return Err(Error::ConflictDeclined {
                        path: target.clone(),
                    });
                }
            }
        }

        self.system.write_file(target, rendered)?;
        Ok(ReconciliationOutcome::Written)
    }
}
