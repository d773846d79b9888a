//! # Dotweave Engine
//!
//! Turns rendered templates into files on disk.
//!
//! - **Mappings**: which template renders into which target
//! - **Diff**: byte comparison and unified diffs of current versus rendered content
//! - **Reconciliation**: the per-target decision under a conflict policy
//! - **Sync**: drives a whole mapping table and reports one outcome per mapping
//! - **System Abstraction**: filesystem operations abstracted for dry runs and testing

pub mod diff;
pub mod error;
pub mod mapping;
pub mod reconcile;
pub mod sync;
pub mod system;

pub use dotweave_config::ConflictPolicy;
pub use dotweave_core::path::AbsPath;

pub use error::{Error, Result};
pub use mapping::{TemplateMapping, filter_mappings, mappings_from_config};
pub use reconcile::{DiffSink, NullSink, ReconciliationOutcome, Reconciler, WriterSink};
pub use sync::{SyncCounts, SyncDriver, SyncEntry, SyncReport, SyncSettings};
pub use system::{DryRunSystem, RealSystem, System};
