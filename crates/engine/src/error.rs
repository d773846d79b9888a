//! Error types for dotweave-engine
//!
//! Every variant here is scoped to a single mapping. The sync driver turns
//! them into per-mapping outcomes instead of aborting the run.

use dotweave_core::path::AbsPath;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for dotweave-engine
#[derive(Error, Debug)]
pub enum Error {
    /// The existing target could not be read
    #[error("Failed to read {path}: {source}")]
    ReadFailure {
        /// Target path
        path: AbsPath,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// The target (or its directory) could not be written
    #[error("Failed to write {path}: {source}")]
    TargetUnwritable {
        /// Target path
        path: AbsPath,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// The user declined to overwrite a divergent target
    #[error("'{path}' changed but already exists")]
    ConflictDeclined {
        /// Target left untouched
        path: AbsPath,
    },

    /// The diff could not be computed or displayed
    #[error("Failed to diff {path}: {message}")]
    Diff {
        /// Target path
        path: AbsPath,
        /// What went wrong
        message: String,
    },

    /// Rendering failed
    #[error(transparent)]
    Render(#[from] dotweave_template::Error),

    /// A mapping cannot be resolved to a target
    #[error("Invalid mapping for '{name}': {reason}")]
    InvalidMapping {
        /// Template name of the mapping
        name: String,
        /// Why the target is unusable
        reason: String,
    },

    /// Core error
    #[error(transparent)]
    Core(#[from] dotweave_core::Error),
}
