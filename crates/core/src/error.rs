//! Base error types for dotweave
//!
//! This module provides the foundation error types that all crates can use.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Path is not absolute
    #[error("Path must be absolute: {path}")]
    PathNotAbsolute {
        /// Offending path
        path: PathBuf,
    },

    /// Path is not relative
    #[error("Path must be relative: {path}")]
    PathNotRelative {
        /// Offending path
        path: PathBuf,
    },

    /// Invalid path prefix
    #[error("Path {} is not under base directory {}", path.display(), base.display())]
    InvalidPathPrefix {
        /// Path that was stripped
        path: Arc<PathBuf>,
        /// Expected base directory
        base: Arc<PathBuf>,
    },

    /// Home directory could not be determined
    #[error("Could not determine home directory")]
    HomeDirUnavailable,

    /// Template name does not resolve to a readable template
    #[error("Template not found: {name}")]
    TemplateNotFound {
        /// Requested template name
        name: String,
    },

    /// Template store directory cannot be read at all
    #[error("Template store {} is not accessible: {source}", path.display())]
    StoreUnavailable {
        /// Store root
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
