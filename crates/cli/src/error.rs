//! Error types for CLI commands
//!
//! Command-level failures get their own variants so the exit path can report
//! them precisely. Everything that aborts a run before any mapping is processed
//! arrives through `Other` with `anyhow` context attached.

use thiserror::Error;

/// Errors that can occur during command execution
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// At least one mapping failed or had its conflict declined
    #[error("Apply failed: {failed} failed and {declined} declined out of {total} templates")]
    SyncFailed {
        /// Mappings whose outcome was `Failed`
        failed: usize,
        /// Divergent targets the user chose to keep
        declined: usize,
        /// Mappings processed
        total: usize,
    },

    /// Names given on the command line that are not in the mapping table
    #[error("Unknown template(s): {}", .0.join(", "))]
    UnknownTemplates(Vec<String>),

    /// Template error outside of a sync run
    #[error(transparent)]
    Template(#[from] dotweave_template::Error),

    /// Engine error outside of a sync run
    #[error(transparent)]
    Engine(#[from] dotweave_engine::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else, with context
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<dotweave_core::Error> for CommandError {
    fn from(err: dotweave_core::Error) -> Self {
        Self::Other(err.into())
    }
}

/// Result type alias for command operations
pub type Result<T> = std::result::Result<T, CommandError>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_sync_failed_message() {
        let err = CommandError::SyncFailed {
            failed: 1,
            declined: 2,
            total: 5,
        };
        assert_eq!(
            err.to_string(),
            "Apply failed: 1 failed and 2 declined out of 5 templates"
        );
    }

    #[test]
    fn test_unknown_templates_message() {
        let err = CommandError::UnknownTemplates(vec!["a.tmpl".to_string(), "b.tmpl".to_string()]);
        assert_eq!(err.to_string(), "Unknown template(s): a.tmpl, b.tmpl");
    }

    #[test]
    fn test_core_error_converts_to_other() {
        let err: CommandError = dotweave_core::Error::HomeDirUnavailable.into();
        assert!(matches!(err, CommandError::Other(_)));
    }
}
