//! System abstraction for filesystem operations
//!
//! This module provides a trait-based abstraction over the two filesystem
//! operations reconciliation needs, enabling dry-run mode and testing.

use crate::error::{Error, Result};
use dotweave_core::path::AbsPath;
use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};

/// Abstraction over filesystem operations
///
/// - `RealSystem`: actual filesystem operations
/// - `DryRunSystem`: reads the real filesystem, records writes without executing them
pub trait System {
    /// Read a target's contents, or `None` if it does not exist
    fn read_target(&self, path: &AbsPath) -> Result<Option<Vec<u8>>>;

    /// Replace a target's contents atomically
    fn write_file(&self, path: &AbsPath, content: &[u8]) -> Result<()>;
}

/// Real filesystem implementation
pub struct RealSystem;

/// Mode for newly created targets
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

fn read_existing(path: &AbsPath) -> Result<Option<Vec<u8>>> {
    match fs::read(path.as_path()) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::ReadFailure {
            path: path.clone(),
            source: e,
        }),
    }
}

impl System for RealSystem {
    fn read_target(&self, path: &AbsPath) -> Result<Option<Vec<u8>>> {
        read_existing(path)
    }

    fn write_file(&self, path: &AbsPath, content: &[u8]) -> Result<()> {
        let unwritable = |source: io::Error| Error::TargetUnwritable {
            path: path.clone(),
            source,
        };

        let parent = path.parent().ok_or_else(|| {
            unwritable(io::Error::new(
                io::ErrorKind::InvalidInput,
                "target has no parent directory",
            ))
        })?;
        fs::create_dir_all(parent.as_path()).map_err(unwritable)?;

        // Keep the mode of the file being replaced
        let existing_permissions = fs::metadata(path.as_path()).ok().map(|m| m.permissions());

        // Temp file in the same directory so the rename stays on one filesystem
        let mut temp = tempfile::Builder::new()
            .prefix(".dotweave-")
            .suffix(".tmp")
            .tempfile_in(parent.as_path())
            .map_err(unwritable)?;

        temp.write_all(content).map_err(unwritable)?;
        temp.as_file().sync_all().map_err(unwritable)?;

        match existing_permissions {
            Some(permissions) => temp
                .as_file()
                .set_permissions(permissions)
                .map_err(unwritable)?,
            #[cfg(unix)]
            None => {
                use std::os::unix::fs::PermissionsExt;
                temp.as_file()
                    .set_permissions(fs::Permissions::from_mode(NEW_FILE_MODE))
                    .map_err(unwritable)?;
            }
            #[cfg(not(unix))]
            None => {}
        }

        temp.persist(path.as_path())
            .map_err(|e| unwritable(e.error))?;

        tracing::debug!(path = %path, bytes = content.len(), "Wrote target");
        Ok(())
    }
}

/// Dry-run system that records writes without executing them
#[derive(Debug, Default)]
pub struct DryRunSystem {
    operations: RefCell<Vec<Operation>>,
}

/// A write that would be performed on the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Write a file
    WriteFile {
        /// Target path
        path: AbsPath,
        /// Bytes that would be written
        size: usize,
    },
}

impl DryRunSystem {
    /// Create a new dry-run system
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the list of operations that would be performed
    pub fn operations(&self) -> Vec<Operation> {
        self.operations.borrow().clone()
    }
}

impl System for DryRunSystem {
    fn read_target(&self, path: &AbsPath) -> Result<Option<Vec<u8>>> {
        read_existing(path)
    }

    fn write_file(&self, path: &AbsPath, content: &[u8]) -> Result<()> {
        self.operations.borrow_mut().push(Operation::WriteFile {
            path: path.clone(),
            size: content.len(),
        });
        Ok(())
    }
}

impl<T: System + ?Sized> System for &T {
    fn read_target(&self, path: &AbsPath) -> Result<Option<Vec<u8>>> {
        (**self).read_target(path)
    }

    fn write_file(&self, path: &AbsPath, content: &[u8]) -> Result<()> {
        (**self).write_file(path, content)
    }
}
