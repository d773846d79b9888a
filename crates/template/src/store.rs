//! Directory-backed template store

use dotweave_core::path::{AbsPath, RelPath};
use dotweave_core::{Error, Result, TemplateStore};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories never searched for templates
const SKIPPED_DIRS: [&str; 2] = [".git", ".dotweave"];

/// Template store backed by a directory tree
///
/// Templates are regular files whose name ends with the configured suffix.
/// Names are paths relative to the root, joined with `/`.
#[derive(Debug, Clone)]
pub struct DirTemplateStore {
    root: AbsPath,
    suffix: String,
}

impl DirTemplateStore {
    /// Create a store rooted at `root`
    ///
    /// # Errors
    ///
    /// Returns error if `root` is not absolute
    pub fn new(root: PathBuf, suffix: impl Into<String>) -> Result<Self> {
        Ok(Self {
            root: AbsPath::new(root)?,
            suffix: suffix.into(),
        })
    }

    /// Store root directory
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Template suffix
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    fn unavailable(&self, source: io::Error) -> Error {
        Error::StoreUnavailable {
            path: self.root.as_path().to_path_buf(),
            source,
        }
    }

    fn is_template_name(&self, file_name: &str) -> bool {
        file_name.len() > self.suffix.len() && file_name.ends_with(&self.suffix)
    }
}

impl TemplateStore for DirTemplateStore {
    fn check(&self) -> Result<()> {
        let metadata = fs::metadata(self.root()).map_err(|e| self.unavailable(e))?;
        if !metadata.is_dir() {
            return Err(self.unavailable(io::Error::new(
                io::ErrorKind::NotADirectory,
                "not a directory",
            )));
        }
        Ok(())
    }

    fn list_templates(&self) -> Result<Vec<String>> {
        self.check()?;

        let walker = WalkDir::new(self.root())
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !(entry.file_type().is_dir()
                        && entry
                            .file_name()
                            .to_str()
                            .is_some_and(|name| SKIPPED_DIRS.contains(&name)))
            });

        let mut names = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(self.unavailable(io::Error::other(err.to_string())));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Skipping unreadable store entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str() else {
                continue;
            };
            if !self.is_template_name(file_name) {
                continue;
            }

            let abs = AbsPath::from_path(entry.path())?;
            names.push(abs.strip_prefix(&self.root)?.to_slash_string());
        }

        names.sort();
        tracing::debug!(root = %self.root, count = names.len(), "Discovered templates");
        Ok(names)
    }

    fn read_template(&self, name: &str) -> Result<Vec<u8>> {
        let not_found = || Error::TemplateNotFound {
            name: name.to_string(),
        };

        if name.is_empty() {
            return Err(not_found());
        }
        let rel = RelPath::new(PathBuf::from(name)).map_err(|_| not_found())?;
        let path = self.root.join(&rel);

        match fs::read(path.as_path()) {
            Ok(bytes) => Ok(bytes),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::IsADirectory
                ) || path.as_path().is_dir() =>
            {
                // A vanished root is not a missing template
                self.check()?;
                Err(not_found())
            }
            Err(e) => Err(Error::Io(e)),
        }
    }
}
