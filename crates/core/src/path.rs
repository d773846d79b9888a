//! Type-safe path types
//!
//! This module provides two distinct path types using the newtype pattern:
//!
//! - [`AbsPath`]: Absolute filesystem paths (render targets, store roots)
//! - [`RelPath`]: Relative paths (template names inside a store)
//!
//! It also provides [`expand_tilde`] for `~` shorthand in configured paths.
//!
//! # Examples
//!
//! ```
//! use dotweave_core::path::{AbsPath, RelPath};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let home = AbsPath::new("/home/user".into())?;
//! let config = RelPath::new(".config/git/config".into())?;
//!
//! let target = home.join(&config);
//! assert_eq!(target.as_path().to_str().unwrap(), "/home/user/.config/git/config");
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// An absolute path on the filesystem
///
/// This type guarantees that the path is absolute (starts with `/` on Unix or a drive letter on Windows).
/// Use this for file operations and as base directories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbsPath(PathBuf);

impl AbsPath {
    /// Create a new `AbsPath` from a `PathBuf`
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotweave_core::path::AbsPath;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let abs = AbsPath::new("/home/user".into())?;
    /// assert!(abs.as_path().is_absolute());
    ///
    /// let err = AbsPath::new("relative/path".into());
    /// assert!(err.is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(path: PathBuf) -> Result<Self> {
        if path.is_absolute() {
            Ok(AbsPath(path))
        } else {
            Err(Error::PathNotAbsolute { path })
        }
    }

    /// Create a new `AbsPath` from a reference to a `Path`
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::new(path.to_path_buf())
    }

    /// Get the underlying `Path`
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Convert to a `PathBuf`
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }

    /// Join with a relative path to create a new absolute path
    pub fn join(&self, rel: &RelPath) -> Self {
        AbsPath(self.0.join(rel.as_path()))
    }

    /// Get the parent directory
    ///
    /// Returns `None` if this is the root directory.
    pub fn parent(&self) -> Option<Self> {
        self.0.parent().map(|p| AbsPath(p.to_path_buf()))
    }

    /// Strip a base directory prefix to get a relative path
    ///
    /// # Errors
    ///
    /// Returns an error if `self` is not under `base`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotweave_core::path::AbsPath;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let store = AbsPath::new("/home/user/dotfiles".into())?;
    /// let file = AbsPath::new("/home/user/dotfiles/git/config.tmpl".into())?;
    /// let rel = file.strip_prefix(&store)?;
    /// assert_eq!(rel.as_path().to_str().unwrap(), "git/config.tmpl");
    /// # Ok(())
    /// # }
    /// ```
    pub fn strip_prefix(&self, base: &AbsPath) -> Result<RelPath> {
        self.0
            .strip_prefix(&base.0)
            .map(|p| RelPath(p.to_path_buf()))
            .map_err(|_| Error::InvalidPathPrefix {
                path: std::sync::Arc::new(self.as_path().to_path_buf()),
                base: std::sync::Arc::new(base.as_path().to_path_buf()),
            })
    }

    /// Get the file name
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|s| s.to_str())
    }
}

/// A relative path (no leading slash)
///
/// Template names are relative paths inside the template store. A `RelPath`
/// never escapes its base directory: parent (`..`) components are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelPath(PathBuf);

impl RelPath {
    /// Create a new `RelPath` from a `PathBuf`
    ///
    /// # Errors
    ///
    /// Returns an error if the path is absolute or contains `..` components.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotweave_core::path::RelPath;
    ///
    /// assert!(RelPath::new("git/config.tmpl".into()).is_ok());
    /// assert!(RelPath::new("../outside.tmpl".into()).is_err());
    /// assert!(RelPath::new("/etc/passwd".into()).is_err());
    /// ```
    pub fn new(path: PathBuf) -> Result<Self> {
        let escapes = path.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });

        if path.is_relative() && !escapes {
            Ok(RelPath(path))
        } else {
            Err(Error::PathNotRelative { path })
        }
    }

    /// Get the underlying `Path`
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Convert to a `PathBuf`
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }

    /// Get the file name
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|s| s.to_str())
    }

    /// Render with `/` separators regardless of platform
    pub fn to_slash_string(&self) -> String {
        self.0
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl std::fmt::Display for AbsPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl std::fmt::Display for RelPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Expand a leading `~` to the given home directory
///
/// Only `~` on its own and `~/...` are expanded; `~user` forms are returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use dotweave_core::path::expand_tilde;
/// use std::path::Path;
///
/// let home = Path::new("/home/user");
/// assert_eq!(expand_tilde("~/.bashrc", home), Path::new("/home/user/.bashrc"));
/// assert_eq!(expand_tilde("~", home), Path::new("/home/user"));
/// assert_eq!(expand_tilde("/etc/hosts", home), Path::new("/etc/hosts"));
/// ```
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    match path {
        "~" => home.to_path_buf(),
        s if s.starts_with("~/") => home.join(&s[2..]),
        s => PathBuf::from(s),
    }
}

/// Determine the current user's home directory
///
/// # Errors
///
/// Returns [`Error::HomeDirUnavailable`] if no home directory can be found.
pub fn home_dir() -> Result<AbsPath> {
    let home = dirs::home_dir().ok_or(Error::HomeDirUnavailable)?;
    AbsPath::new(home)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_abs_path_rejects_relative() {
        let err = AbsPath::new("relative".into()).unwrap_err();
        assert!(matches!(err, Error::PathNotAbsolute { .. }));
    }

    #[test]
    fn test_abs_path_parent_and_file_name() {
        let path = AbsPath::new("/home/user/.bashrc".into()).unwrap();
        assert_eq!(path.file_name(), Some(".bashrc"));
        assert_eq!(path.parent().unwrap().as_path(), Path::new("/home/user"));
    }

    #[test]
    fn test_strip_prefix_outside_base() {
        let base = AbsPath::new("/srv/store".into()).unwrap();
        let other = AbsPath::new("/etc/hosts".into()).unwrap();
        assert!(matches!(
            other.strip_prefix(&base),
            Err(Error::InvalidPathPrefix { .. })
        ));
    }

    #[test]
    fn test_rel_path_rejects_parent_dir() {
        assert!(RelPath::new("a/../../b".into()).is_err());
    }

    #[test]
    fn test_rel_path_slash_string() {
        let rel = RelPath::new(PathBuf::from("git").join("config.tmpl")).unwrap();
        assert_eq!(rel.to_slash_string(), "git/config.tmpl");
    }

    #[test]
    fn test_expand_tilde_user_form_untouched() {
        let home = Path::new("/home/user");
        assert_eq!(expand_tilde("~other/x", home), PathBuf::from("~other/x"));
    }

    #[test]
    fn test_expand_tilde_empty() {
        let home = Path::new("/home/user");
        assert_eq!(expand_tilde("", home), PathBuf::new());
    }
}
