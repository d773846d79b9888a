//! XDG directory utilities
//!
//! This module provides XDG-compliant directory paths for dotweave.
//! It follows the XDG Base Directory specification using the `xdg` crate:
//! - `XDG_DATA_HOME` defaults to ~/.local/share
//! - `XDG_CONFIG_HOME` defaults to ~/.config

use std::path::PathBuf;
use xdg::BaseDirectories;

const PREFIX: &str = "dotweave";

/// Get the dotweave data directory
///
/// Returns `$XDG_DATA_HOME/dotweave` or `~/.local/share/dotweave`
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    BaseDirectories::with_prefix(PREFIX).get_data_home()
}

/// Get the dotweave config directory
///
/// Returns `$XDG_CONFIG_HOME/dotweave` or `~/.config/dotweave`
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    BaseDirectories::with_prefix(PREFIX).get_config_home()
}

/// Get the default template store location
///
/// Returns `$XDG_DATA_HOME/dotweave` or `~/.local/share/dotweave`
#[must_use]
pub fn default_source_dir() -> Option<PathBuf> {
    data_dir()
}

/// Get the default config file path
///
/// Returns `$XDG_CONFIG_HOME/dotweave/config.toml` or `~/.config/dotweave/config.toml`
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_file_honors_xdg_config_home() {
        let temp = tempfile::TempDir::new().unwrap();
        temp_env::with_var("XDG_CONFIG_HOME", Some(temp.path()), || {
            let path = default_config_file().unwrap();
            assert_eq!(path, temp.path().join("dotweave").join("config.toml"));
        });
    }

    #[test]
    #[serial]
    fn test_source_dir_honors_xdg_data_home() {
        let temp = tempfile::TempDir::new().unwrap();
        temp_env::with_var("XDG_DATA_HOME", Some(temp.path()), || {
            assert_eq!(default_source_dir().unwrap(), temp.path().join("dotweave"));
        });
    }

    #[test]
    fn test_default_source_dir_same_as_data_dir() {
        assert_eq!(default_source_dir(), data_dir());
    }

    #[test]
    fn test_data_and_config_dirs_are_different() {
        if let (Some(data), Some(config)) = (data_dir(), config_dir()) {
            assert_ne!(data, config, "data_dir and config_dir should be different");
        }
    }
}
