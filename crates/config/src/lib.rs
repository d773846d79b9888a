//! Configuration management for dotweave
//!
//! This crate handles:
//! - Configuration loading and validation
//! - XDG directory management
//! - Variable loading from the source directory
//! - Logging initialization

pub mod config;
pub mod dirs;
pub mod logging;
pub mod variables;

// Re-export error types from core
pub use dotweave_core::{Error, Result};

// Re-export main types
pub use config::{Config, ConflictPolicy, DEFAULT_TEMPLATE_SUFFIX, GeneralConfig, UiConfig};
pub use dirs::{config_dir, data_dir, default_config_file, default_source_dir};
