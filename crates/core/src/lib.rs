//! Core types and utilities for dotweave
//!
//! This is the foundation crate (Layer 0) that all other dotweave crates depend on.
//! It provides:
//! - Path types (AbsPath, RelPath) and home directory expansion
//! - Base error types
//! - Platform detection
//! - Collaborator traits (TemplateStore, ConfirmationOracle, ContextProvider)
//!
//! This crate has no dependencies on other dotweave crates.

pub mod error;
pub mod path;
pub mod platform;
pub mod traits;

pub use error::{Error, Result};
pub use traits::{ConfirmationOracle, ContextProvider, TemplateStore};
