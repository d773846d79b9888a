//! CLI command implementations

pub mod apply;
pub mod diff;
pub mod templates;
pub mod variables;
