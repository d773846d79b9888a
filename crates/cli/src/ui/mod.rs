//! Terminal user interface components
//!
//! - Yes/no confirmation prompts
//! - Colored diff display

pub mod diffviewer;
pub mod prompt;

pub use diffviewer::DiffViewer;
pub use prompt::{LineConfirmation, parse_answer};
