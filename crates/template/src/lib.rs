//! # dotweave Template
//!
//! Template rendering for dotweave using minijinja.
//!
//! This crate provides the render context, a strict template engine with pure
//! helper functions, a directory-backed template store, and the [`Renderer`]
//! that ties a store to the engine.

pub mod context;
pub mod engine;
pub mod functions;
pub mod renderer;
pub mod store;

pub use context::{RenderContext, SystemContextProvider, SystemInfo};
pub use engine::TemplateEngine;
pub use renderer::{RenderResult, Renderer};
pub use store::DirTemplateStore;

use std::path::PathBuf;
use thiserror::Error;

/// Result type for template operations
pub type Result<T> = std::result::Result<T, Error>;

/// Template errors
#[derive(Error, Debug)]
pub enum Error {
    /// Template name does not resolve to a readable template
    #[error("Template not found: {name}")]
    TemplateNotFound {
        /// Requested template name
        name: String,
    },

    /// Template references a name absent from the render context
    #[error("Undefined variable '{key}' in template {template}")]
    UndefinedReference {
        /// Template being rendered
        template: String,
        /// Missing name, dotted for nested lookups
        key: String,
    },

    /// Template rendering error
    #[error("Template error at {location}: {message}")]
    Render {
        /// Template name and line
        location: String,
        /// Engine message
        message: String,
    },

    /// Template syntax error
    #[error("Template syntax error: {0}")]
    Syntax(String),

    /// Template store directory cannot be read
    #[error("Template store {} is not accessible: {message}", path.display())]
    StoreUnavailable {
        /// Store root
        path: PathBuf,
        /// Underlying failure
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// The missing key for [`Error::UndefinedReference`]
    #[must_use]
    pub fn undefined_key(&self) -> Option<&str> {
        match self {
            Self::UndefinedReference { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl From<minijinja::Error> for Error {
    fn from(err: minijinja::Error) -> Self {
        if err.kind() == minijinja::ErrorKind::SyntaxError {
            return Error::Syntax(err.to_string());
        }

        let location = match (err.name(), err.line()) {
            (Some(name), Some(line)) => format!("{name} line {line}"),
            (Some(name), None) => name.to_string(),
            (None, Some(line)) => format!("line {line}"),
            (None, None) => "unknown location".to_string(),
        };

        Error::Render {
            location,
            message: err.to_string(),
        }
    }
}

impl From<dotweave_core::Error> for Error {
    fn from(err: dotweave_core::Error) -> Self {
        match err {
            dotweave_core::Error::TemplateNotFound { name } => Error::TemplateNotFound { name },
            dotweave_core::Error::StoreUnavailable { path, source } => Error::StoreUnavailable {
                path,
                message: source.to_string(),
            },
            dotweave_core::Error::Io(e) => Error::Io(e),
            other => Error::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_syntax_error_conversion() {
        let env = minijinja::Environment::new();
        let err = env.render_str("{% if %}", ()).unwrap_err();
        assert!(matches!(Error::from(err), Error::Syntax(_)));
    }

    #[test]
    fn test_render_error_has_location() {
        let env = minijinja::Environment::new();
        let err = env
            .render_named_str("greeting.tmpl", "a\n{{ nope() }}", ())
            .unwrap_err();
        match Error::from(err) {
            Error::Render { location, .. } => assert_eq!(location, "greeting.tmpl line 2"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_core_not_found_conversion() {
        let err = Error::from(dotweave_core::Error::TemplateNotFound {
            name: "x.tmpl".to_string(),
        });
        assert!(matches!(err, Error::TemplateNotFound { ref name } if name == "x.tmpl"));
    }
}
