//! Collaborator traits
//!
//! The rendering and reconciliation engine talks to its surroundings through
//! these interfaces. Production implementations live in the crates that own
//! the concern (the directory-backed store in `dotweave-template`, the terminal
//! prompt in the CLI); tests substitute scripted ones.

use crate::Result;
use indexmap::IndexMap;

/// A source of template definitions
///
/// Templates are identified by a relative name using `/` separators.
///
/// # Examples
///
/// ```
/// use dotweave_core::{Error, Result, TemplateStore};
///
/// struct Single;
///
/// impl TemplateStore for Single {
///     fn list_templates(&self) -> Result<Vec<String>> {
///         Ok(vec!["bashrc.tmpl".to_string()])
///     }
///
///     fn read_template(&self, name: &str) -> Result<Vec<u8>> {
///         match name {
///             "bashrc.tmpl" => Ok(b"export EDITOR=vim\n".to_vec()),
///             other => Err(Error::TemplateNotFound { name: other.to_string() }),
///         }
///     }
/// }
///
/// assert_eq!(Single.list_templates().unwrap(), ["bashrc.tmpl"]);
/// assert!(Single.read_template("zshrc.tmpl").is_err());
/// ```
pub trait TemplateStore {
    /// List every template name, sorted
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StoreUnavailable`] when the store cannot be read.
    fn list_templates(&self) -> Result<Vec<String>>;

    /// Read the raw body of one template
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TemplateNotFound`] when `name` does not resolve
    /// to a readable template.
    fn read_template(&self, name: &str) -> Result<Vec<u8>>;

    /// Verify the store can be read at all
    ///
    /// Runs once before any mapping is processed. The default lists every
    /// template and discards the names.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StoreUnavailable`] when the store cannot be read.
    fn check(&self) -> Result<()> {
        self.list_templates().map(|_| ())
    }
}

/// Yes/no decision source for interactive conflict resolution
pub trait ConfirmationOracle {
    /// Ask a yes/no question, returning `default` when the answer is not recognized
    fn confirm(&mut self, prompt: &str, default: bool) -> bool;
}

/// Supplies the named values injected into templates
pub trait ContextProvider {
    /// Build the top-level key/value mapping for one run
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be assembled. This aborts the run.
    fn provide(&self) -> Result<IndexMap<String, serde_json::Value>>;
}

impl<T: ConfirmationOracle + ?Sized> ConfirmationOracle for &mut T {
    fn confirm(&mut self, prompt: &str, default: bool) -> bool {
        (**self).confirm(prompt, default)
    }
}

impl<T: TemplateStore + ?Sized> TemplateStore for &T {
    fn list_templates(&self) -> Result<Vec<String>> {
        (**self).list_templates()
    }

    fn read_template(&self, name: &str) -> Result<Vec<u8>> {
        (**self).read_template(name)
    }

    fn check(&self) -> Result<()> {
        (**self).check()
    }
}
