//! Store-backed rendering

use crate::context::RenderContext;
use crate::engine::TemplateEngine;
use crate::Result;
use dotweave_core::TemplateStore;

/// Rendered bytes of one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    /// Template name the bytes came from
    pub source_name: String,
    /// Rendered content
    pub bytes: Vec<u8>,
}

/// Compiles named templates from a store against a context
///
/// Rendering has no side effects. The same name, store content and context
/// always produce identical bytes.
pub struct Renderer<S> {
    store: S,
    engine: TemplateEngine,
}

impl<S: TemplateStore> Renderer<S> {
    /// Create a renderer over `store`
    pub fn new(store: S) -> Self {
        Self {
            store,
            engine: TemplateEngine::new(),
        }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Render one template
    ///
    /// # Errors
    ///
    /// - [`crate::Error::TemplateNotFound`] if `source_name` is not in the store
    /// - [`crate::Error::UndefinedReference`] if the template uses an unknown name
    /// - any other template error from compiling or evaluating it
    pub fn render(&self, source_name: &str, context: &RenderContext) -> Result<RenderResult> {
        let body = self.store.read_template(source_name)?;
        let bytes = self.engine.render(source_name, &body, context)?;

        tracing::debug!(name = %source_name, bytes = bytes.len(), "Rendered template");
        Ok(RenderResult {
            source_name: source_name.to_string(),
            bytes,
        })
    }
}
