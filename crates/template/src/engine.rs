//! Template engine implementation
//!
//! The engine wraps minijinja in strict mode: a reference to a name that is not
//! in the render context fails the render instead of producing empty output.

use crate::context::RenderContext;
use crate::functions;
use crate::{Error, Result};
use minijinja::{Environment, ErrorKind, Template, UndefinedBehavior};

/// Globals minijinja provides without registration
const BUILTIN_GLOBALS: [&str; 10] = [
    "range",
    "dict",
    "debug",
    "namespace",
    "loop",
    "self",
    "super",
    "caller",
    "varargs",
    "kwargs",
];

/// Template engine for rendering templates
pub struct TemplateEngine {
    /// The minijinja environment
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with all helpers registered
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();

        // Jinja2 whitespace control; rendered files keep their final newline
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        env.add_function("joinPath", functions::join_path);
        env.add_function("regexMatch", functions::regex_match);
        env.add_function("regexReplaceAll", functions::regex_replace_all);
        env.add_function("split", functions::split);
        env.add_function("join", functions::join);

        env.add_filter("quote", functions::quote);
        env.add_filter("toJson", functions::to_json);
        env.add_filter("fromJson", functions::from_json);
        env.add_filter("toToml", functions::to_toml);
        env.add_filter("fromToml", functions::from_toml);
        env.add_filter("trim", functions::trim);
        env.add_filter("trimStart", functions::trim_start);
        env.add_filter("trimEnd", functions::trim_end);

        Self { env }
    }

    /// Render a template string with the given context
    ///
    /// # Examples
    ///
    /// ```
    /// use dotweave_template::{RenderContext, TemplateEngine};
    /// use indexmap::IndexMap;
    ///
    /// let engine = TemplateEngine::new();
    /// let context = RenderContext::new(IndexMap::from([(
    ///     "name".to_string(),
    ///     serde_json::json!("Alice"),
    /// )]));
    ///
    /// let result = engine.render_str("Hello {{ name }}!", &context).unwrap();
    /// assert_eq!(result, "Hello Alice!");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns error if template rendering fails
    pub fn render_str(&self, template: &str, context: &RenderContext) -> Result<String> {
        self.render_named_str("<string>", template, context)
    }

    /// Render a template string with a name used in error messages
    ///
    /// # Errors
    ///
    /// - [`Error::Syntax`] if the template does not parse
    /// - [`Error::UndefinedReference`] if it substitutes or tests a name absent
    ///   from `context` without an `is defined` or `default` guard
    /// - [`Error::Render`] for any other evaluation failure
    pub fn render_named_str(
        &self,
        name: &str,
        template: &str,
        context: &RenderContext,
    ) -> Result<String> {
        let compiled = self.env.template_from_named_str(name, template)?;

        compiled.render(context.as_value()).map_err(|err| {
            if err.kind() == ErrorKind::UndefinedError
                && let Some(key) = Self::missing_path(&compiled, template, err.line(), context)
            {
                return Error::UndefinedReference {
                    template: name.to_string(),
                    key,
                };
            }
            Error::from(err)
        })
    }

    /// Render template content (bytes) with the given context
    ///
    /// # Errors
    ///
    /// Returns error if template is not valid UTF-8 or rendering fails
    pub fn render(&self, name: &str, template: &[u8], context: &RenderContext) -> Result<Vec<u8>> {
        let template_str = std::str::from_utf8(template)
            .map_err(|e| Error::Syntax(format!("Template {name} is not valid UTF-8: {e}")))?;

        let rendered = self.render_named_str(name, template_str, context)?;
        Ok(rendered.into_bytes())
    }

    /// Whether `name` resolves without the render context
    fn is_global(name: &str) -> bool {
        functions::FUNCTION_NAMES.contains(&name) || BUILTIN_GLOBALS.contains(&name)
    }

    /// Name the context lacks that caused an undefined error
    ///
    /// Guarded uses (`is defined`, `default`) never fail in strict mode, so the
    /// miss on the failing line is preferred over other absent names.
    fn missing_path(
        template: &Template<'_, '_>,
        source: &str,
        line: Option<usize>,
        context: &RenderContext,
    ) -> Option<String> {
        let mut paths: Vec<String> = template
            .undeclared_variables(true)
            .into_iter()
            .filter(|p| {
                let root = p.split('.').next().unwrap_or(p);
                !Self::is_global(root) && context.lookup(p).is_none()
            })
            .collect();
        paths.sort();

        let failing_line = line.and_then(|n| source.lines().nth(n.saturating_sub(1)));
        if let Some(text) = failing_line
            && let Some(path) = paths.iter().rev().find(|p| text.contains(p.as_str()))
        {
            return Some(path.clone());
        }
        paths.into_iter().next()
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}
