//! Templates command operations
//!
//! - list: every mapped template and the target it renders into
//! - show: the rendered content of one template

use dotweave_template::Renderer;
use owo_colors::OwoColorize;
use std::io::Write;

use crate::common::RuntimeContext;
use crate::error::Result;

/// Run templates list command
///
/// # Errors
///
/// Returns error if the store cannot be listed or output fails
pub fn run_list(context: &RuntimeContext, out: &mut dyn Write) -> Result<()> {
    let store = context.store()?;
    let mappings = context.mappings(&store, &[])?;
    let settings = context.sync_settings();

    if mappings.is_empty() {
        writeln!(out, "No templates found.")?;
        writeln!(
            out,
            "\nTo create templates, add files ending in {} to: {}",
            settings.template_suffix,
            context.source_dir()
        )?;
        return Ok(());
    }

    for mapping in &mappings {
        match mapping.resolve_target(&settings.home, &settings.template_suffix) {
            Ok(target) => writeln!(
                out,
                "  {} {} {}",
                mapping.source_name.bright_white(),
                "→".dimmed(),
                target
            )?,
            Err(e) => writeln!(
                out,
                "  {} {} {}",
                mapping.source_name.bright_white(),
                "→".dimmed(),
                e.to_string().red()
            )?,
        }
    }

    writeln!(
        out,
        "\n({} {})",
        mappings.len().to_string().bright_green().bold(),
        if mappings.len() == 1 {
            "template"
        } else {
            "templates"
        }
    )?;

    Ok(())
}

/// Run templates show command
///
/// Writes the rendered bytes unchanged.
///
/// # Errors
///
/// Returns error if the template does not exist or fails to render
pub fn run_show(context: &RuntimeContext, name: &str, out: &mut dyn Write) -> Result<()> {
    let renderer = Renderer::new(context.store()?);
    let render_context = context.render_context()?;

    let rendered = renderer.render(name, &render_context)?;
    out.write_all(&rendered.bytes)?;
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::error::CommandError;
    use dotweave_config::Config;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn context(source: &TempDir, home: &TempDir, extra: &str) -> RuntimeContext {
        let toml = format!(
            "[general]\nsrcDir = {:?}\ndstDir = {:?}\n{extra}",
            source.path(),
            home.path()
        );
        RuntimeContext::new(Config::from_toml_str(&toml, Path::new("/")).unwrap()).unwrap()
    }

    #[test]
    fn test_list_shows_targets() {
        let source = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(source.path().join("bashrc.tmpl"), "").unwrap();
        fs::write(source.path().join("notes.txt"), "").unwrap();

        let mut out = Vec::new();
        run_list(&context(&source, &home, ""), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("bashrc.tmpl"));
        assert!(out.contains(&home.path().join(".bashrc").display().to_string()));
        assert!(!out.contains("notes.txt"));
    }

    #[test]
    fn test_list_reports_invalid_target() {
        let source = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(source.path().join("a.tmpl"), "").unwrap();

        let mut out = Vec::new();
        run_list(
            &context(&source, &home, "\n[templates]\n\"a.tmpl\" = \"relative/a\"\n"),
            &mut out,
        )
        .unwrap();

        assert!(String::from_utf8(out).unwrap().contains("must be absolute"));
    }

    #[test]
    fn test_list_empty_store() {
        let source = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();

        let mut out = Vec::new();
        run_list(&context(&source, &home, ""), &mut out).unwrap();

        assert!(String::from_utf8(out).unwrap().contains("No templates found."));
    }

    #[test]
    fn test_show_renders() {
        let source = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(source.path().join("hello.tmpl"), "hi {{ who }}\n").unwrap();

        let mut out = Vec::new();
        run_show(
            &context(&source, &home, "\n[variables]\nwho = \"there\"\n"),
            "hello.tmpl",
            &mut out,
        )
        .unwrap();

        assert_eq!(out, b"hi there\n");
    }

    #[test]
    fn test_show_missing_template() {
        let source = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();

        let err = run_show(&context(&source, &home, ""), "nope.tmpl", &mut Vec::new()).unwrap_err();

        assert!(matches!(
            err,
            CommandError::Template(dotweave_template::Error::TemplateNotFound { .. })
        ));
    }
}
