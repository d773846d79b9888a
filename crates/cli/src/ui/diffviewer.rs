//! Diff display for the terminal

use dotweave_core::path::AbsPath;
use dotweave_engine::DiffSink;
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Prints unified diffs produced by the engine, colored per line kind
pub struct DiffViewer<W> {
    writer: W,
    color: bool,
}

impl<W: Write> DiffViewer<W> {
    /// Create a viewer writing to `writer`
    pub fn new(writer: W, color: bool) -> Self {
        Self { writer, color }
    }

    /// Consume the viewer and return the writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        if !self.color {
            return self.writer.write_all(line.as_bytes());
        }

        // Keep the newline outside the escape codes
        let (body, newline) = match line.strip_suffix('\n') {
            Some(body) => (body, "\n"),
            None => (line, ""),
        };

        if body.starts_with("---") || body.starts_with("+++") {
            write!(self.writer, "{}{newline}", body.bold())
        } else if body.starts_with("@@") {
            write!(self.writer, "{}{newline}", body.cyan())
        } else if body.starts_with('-') {
            write!(self.writer, "{}{newline}", body.red())
        } else if body.starts_with('+') {
            write!(self.writer, "{}{newline}", body.green())
        } else if body.starts_with('\\') || body.starts_with("Binary files") {
            write!(self.writer, "{}{newline}", body.dimmed())
        } else {
            write!(self.writer, "{body}{newline}")
        }
    }
}

impl<W: Write> DiffSink for DiffViewer<W> {
    fn show_diff(&mut self, _target: &AbsPath, diff: &str) -> io::Result<()> {
        for line in diff.split_inclusive('\n') {
            self.write_line(line)?;
        }
        if !diff.ends_with('\n') && !diff.is_empty() {
            writeln!(self.writer)?;
        }
        self.writer.flush()
    }
}
