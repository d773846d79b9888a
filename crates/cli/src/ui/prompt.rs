//! Yes/no confirmation on a line-oriented terminal

use dotweave_core::ConfirmationOracle;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

/// Parse a yes/no answer
///
/// Returns `None` for anything that is neither, including an empty line.
#[must_use]
pub fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Asks on `output` and reads one line from `input`
///
/// An empty line, end of input, a read error, or an unrecognized answer all
/// fall back to the prompt's default.
pub struct LineConfirmation<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConfirmation<R, W> {
    /// Create a confirmation reading from `input` and prompting on `output`
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        write!(self.output, "{} {} ", prompt.yellow().bold(), hint.dimmed())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(default);
        }

        Ok(parse_answer(&line).unwrap_or(default))
    }
}

impl LineConfirmation<BufReader<Stdin>, Stdout> {
    /// Prompt on stdout, read from stdin
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConfirmationOracle for LineConfirmation<R, W> {
    fn confirm(&mut self, prompt: &str, default: bool) -> bool {
        match self.ask(prompt, default) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read answer, using default");
                default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use std::io::Cursor;

    fn confirm(input: &str, default: bool) -> (bool, String) {
        let mut output = Vec::new();
        let answer =
            LineConfirmation::new(Cursor::new(input.as_bytes()), &mut output).confirm("Overwrite?", default);
        (answer, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("y\n"), Some(true));
        assert_eq!(parse_answer("  YES "), Some(true));
        assert_eq!(parse_answer("n"), Some(false));
        assert_eq!(parse_answer("No\n"), Some(false));
        assert_eq!(parse_answer(""), None);
        assert_eq!(parse_answer("maybe"), None);
    }

    #[test]
    fn test_explicit_answers() {
        assert!(!confirm("n\n", true).0);
        assert!(confirm("yes\n", false).0);
    }

    #[test]
    fn test_empty_line_uses_default() {
        assert!(confirm("\n", true).0);
        assert!(!confirm("\n", false).0);
    }

    #[test]
    fn test_end_of_input_uses_default() {
        assert!(confirm("", true).0);
        assert!(!confirm("", false).0);
    }

    #[test]
    fn test_unrecognized_answer_uses_default() {
        assert!(confirm("whatever\n", true).0);
    }

    #[test]
    fn test_prompt_shows_default_hint() {
        let (_, shown) = confirm("y\n", true);
        assert!(shown.contains("Overwrite?"));
        assert!(shown.contains("[Y/n]"));

        let (_, shown) = confirm("y\n", false);
        assert!(shown.contains("[y/N]"));
    }
}
