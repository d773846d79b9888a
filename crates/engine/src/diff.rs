//! Content comparison
//!
//! Equivalence is byte equality. Any byte difference yields a non-empty
//! unified diff; a missing final newline is marked explicitly so it never
//! disappears from the output.

use similar::TextDiff;

/// Default number of context lines around each hunk
pub const DEFAULT_CONTEXT_LINES: usize = 3;

/// Result of comparing a target's current content with rendered output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Byte-identical
    Identical,
    /// Divergent, with a human-readable unified diff
    Differs {
        /// Unified diff from current to rendered
        diff: String,
    },
}

impl Comparison {
    /// Whether the contents are byte-identical
    #[must_use]
    pub fn is_identical(&self) -> bool {
        matches!(self, Self::Identical)
    }
}

/// Compare current target content with rendered content
///
/// `label` names the target in the diff header.
///
/// # Examples
///
/// ```
/// use dotweave_engine::diff::{compare, Comparison};
///
/// assert_eq!(compare(b"a\n", b"a\n", "~/.bashrc", 3), Comparison::Identical);
///
/// let Comparison::Differs { diff } = compare(b"a\n", b"b\n", "~/.bashrc", 3) else {
///     panic!("expected a diff");
/// };
/// assert!(diff.contains("-a"));
/// assert!(diff.contains("+b"));
/// ```
#[must_use]
pub fn compare(current: &[u8], rendered: &[u8], label: &str, context_lines: usize) -> Comparison {
    if current == rendered {
        return Comparison::Identical;
    }

    let (Ok(old), Ok(new)) = (std::str::from_utf8(current), std::str::from_utf8(rendered)) else {
        return Comparison::Differs {
            diff: format!("Binary files {label} (current) and {label} (rendered) differ\n"),
        };
    };

    let diff = TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(context_lines)
        .missing_newline_hint(true)
        .header(&format!("{label} (current)"), &format!("{label} (rendered)"))
        .to_string();

    Comparison::Differs { diff }
}
