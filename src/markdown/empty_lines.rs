//! Blank-line normalization for Markdown documents.
//!
//! Runs of blank lines outside fenced code blocks and front matter collapse to a
//! single blank line. Everything between fences is copied verbatim. Fence state
//! is a plain toggle per delimiter line, so an unterminated fence leaves the
//! rest of the document untouched.

use super::common::{is_blank, is_list_item, lines_inclusive, trim_space};

const CODE_FENCE: &str = "```";
const FRONT_MATTER_FENCE: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    CodeFence,
    FrontMatterFence,
    Blank,
    ListItem,
    Text,
}

impl LineKind {
    fn of(line: &str) -> Self {
        let trimmed = trim_space(line);
        if trimmed.starts_with(CODE_FENCE) {
            Self::CodeFence
        } else if trimmed == FRONT_MATTER_FENCE {
            Self::FrontMatterFence
        } else if is_blank(trimmed) {
            Self::Blank
        } else if is_list_item(trimmed) {
            Self::ListItem
        } else {
            Self::Text
        }
    }
}

/// Loop-carried state for one pass. The two fence flags toggle independently,
/// so a `---` inside a code block flips front-matter state and vice versa.
#[derive(Debug, Clone, Copy, Default)]
struct Scan {
    in_code_block: bool,
    in_front_matter: bool,
    prev_empty: bool,
    prev_list_item: bool,
}

impl Scan {
    fn verbatim(self) -> bool {
        self.in_code_block || self.in_front_matter
    }

    /// Returns the state after `kind` and whether the line is kept.
    fn step(self, kind: LineKind) -> (Self, bool) {
        match kind {
            LineKind::CodeFence => (
                Self {
                    in_code_block: !self.in_code_block,
                    prev_empty: false,
                    ..self
                },
                true,
            ),
            LineKind::FrontMatterFence => (
                Self {
                    in_front_matter: !self.in_front_matter,
                    prev_empty: false,
                    ..self
                },
                true,
            ),
            // Block content leaves the outside tracking exactly as it was.
            _ if self.verbatim() => (self, true),
            LineKind::Blank if self.prev_empty => (self, false),
            // First blank after a list item closes the group.
            LineKind::Blank if self.prev_list_item => (
                Self {
                    prev_empty: true,
                    prev_list_item: false,
                    ..self
                },
                true,
            ),
            LineKind::Blank => (
                Self {
                    prev_empty: true,
                    ..self
                },
                true,
            ),
            LineKind::ListItem | LineKind::Text => (
                Self {
                    prev_empty: false,
                    prev_list_item: kind == LineKind::ListItem,
                    ..self
                },
                true,
            ),
        }
    }
}

/// Collapses redundant blank lines and guarantees a trailing newline.
///
/// The result is never empty: empty or all-blank input becomes `"\n"`.
/// Leading and trailing blank runs shrink to one line but are not trimmed.
pub fn normalize_empty_lines(content: &str) -> String {
    let mut out = String::with_capacity(content.len() + 1);

    lines_inclusive(content).fold(Scan::default(), |scan, line| {
        let (next, keep) = scan.step(LineKind::of(line));
        if keep {
            out.push_str(line);
        }
        next
    });

    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
