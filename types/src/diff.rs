//! Line-level diff records.

use serde::{Deserialize, Serialize};

/// Tag of one line in a computed line-level diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffLineKind {
    /// Present on both sides; both line numbers are set.
    Context,
    /// Present only on the new side; only `new_line` is set.
    Added,
    /// Present only on the old side; only `old_line` is set.
    Removed,
    /// Synthetic elision marker for a truncated diff; both line numbers are
    /// `None` and `text` reports the number of elided entries.
    Skip,
}

/// One line of a computed line-level diff. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub old_line: Option<u32>,
    pub new_line: Option<u32>,
    pub text: String,
}

impl DiffLine {
    #[must_use]
    pub fn context(old_line: u32, new_line: u32, text: impl Into<String>) -> Self {
        Self {
            kind: DiffLineKind::Context,
            old_line: Some(old_line),
            new_line: Some(new_line),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn added(new_line: u32, text: impl Into<String>) -> Self {
        Self {
            kind: DiffLineKind::Added,
            old_line: None,
            new_line: Some(new_line),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn removed(old_line: u32, text: impl Into<String>) -> Self {
        Self {
            kind: DiffLineKind::Removed,
            old_line: Some(old_line),
            new_line: None,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn skip(text: impl Into<String>) -> Self {
        Self {
            kind: DiffLineKind::Skip,
            old_line: None,
            new_line: None,
            text: text.into(),
        }
    }
}
