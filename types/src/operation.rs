//! File operations proposed by the assistant.

use serde::{Deserialize, Serialize};

use crate::DiffLine;

/// Kind of a proposed file operation.
///
/// Unknown kinds on the wire deserialize to [`OperationKind::Other`] so a
/// malformed assistant response never aborts a whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    CreateFile,
    EditFile,
    DeleteFile,
    #[serde(other)]
    Other,
}

/// One raw file operation from the assistant-response boundary.
///
/// `path` is the unique key for coalescing. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOperation {
    pub kind: OperationKind,
    pub path: String,
    /// Proposed content. Deletes carry none; absent on the wire means empty.
    #[serde(default)]
    pub content: String,
}

impl FileOperation {
    #[must_use]
    pub fn create(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::CreateFile,
            path: path.into(),
            content: content.into(),
        }
    }

    #[must_use]
    pub fn edit(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::EditFile,
            path: path.into(),
            content: content.into(),
        }
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::DeleteFile,
            path: path.into(),
            content: String::new(),
        }
    }
}

/// A coalesced operation annotated with resolved content and its diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedOperation {
    pub operation: FileOperation,
    pub before: String,
    pub after: String,
    pub diff: Vec<DiffLine>,
    /// True only when `after` was written to storage purely to support a
    /// live preview, before user approval. Rolled back on discard.
    pub speculative: bool,
}
