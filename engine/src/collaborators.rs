//! Collaborator contracts consumed by the staging engine.
//!
//! The engine core never touches disk, editor buffers, or the file tree
//! directly. Everything side-effecting goes through these traits so the
//! review lifecycle stays testable against in-memory fakes, and so the
//! overlay contract stays a plain `{buffer, ranges}` value independent of
//! any editor toolkit.
//!
//! Every async method is a suspension point; the engine awaits each call
//! before taking the next step, so collaborators see one request at a time.

use thiserror::Error;

/// Style class attached to overlay ranges for added lines.
pub const ADDED_LINE_CLASS: &str = "diff-added";

/// Failure from the persistent storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("read failed for {path}: {message}")]
    Read { path: String, message: String },
    #[error("write failed for {path}: {message}")]
    Write { path: String, message: String },
    #[error("delete failed for {path}: {message}")]
    Delete { path: String, message: String },
}

impl StorageError {
    pub fn read(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Read {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn write(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Write {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn delete(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Delete {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Path the failing operation targeted.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } | Self::Delete { path, .. } => path,
        }
    }
}

/// Persistent file storage.
pub trait Storage {
    async fn read(&self, path: &str) -> Result<String, StorageError>;
    async fn write(&self, path: &str, content: &str) -> Result<(), StorageError>;
    async fn delete(&self, path: &str) -> Result<(), StorageError>;
}

/// Content snapshot of one open buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferSnapshot {
    pub content: String,
    pub modified: bool,
}

/// Flags attached to a buffer on upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferFlags {
    /// Buffer holds unapproved preview content from the assistant.
    pub preview: bool,
    /// Buffer differs from what storage holds.
    pub modified: bool,
}

/// The editing session's open-buffer registry.
pub trait BufferRegistry {
    async fn find(&self, path: &str) -> Option<BufferSnapshot>;
    async fn upsert(&mut self, path: &str, content: &str, flags: BufferFlags);
    async fn remove(&mut self, path: &str);
    async fn set_active(&mut self, path: Option<&str>);
    /// Path of the currently visible buffer, if any.
    async fn active_path(&self) -> Option<String>;
    /// Open buffer paths in opening order (last entry is the fallback
    /// candidate when the active buffer goes away).
    async fn open_paths(&self) -> Vec<String>;
}

/// One highlighted line in an editor overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRange {
    /// 1-based line number in the buffer.
    pub line: u32,
    pub style_class: &'static str,
}

/// Decorations for one buffer, produced by projecting the active operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayPlan {
    pub buffer: String,
    pub ranges: Vec<OverlayRange>,
}

/// Editor decoration surface.
pub trait OverlayProjector {
    /// Replace any previously applied overlay with `plan`. Never additive.
    fn apply(&mut self, plan: &OverlayPlan);
    /// Drop the current overlay, if any.
    fn clear(&mut self);
}

/// External file-tree snapshot, refreshed after apply or discard.
pub trait FileTreeRefresher {
    async fn refresh(&mut self);
}
