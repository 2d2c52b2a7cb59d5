//! Diff-and-staging engine for assistant-proposed change-sets.
//!
//! An assistant turn proposes a batch of raw file operations. This crate
//! turns that batch into a reviewable change-set and walks it through its
//! lifecycle:
//!
//! 1. [mod@coalesce] collapses the raw stream to one operation per path,
//!    last write wins.
//! 2. [`resolve`] resolves before/after content for each operation and
//!    attaches a line-level diff from [`diff`].
//! 3. [`review::ChangeReviewer`] owns the single pending change-set:
//!    navigation, projection into an editor buffer, fail-soft apply, and
//!    discard with rollback of speculative writes.
//!
//! Persistent storage, the open-buffer registry, the editor overlay, and the
//! file tree are collaborators behind the traits in [`collaborators`]; a
//! filesystem-backed [`storage::FsStorage`] adapter is bundled.

// Collaborator traits are consumed generically, never as `dyn`, so the
// auto-Send caveat of `async fn` in traits does not apply.
#![allow(async_fn_in_trait)]

pub mod coalesce;
pub mod collaborators;
pub mod diff;
pub mod resolve;
pub mod review;
pub mod storage;

pub use coalesce::{coalesce, normalize_path};
pub use collaborators::{
    ADDED_LINE_CLASS, BufferFlags, BufferRegistry, BufferSnapshot, FileTreeRefresher, OverlayPlan,
    OverlayProjector, OverlayRange, Storage, StorageError,
};
pub use diff::{DiffLimits, line_diff, line_diff_with_limits};
pub use resolve::{ResolveOptions, annotate, annotate_batch};
pub use review::{
    ApplyError, ApplyOutcome, AppliedChange, ChangeReviewer, FailedChange, NavDirection,
    PendingChangeSet, ReviewError,
};
pub use storage::FsStorage;
