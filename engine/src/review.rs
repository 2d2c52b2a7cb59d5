//! The pending change-set state machine.
//!
//! # State machine
//! ```text
//! ┌───────┐ begin_review      ┌───────────┐
//! │ Empty │ ────────────────> │ Reviewing │ ── navigate / project_active
//! └───────┘                   └───────────┘        (stays Reviewing)
//!     ^                             │
//!     │     apply_all / discard_all │
//!     └─────────────────────────────┘
//! ```
//!
//! Exactly one change-set may be under review at a time. The coordinator
//! owns it as an explicit `Option<PendingChangeSet>`, and `begin_review`
//! refuses a second batch while one is pending; callers that want
//! replace-semantics discard explicitly first.

use std::collections::BTreeSet;

use patchbay_types::{
    AnnotatedOperation, DiffLine, DiffLineKind, FileOperation, OperationKind, TurnId,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::coalesce::coalesce;
use crate::collaborators::{
    ADDED_LINE_CLASS, BufferFlags, BufferRegistry, FileTreeRefresher, OverlayPlan,
    OverlayProjector, OverlayRange, Storage, StorageError,
};
use crate::resolve::{ResolveOptions, annotate_batch};

/// Lifecycle errors of the review coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("a change-set is already under review")]
    ReviewInProgress,
    #[error("no change-set is under review")]
    NoPendingReview,
    #[error("change-set contains no applicable operations")]
    EmptyChangeSet,
}

/// Why one operation failed during apply. Never fatal to the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("unsupported operation kind")]
    UnsupportedKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChange {
    pub kind: OperationKind,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedChange {
    pub kind: OperationKind,
    pub path: String,
    pub error: ApplyError,
}

/// Fail-soft batch commit summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub applied: Vec<AppliedChange>,
    pub failed: Vec<FailedChange>,
}

impl ApplyOutcome {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Step direction while reviewing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Prev,
    Next,
}

/// The ordered, annotated change-set for one assistant turn.
///
/// Invariants: at most one operation per path (enforced upstream by the
/// coalescer), `operations` non-empty, `active` always in bounds.
#[derive(Debug)]
pub struct PendingChangeSet {
    operations: Vec<AnnotatedOperation>,
    source_turn: TurnId,
    active: usize,
    /// Preview buffers this session opened itself, closed again on discard.
    created_previews: BTreeSet<String>,
}

impl PendingChangeSet {
    fn new(operations: Vec<AnnotatedOperation>, source_turn: TurnId) -> Self {
        debug_assert!(!operations.is_empty());
        Self {
            operations,
            source_turn,
            active: 0,
            created_previews: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn operations(&self) -> &[AnnotatedOperation] {
        &self.operations
    }

    #[must_use]
    pub fn source_turn(&self) -> TurnId {
        self.source_turn
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn active_operation(&self) -> &AnnotatedOperation {
        &self.operations[self.active]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Coordinator that owns the single live [`PendingChangeSet`] and the
/// collaborator handles needed to preview, apply, or discard it.
#[derive(Debug)]
pub struct ChangeReviewer<S, B, O, T> {
    storage: S,
    buffers: B,
    overlay: O,
    tree: T,
    options: ResolveOptions,
    pending: Option<PendingChangeSet>,
}

impl<S, B, O, T> ChangeReviewer<S, B, O, T>
where
    S: Storage,
    B: BufferRegistry,
    O: OverlayProjector,
    T: FileTreeRefresher,
{
    #[must_use]
    pub fn new(storage: S, buffers: B, overlay: O, tree: T) -> Self {
        Self {
            storage,
            buffers,
            overlay,
            tree,
            options: ResolveOptions::default(),
            pending: None,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn pending(&self) -> Option<&PendingChangeSet> {
        self.pending.as_ref()
    }

    /// Accept a turn's raw operations for review: coalesce, resolve
    /// sequentially, transition Empty -> Reviewing with the first operation
    /// active.
    ///
    /// Refuses while another change-set is still under review.
    pub async fn begin_review(
        &mut self,
        ops: Vec<FileOperation>,
        source_turn: TurnId,
    ) -> Result<&PendingChangeSet, ReviewError> {
        if self.pending.is_some() {
            return Err(ReviewError::ReviewInProgress);
        }

        let ops = coalesce(ops);
        if ops.is_empty() {
            return Err(ReviewError::EmptyChangeSet);
        }

        let operations = annotate_batch(ops, &self.buffers, &self.storage, &self.options).await;
        debug!(turn = %source_turn, count = operations.len(), "change-set ready for review");
        Ok(self.pending.insert(PendingChangeSet::new(operations, source_turn)))
    }

    /// Step the active operation, clamped to the change-set bounds.
    /// Returns the new active index.
    pub fn navigate(&mut self, direction: NavDirection) -> Result<usize, ReviewError> {
        let set = self.pending.as_mut().ok_or(ReviewError::NoPendingReview)?;
        set.active = match direction {
            NavDirection::Prev => set.active.saturating_sub(1),
            NavDirection::Next => (set.active + 1).min(set.operations.len() - 1),
        };
        Ok(set.active)
    }

    /// Project the active operation into the editor: ensure a buffer for its
    /// path (created from the "after" content when absent), make it the
    /// visible buffer, and hand the projector an overlay marking every added
    /// line. The previous overlay is replaced, never extended.
    pub async fn project_active(&mut self) -> Result<OverlayPlan, ReviewError> {
        let set = self.pending.as_mut().ok_or(ReviewError::NoPendingReview)?;
        let op = &set.operations[set.active];
        let path = op.operation.path.clone();

        if self.buffers.find(&path).await.is_none() {
            let flags = BufferFlags {
                preview: true,
                modified: true,
            };
            self.buffers.upsert(&path, &op.after, flags).await;
            set.created_previews.insert(path.clone());
        }
        self.buffers.set_active(Some(&path)).await;

        let plan = overlay_plan(&path, &op.diff);
        self.overlay.apply(&plan);
        Ok(plan)
    }

    /// Commit the change-set: one storage effect per operation, in order,
    /// each failure caught individually. The set is consumed and the state
    /// returns to Empty no matter how many operations fail.
    pub async fn apply_all(&mut self) -> Result<ApplyOutcome, ReviewError> {
        let set = self.pending.take().ok_or(ReviewError::NoPendingReview)?;
        let mut outcome = ApplyOutcome::default();

        for op in &set.operations {
            let path = op.operation.path.as_str();
            let kind = op.operation.kind;
            let result = match kind {
                OperationKind::CreateFile | OperationKind::EditFile => self
                    .storage
                    .write(path, &op.after)
                    .await
                    .map_err(ApplyError::from),
                OperationKind::DeleteFile => {
                    self.storage.delete(path).await.map_err(ApplyError::from)
                }
                OperationKind::Other => Err(ApplyError::UnsupportedKind),
            };

            match result {
                Ok(()) => {
                    self.mirror_applied(kind, path, &op.after).await;
                    outcome.applied.push(AppliedChange {
                        kind,
                        path: path.to_string(),
                    });
                }
                Err(error) => {
                    warn!(path, %error, "operation failed during apply");
                    outcome.failed.push(FailedChange {
                        kind,
                        path: path.to_string(),
                        error,
                    });
                }
            }
        }

        self.overlay.clear();
        self.tree.refresh().await;
        debug!(
            turn = %set.source_turn,
            applied = outcome.applied.len(),
            failed = outcome.failed.len(),
            "change-set applied"
        );
        Ok(outcome)
    }

    /// Abandon the change-set: roll back speculative writes, close preview
    /// buffers, return to Empty. Cleanup is best-effort throughout; discard
    /// always succeeds from the user's point of view.
    pub async fn discard_all(&mut self) -> Result<(), ReviewError> {
        let set = self.pending.take().ok_or(ReviewError::NoPendingReview)?;

        for op in &set.operations {
            let path = op.operation.path.as_str();
            if op.speculative {
                if let Err(err) = self.storage.delete(path).await {
                    warn!(path, %err, "failed to roll back speculative write");
                }
            }
            if op.speculative || set.created_previews.contains(path) {
                self.close_buffer(path).await;
            }
        }

        self.overlay.clear();
        self.tree.refresh().await;
        debug!(turn = %set.source_turn, "change-set discarded");
        Ok(())
    }

    /// Mirror a committed storage effect into the open-buffer registry.
    async fn mirror_applied(&mut self, kind: OperationKind, path: &str, content: &str) {
        match kind {
            OperationKind::CreateFile | OperationKind::EditFile => {
                // Only open buffers are updated; apply does not force every
                // touched file open in the editor.
                if self.buffers.find(path).await.is_some() {
                    self.buffers
                        .upsert(path, content, BufferFlags::default())
                        .await;
                }
            }
            OperationKind::DeleteFile => self.close_buffer(path).await,
            OperationKind::Other => {}
        }
    }

    /// Close a buffer, falling back to the last remaining open buffer (or
    /// none) when the closed one was active.
    async fn close_buffer(&mut self, path: &str) {
        if self.buffers.find(path).await.is_none() {
            return;
        }
        let was_active = self.buffers.active_path().await.as_deref() == Some(path);
        self.buffers.remove(path).await;
        if was_active {
            let fallback = self.buffers.open_paths().await.pop();
            self.buffers.set_active(fallback.as_deref()).await;
        }
    }
}

fn overlay_plan(buffer: &str, diff: &[DiffLine]) -> OverlayPlan {
    let ranges = diff
        .iter()
        .filter(|line| line.kind == DiffLineKind::Added)
        .filter_map(|line| line.new_line)
        .map(|line| OverlayRange {
            line,
            style_class: ADDED_LINE_CLASS,
        })
        .collect();
    OverlayPlan {
        buffer: buffer.to_string(),
        ranges,
    }
}
