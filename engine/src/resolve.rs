//! Resolve before/after content for coalesced operations.
//!
//! "Before" comes from the open buffer when one exists, else from one
//! storage read. A failed read degrades to an empty "before" (the whole
//! "after" then shows as added), it never aborts resolution.

use patchbay_types::{AnnotatedOperation, FileOperation, OperationKind};
use tracing::{debug, warn};

use crate::collaborators::{BufferRegistry, Storage};
use crate::diff::{DiffLimits, line_diff_with_limits};

/// Knobs for one resolution pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    pub limits: DiffLimits,
    /// Write a create operation's content to storage at resolve time so the
    /// preview surface can show a real file. Rolled back on discard.
    pub speculative_creates: bool,
}

/// Annotate one operation with resolved content and its diff. Infallible:
/// every failure degrades to a documented fallback.
pub async fn annotate<S: Storage, B: BufferRegistry>(
    op: FileOperation,
    buffers: &B,
    storage: &S,
    options: &ResolveOptions,
) -> AnnotatedOperation {
    let before = resolve_before(&op, buffers, storage).await;
    let after = match op.kind {
        OperationKind::DeleteFile => String::new(),
        _ => op.content.clone(),
    };

    let speculative = if options.speculative_creates && op.kind == OperationKind::CreateFile {
        speculative_write(&op.path, &after, storage).await
    } else {
        false
    };

    let diff = line_diff_with_limits(&before, &after, options.limits);
    AnnotatedOperation {
        operation: op,
        before,
        after,
        diff,
        speculative,
    }
}

/// Annotate a whole batch, strictly sequentially: one storage call in
/// flight at a time keeps the collaborator load bounded and the output
/// ordering deterministic.
pub async fn annotate_batch<S: Storage, B: BufferRegistry>(
    ops: Vec<FileOperation>,
    buffers: &B,
    storage: &S,
    options: &ResolveOptions,
) -> Vec<AnnotatedOperation> {
    let mut annotated = Vec::with_capacity(ops.len());
    for op in ops {
        annotated.push(annotate(op, buffers, storage, options).await);
    }
    annotated
}

async fn resolve_before<S: Storage, B: BufferRegistry>(
    op: &FileOperation,
    buffers: &B,
    storage: &S,
) -> String {
    match op.kind {
        OperationKind::EditFile | OperationKind::DeleteFile => {
            if let Some(snapshot) = buffers.find(&op.path).await {
                return snapshot.content;
            }
            match storage.read(&op.path).await {
                Ok(content) => content,
                Err(err) => {
                    warn!(path = %op.path, %err, "before-content read failed, previewing as new");
                    String::new()
                }
            }
        }
        OperationKind::CreateFile | OperationKind::Other => String::new(),
    }
}

async fn speculative_write<S: Storage>(path: &str, content: &str, storage: &S) -> bool {
    match storage.write(path, content).await {
        Ok(()) => {
            debug!(path, "wrote speculative preview file");
            true
        }
        Err(err) => {
            warn!(path, %err, "speculative preview write failed");
            false
        }
    }
}
