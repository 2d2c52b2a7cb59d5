//! Collapse a raw operation stream to one canonical operation per path.

use std::collections::HashSet;

use patchbay_types::FileOperation;

/// Normalize a proposed path: backslashes become forward slashes.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Collapse `ops` to at most one operation per normalized path.
///
/// Last write wins: for each path only its final occurrence survives, and
/// the output preserves the relative order of those final occurrences.
/// Operations with an empty normalized path are dropped. Idempotent.
#[must_use]
pub fn coalesce(ops: Vec<FileOperation>) -> Vec<FileOperation> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept: Vec<FileOperation> = Vec::new();

    for mut op in ops.into_iter().rev() {
        let path = normalize_path(&op.path);
        if path.is_empty() {
            continue;
        }
        if seen.insert(path.clone()) {
            op.path = path;
            kept.push(op);
        }
    }

    kept.reverse();
    kept
}
