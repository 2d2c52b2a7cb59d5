//! Shared in-memory fakes for the collaborator contracts.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use patchbay_engine::{
    BufferFlags, BufferRegistry, BufferSnapshot, FileTreeRefresher, OverlayPlan, OverlayProjector,
    Storage, StorageError,
};

#[derive(Debug, Default)]
struct MemStorageInner {
    files: BTreeMap<String, String>,
    fail_reads: BTreeSet<String>,
    fail_writes: BTreeSet<String>,
    fail_deletes: BTreeSet<String>,
    log: Vec<String>,
}

/// In-memory storage with per-path failure injection and a call log.
///
/// Clones share state, so tests can keep a handle after moving one into the
/// reviewer.
#[derive(Debug, Clone, Default)]
pub struct MemStorage {
    inner: Arc<Mutex<MemStorageInner>>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .files
            .insert(path.to_string(), content.to_string());
        self
    }

    pub fn fail_reads_to(self, path: &str) -> Self {
        self.inner.lock().unwrap().fail_reads.insert(path.to_string());
        self
    }

    pub fn fail_writes_to(self, path: &str) -> Self {
        self.inner.lock().unwrap().fail_writes.insert(path.to_string());
        self
    }

    pub fn fail_deletes_to(self, path: &str) -> Self {
        self.inner.lock().unwrap().fail_deletes.insert(path.to_string());
        self
    }

    pub fn contents(&self, path: &str) -> Option<String> {
        self.inner.lock().unwrap().files.get(path).cloned()
    }

    pub fn log(&self) -> Vec<String> {
        self.inner.lock().unwrap().log.clone()
    }
}

impl Storage for MemStorage {
    async fn read(&self, path: &str) -> Result<String, StorageError> {
        let mut inner = self.inner.lock().unwrap();
        inner.log.push(format!("read {path}"));
        if inner.fail_reads.contains(path) {
            return Err(StorageError::read(path, "injected read failure"));
        }
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::read(path, "no such file"))
    }

    async fn write(&self, path: &str, content: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();
        inner.log.push(format!("write {path}"));
        if inner.fail_writes.contains(path) {
            return Err(StorageError::write(path, "injected write failure"));
        }
        inner.files.insert(path.to_string(), content.to_string());
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();
        inner.log.push(format!("delete {path}"));
        if inner.fail_deletes.contains(path) {
            return Err(StorageError::delete(path, "injected delete failure"));
        }
        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StorageError::delete(path, "no such file"))
    }
}

#[derive(Debug, Default)]
struct MemBuffersInner {
    /// `(path, content, flags)` in opening order.
    buffers: Vec<(String, String, BufferFlags)>,
    active: Option<String>,
}

/// In-memory open-buffer registry. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemBuffers {
    inner: Arc<Mutex<MemBuffersInner>>,
}

impl MemBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buffer(self, path: &str, content: &str) -> Self {
        self.inner.lock().unwrap().buffers.push((
            path.to_string(),
            content.to_string(),
            BufferFlags::default(),
        ));
        self
    }

    pub fn with_active(self, path: &str) -> Self {
        self.inner.lock().unwrap().active = Some(path.to_string());
        self
    }

    pub fn content_of(&self, path: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .buffers
            .iter()
            .find(|(p, _, _)| p == path)
            .map(|(_, content, _)| content.clone())
    }

    pub fn flags_of(&self, path: &str) -> Option<BufferFlags> {
        self.inner
            .lock()
            .unwrap()
            .buffers
            .iter()
            .find(|(p, _, _)| p == path)
            .map(|(_, _, flags)| *flags)
    }

    pub fn active(&self) -> Option<String> {
        self.inner.lock().unwrap().active.clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .buffers
            .iter()
            .map(|(p, _, _)| p.clone())
            .collect()
    }
}

impl BufferRegistry for MemBuffers {
    async fn find(&self, path: &str) -> Option<BufferSnapshot> {
        self.inner
            .lock()
            .unwrap()
            .buffers
            .iter()
            .find(|(p, _, _)| p == path)
            .map(|(_, content, flags)| BufferSnapshot {
                content: content.clone(),
                modified: flags.modified,
            })
    }

    async fn upsert(&mut self, path: &str, content: &str, flags: BufferFlags) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(entry) = inner.buffers.iter_mut().find(|(p, _, _)| p == path) {
            entry.1 = content.to_string();
            entry.2 = flags;
        } else {
            inner
                .buffers
                .push((path.to_string(), content.to_string(), flags));
        }
    }

    async fn remove(&mut self, path: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.buffers.retain(|(p, _, _)| p != path);
        if inner.active.as_deref() == Some(path) {
            inner.active = None;
        }
    }

    async fn set_active(&mut self, path: Option<&str>) {
        self.inner.lock().unwrap().active = path.map(String::from);
    }

    async fn active_path(&self) -> Option<String> {
        self.inner.lock().unwrap().active.clone()
    }

    async fn open_paths(&self) -> Vec<String> {
        self.paths()
    }
}

#[derive(Debug, Default)]
struct OverlayInner {
    current: Option<OverlayPlan>,
    applies: usize,
    clears: usize,
}

/// Records the latest overlay and call counts. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingOverlay {
    inner: Arc<Mutex<OverlayInner>>,
}

impl RecordingOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<OverlayPlan> {
        self.inner.lock().unwrap().current.clone()
    }

    pub fn applies(&self) -> usize {
        self.inner.lock().unwrap().applies
    }

    pub fn clears(&self) -> usize {
        self.inner.lock().unwrap().clears
    }
}

impl OverlayProjector for RecordingOverlay {
    fn apply(&mut self, plan: &OverlayPlan) {
        let mut inner = self.inner.lock().unwrap();
        // Replace semantics: the previous overlay is dropped wholesale.
        inner.current = Some(plan.clone());
        inner.applies += 1;
    }

    fn clear(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        inner.current = None;
        inner.clears += 1;
    }
}

/// Counts refresh requests. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingTree {
    refreshes: Arc<Mutex<usize>>,
}

impl RecordingTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refreshes(&self) -> usize {
        *self.refreshes.lock().unwrap()
    }
}

impl FileTreeRefresher for RecordingTree {
    async fn refresh(&mut self) {
        *self.refreshes.lock().unwrap() += 1;
    }
}
