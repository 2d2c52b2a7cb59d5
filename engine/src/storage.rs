//! Filesystem-backed storage adapter.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::collaborators::{Storage, StorageError};

/// [`Storage`] over a workspace directory on disk.
///
/// Operation paths are workspace-relative; leading separators are stripped
/// so an absolute-looking path cannot escape the root by replacement.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches(['/', '\\']))
    }
}

impl Storage for FsStorage {
    async fn read(&self, path: &str) -> Result<String, StorageError> {
        fs::read_to_string(self.resolve(path))
            .await
            .map_err(|err| StorageError::read(path, err))
    }

    async fn write(&self, path: &str, content: &str) -> Result<(), StorageError> {
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| StorageError::write(path, err))?;
        }
        fs::write(&target, content)
            .await
            .map_err(|err| StorageError::write(path, err))?;
        debug!(path, "wrote file");
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        fs::remove_file(self.resolve(path))
            .await
            .map_err(|err| StorageError::delete(path, err))?;
        debug!(path, "deleted file");
        Ok(())
    }
}
