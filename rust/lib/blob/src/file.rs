use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::BlobError;
use crate::traits::BlobStore;

/// Blob store on the local filesystem: key `logos/a.png` lives at
/// `{root}/logos/a.png`.
///
/// Writes go to a sibling temp file that is renamed into place, so readers
/// never see a partial logo.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create) the store directory.
    pub fn open(root: &Path) -> Result<Self, BlobError> {
        fs::create_dir_all(root).map_err(|source| BlobError::Io {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root: root.to_path_buf() })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to a path inside the root. Absolute keys and `..` segments
    /// are rejected.
    fn path_for(&self, key: &str) -> Result<PathBuf, BlobError> {
        let rel = Path::new(key);
        let valid = !key.is_empty()
            && !key.starts_with(['/', '\\'])
            && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            return Err(BlobError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

impl BlobStore for FileStore {
    fn put(&self, key: &str, data: &[u8]) -> Result<(), BlobError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(BlobError::io(key))?;
        }
        let mut tmp = path.clone().into_os_string();
        tmp.push(".part");
        fs::write(&tmp, data).map_err(BlobError::io(key))?;
        fs::rename(&tmp, &path).map_err(BlobError::io(key))?;
        tracing::debug!(key, bytes = data.len(), "blob written");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BlobError::io(key)(e)),
        }
    }

    fn delete(&self, key: &str) -> Result<(), BlobError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BlobError::io(key)(e)),
        }
    }

    fn exists(&self, key: &str) -> Result<bool, BlobError> {
        Ok(self.path_for(key)?.is_file())
    }
}
