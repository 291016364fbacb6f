//! On-disk storage for uploaded document files

use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Stores uploaded files under a single directory, keyed by a generated
/// filename recorded on the owning document. File lifecycle follows the
/// document record: created on upload, removed on document deletion.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the upload directory
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        std::fs::create_dir_all(root.as_ref())?;
        Ok(Self {
            root: root.as_ref().to_path_buf(),
        })
    }

    /// Persist uploaded bytes under a fresh name, preserving the original
    /// extension. Returns the stored filename.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<String> {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin")
            .to_lowercase();
        let stored = format!("document-{}.{}", Uuid::new_v4(), ext);
        tokio::fs::write(self.root.join(&stored), data).await?;
        Ok(stored)
    }

    /// Read a stored file's bytes
    pub async fn read(&self, stored: &str) -> Result<Vec<u8>> {
        tokio::fs::read(self.root.join(stored)).await.map_err(Error::from)
    }

    /// Remove a stored file. A missing file is not an error; the record may
    /// outlive a manually cleaned upload directory.
    pub async fn delete(&self, stored: &str) -> Result<()> {
        match tokio::fs::remove_file(self.root.join(stored)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Absolute path of a stored file
    pub fn path_of(&self, stored: &str) -> PathBuf {
        self.root.join(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_read_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        let stored = store.save("report.PDF", b"hello").await.unwrap();
        assert!(stored.ends_with(".pdf"));
        assert_eq!(store.read(&stored).await.unwrap(), b"hello");

        store.delete(&stored).await.unwrap();
        assert!(store.read(&stored).await.is_err());
        // Deleting again is fine.
        store.delete(&stored).await.unwrap();
    }

    #[tokio::test]
    async fn extensionless_uploads_get_a_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        let stored = store.save("README", b"x").await.unwrap();
        assert!(stored.ends_with(".bin"));
    }
}
