use super::key_to_file_name;
use crate::ports::outbound::BlobStore;
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// FileBlobStore adapter storing archives under `<root>/blobs/`
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never observes a partially written archive. The content type is
/// implied by the store (every object is a zip) and only logged.
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(root: &Path) -> Self {
        Self {
            dir: root.join("blobs"),
        }
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(key_to_file_name(key))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.blob_path(key)).await?)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.blob_path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read blob {}", path.display())),
        }
    }

    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let path = self.blob_path(key);
        if let Ok(metadata) = tokio::fs::symlink_metadata(&path).await {
            if metadata.is_symlink() {
                anyhow::bail!(
                    "Security: blob path {} is a symbolic link. Refusing to write through it.",
                    path.display()
                );
            }
        }

        let staging = self.dir.join(format!(".{}.partial", key_to_file_name(key)));
        tokio::fs::write(&staging, bytes)
            .await
            .with_context(|| format!("Failed to write {}", staging.display()))?;
        tokio::fs::rename(&staging, &path)
            .await
            .with_context(|| format!("Failed to move blob into {}", path.display()))?;

        tracing::debug!(key, size = bytes.len(), content_type, "stored blob");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::ZIP_CONTENT_TYPE;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_get_exists() {
        let dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(dir.path());

        assert!(!store.exists("braces3.0.3").await.unwrap());
        store
            .put("braces3.0.3", b"PK\x03\x04", ZIP_CONTENT_TYPE)
            .await
            .unwrap();
        assert!(store.exists("braces3.0.3").await.unwrap());
        assert_eq!(
            store.get("braces3.0.3").await.unwrap().unwrap(),
            b"PK\x03\x04".to_vec()
        );
    }

    #[tokio::test]
    async fn test_put_replaces_existing_object() {
        let dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(dir.path());
        store.put("a1.0.0", b"old", ZIP_CONTENT_TYPE).await.unwrap();
        store.put("a1.0.0", b"new", ZIP_CONTENT_TYPE).await.unwrap();
        assert_eq!(store.get("a1.0.0").await.unwrap().unwrap(), b"new".to_vec());
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(dir.path());
        assert!(store.get("missing1.0.0").await.unwrap().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_refuses_symlinked_blob() {
        let dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(dir.path());
        std::fs::create_dir_all(dir.path().join("blobs")).unwrap();
        let target = dir.path().join("elsewhere");
        std::fs::write(&target, b"keep").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("blobs/evil1.0.0")).unwrap();

        let err = store
            .put("evil1.0.0", b"overwrite", ZIP_CONTENT_TYPE)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Security"));
        assert_eq!(std::fs::read(&target).unwrap(), b"keep".to_vec());
    }
}
