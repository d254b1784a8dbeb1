use super::key_to_file_name;
use crate::ingestion::domain::PackageRecord;
use crate::ports::outbound::{CreateOutcome, MetadataStore};
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// FileMetadataStore adapter keeping one JSON document per package ID
///
/// Records live under `<root>/metadata/<encoded id>.json`. Conditional
/// creation relies on `O_CREAT | O_EXCL` (`create_new`), which the
/// filesystem guarantees to be atomic across processes.
pub struct FileMetadataStore {
    dir: PathBuf,
}

impl FileMetadataStore {
    pub fn new(root: &Path) -> Self {
        Self {
            dir: root.join("metadata"),
        }
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key_to_file_name(id)))
    }
}

#[async_trait]
impl MetadataStore for FileMetadataStore {
    async fn get(&self, id: &str) -> Result<Option<PackageRecord>> {
        let path = self.record_path(id);
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read metadata record {}", path.display()))
            }
        };

        let record = serde_json::from_slice(&content)
            .with_context(|| format!("Corrupt metadata record {}", path.display()))?;
        Ok(Some(record))
    }

    async fn create(&self, record: &PackageRecord) -> Result<CreateOutcome> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let path = self.record_path(record.id());
        let body = serde_json::to_vec_pretty(record)?;

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!(id = record.id(), "metadata record already exists");
                return Ok(CreateOutcome::Conflict);
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to create metadata record {}", path.display()))
            }
        };

        if let Err(e) = write_all_synced(&mut file, &body).await {
            // Remove the partial record so a retry is not reported as a conflict
            let _ = tokio::fs::remove_file(&path).await;
            return Err(e).with_context(|| format!("Failed to write {}", path.display()));
        }

        Ok(CreateOutcome::Created)
    }
}

async fn write_all_synced(file: &mut tokio::fs::File, body: &[u8]) -> std::io::Result<()> {
    file.write_all(body).await?;
    file.sync_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::domain::{PackageName, Rating, ResolvedPackage, Version};
    use tempfile::TempDir;

    fn record(name: &str, version: &str) -> PackageRecord {
        let package = ResolvedPackage::new(
            PackageName::new(name.to_string()).unwrap(),
            Version::new(version.to_string()).unwrap(),
            vec![],
        )
        .with_readme("# readme".to_string());
        PackageRecord::from_resolved(&package, &Rating::unscored()).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let dir = TempDir::new().unwrap();
        let store = FileMetadataStore::new(dir.path());
        let record = record("braces", "3.0.3");

        assert_eq!(store.create(&record).await.unwrap(), CreateOutcome::Created);
        let loaded = store.get("braces3.0.3").await.unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn test_second_create_conflicts_and_keeps_first() {
        let dir = TempDir::new().unwrap();
        let store = FileMetadataStore::new(dir.path());
        let first = record("braces", "3.0.3");

        store.create(&first).await.unwrap();
        assert_eq!(
            store.create(&first).await.unwrap(),
            CreateOutcome::Conflict
        );
        assert_eq!(store.get("braces3.0.3").await.unwrap().unwrap(), first);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileMetadataStore::new(dir.path());
        assert!(store.get("nothing1.0.0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_scoped_ids_stay_inside_store() {
        let dir = TempDir::new().unwrap();
        let store = FileMetadataStore::new(dir.path());
        store.create(&record("@types/node", "20.1.0")).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path().join("metadata"))
            .unwrap()
            .collect();
        assert_eq!(entries.len(), 1);
        assert!(store.get("@types/node20.1.0").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_corrupt_record_is_error() {
        let dir = TempDir::new().unwrap();
        let store = FileMetadataStore::new(dir.path());
        std::fs::create_dir_all(dir.path().join("metadata")).unwrap();
        std::fs::write(dir.path().join("metadata/bad1.0.0.json"), "{not json").unwrap();

        assert!(store.get("bad1.0.0").await.is_err());
    }
}
