use crate::shared::Result;
use async_trait::async_trait;

/// Content type recorded for canonical package archives
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// BlobStore port for the object store holding package archives
///
/// Keys are package IDs. Implementations must be `Send + Sync` so a single
/// store can serve concurrent requests.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Returns whether an object exists under `key`
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Fetches the object stored under `key`, or `None` if absent
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `bytes` under `key`, replacing any existing object
    ///
    /// # Arguments
    /// * `key` - Object key (the package ID)
    /// * `bytes` - Object payload
    /// * `content_type` - MIME type recorded alongside the object
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<()>;
}
