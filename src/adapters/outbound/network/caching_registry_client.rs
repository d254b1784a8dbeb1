use crate::ports::outbound::{PackageRegistry, RegistryManifest};
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Cache key for registry manifests
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct CacheKey {
    name: String,
    version: String,
}

impl CacheKey {
    fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
        }
    }
}

/// CachingRegistryClient wraps a PackageRegistry and memoizes manifest lookups
///
/// Batch scoring maps every npm URL to its repository through the manifest,
/// and URL lists often repeat a package; the cache keeps that to one request
/// per `name/version`. Only successful lookups are cached. Tarball downloads
/// pass straight through.
pub struct CachingRegistryClient<R: PackageRegistry> {
    inner: R,
    cache: Arc<DashMap<CacheKey, RegistryManifest>>,
}

impl<R: PackageRegistry> CachingRegistryClient<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Returns the current cache size (for testing/monitoring)
    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<R: PackageRegistry> PackageRegistry for CachingRegistryClient<R> {
    async fn fetch_manifest(&self, name: &str, version: &str) -> Result<RegistryManifest> {
        let key = CacheKey::new(name, version);

        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }

        let manifest = self.inner.fetch_manifest(name, version).await?;
        self.cache.insert(key, manifest.clone());
        Ok(manifest)
    }

    async fn download_tarball(&self, url: &str) -> Result<Vec<u8>> {
        self.inner.download_tarball(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock registry that counts lookups and fails for names starting with "missing"
    struct CountingRegistry {
        call_count: AtomicUsize,
    }

    #[async_trait]
    impl PackageRegistry for CountingRegistry {
        async fn fetch_manifest(&self, name: &str, version: &str) -> Result<RegistryManifest> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if name.starts_with("missing") {
                anyhow::bail!("not found");
            }
            Ok(RegistryManifest {
                name: name.to_string(),
                version: version.to_string(),
                ..Default::default()
            })
        }

        async fn download_tarball(&self, _url: &str) -> Result<Vec<u8>> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1, 2, 3])
        }
    }

    fn caching() -> CachingRegistryClient<CountingRegistry> {
        CachingRegistryClient::new(CountingRegistry {
            call_count: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_repeated_lookup_hits_cache() {
        let registry = caching();
        let first = registry.fetch_manifest("braces", "latest").await.unwrap();
        let second = registry.fetch_manifest("braces", "latest").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(registry.inner.call_count.load(Ordering::SeqCst), 1);
        assert_eq!(registry.cache_size(), 1);
    }

    #[tokio::test]
    async fn test_versions_cached_separately() {
        let registry = caching();
        registry.fetch_manifest("braces", "latest").await.unwrap();
        registry.fetch_manifest("braces", "3.0.3").await.unwrap();
        assert_eq!(registry.cache_size(), 2);
    }

    #[tokio::test]
    async fn test_failures_not_cached() {
        let registry = caching();
        assert!(registry.fetch_manifest("missing-pkg", "latest").await.is_err());
        assert!(registry.fetch_manifest("missing-pkg", "latest").await.is_err());
        assert_eq!(registry.cache_size(), 0);
        assert_eq!(registry.inner.call_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_tarballs_pass_through() {
        let registry = caching();
        registry.download_tarball("https://x/a.tgz").await.unwrap();
        registry.download_tarball("https://x/a.tgz").await.unwrap();
        assert_eq!(registry.inner.call_count.load(Ordering::SeqCst), 2);
    }
}
