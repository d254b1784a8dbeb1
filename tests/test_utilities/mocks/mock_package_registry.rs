use async_trait::async_trait;
use registry_gate::ingestion::domain::DependencyMap;
use registry_gate::ports::outbound::{PackageRegistry, RegistryDist, RegistryManifest};
use registry_gate::prelude::Result;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock PackageRegistry serving canned manifests and tarballs
///
/// Manifests are keyed by `name@version`; registering a package also makes
/// it the `latest` of that name.
#[derive(Default, Clone)]
pub struct MockPackageRegistry {
    manifests: HashMap<String, RegistryManifest>,
    tarballs: HashMap<String, Vec<u8>>,
    pub manifest_calls: Arc<AtomicUsize>,
}

impl MockPackageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a package with its unpacked size and runtime dependencies
    pub fn with_package(mut self, name: &str, version: &str, size: u64, deps: &[&str]) -> Self {
        let dependencies: DependencyMap = deps
            .iter()
            .map(|dep| (dep.to_string(), "^1.0.0".to_string()))
            .collect();
        let manifest = RegistryManifest {
            name: name.to_string(),
            version: version.to_string(),
            dist: RegistryDist {
                tarball: Some(format!("https://registry.test/{name}/-/{name}-{version}.tgz")),
                unpacked_size: Some(size),
            },
            dependencies,
            repository: None,
        };
        self.manifests.insert(format!("{}@{}", name, version), manifest.clone());
        self.manifests.insert(format!("{}@latest", name), manifest);
        self
    }

    /// Sets the `repository` field of every registered version of `name`
    pub fn with_repository(mut self, name: &str, repository: serde_json::Value) -> Self {
        for manifest in self.manifests.values_mut().filter(|m| m.name == name) {
            manifest.repository = Some(repository.clone());
        }
        self
    }

    /// Serves `bytes` for the tarball URL of `name@version`
    pub fn with_tarball(mut self, name: &str, version: &str, bytes: Vec<u8>) -> Self {
        self.tarballs.insert(
            format!("https://registry.test/{name}/-/{name}-{version}.tgz"),
            bytes,
        );
        self
    }

    pub fn manifest_call_count(&self) -> usize {
        self.manifest_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PackageRegistry for MockPackageRegistry {
    async fn fetch_manifest(&self, name: &str, version: &str) -> Result<RegistryManifest> {
        self.manifest_calls.fetch_add(1, Ordering::SeqCst);
        self.manifests
            .get(&format!("{}@{}", name, version))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("npm registry has no entry for {}@{}", name, version))
    }

    async fn download_tarball(&self, url: &str) -> Result<Vec<u8>> {
        self.tarballs
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no tarball at {}", url))
    }
}
