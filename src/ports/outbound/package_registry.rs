use crate::ingestion::domain::DependencyMap;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// Distribution block of a published npm manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistryDist {
    #[serde(default)]
    pub tarball: Option<String>,
    #[serde(default, rename = "unpackedSize")]
    pub unpacked_size: Option<u64>,
}

/// The subset of a published npm version manifest the pipeline reads
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RegistryManifest {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub dist: RegistryDist,
    #[serde(default)]
    pub dependencies: DependencyMap,
    /// Raw `repository` field (string or `{ "url": ... }` object)
    #[serde(default)]
    pub repository: Option<serde_json::Value>,
}

/// PackageRegistry port for the npm registry
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Fetches the manifest of one published version
    ///
    /// # Arguments
    /// * `name` - Package name, scoped names allowed
    /// * `version` - A concrete version or a dist-tag such as `latest`
    ///
    /// # Errors
    /// Returns an error if the package or version does not exist, or the
    /// registry cannot be reached.
    async fn fetch_manifest(&self, name: &str, version: &str) -> Result<RegistryManifest>;

    /// Downloads a tarball from the URL given in `dist.tarball`
    async fn download_tarball(&self, url: &str) -> Result<Vec<u8>>;
}
