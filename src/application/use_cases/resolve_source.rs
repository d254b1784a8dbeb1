use crate::ingestion::domain::{PackageName, PackageReference, PackageSource, RepoSlug, ResolvedPackage};
use crate::ingestion::services::{
    ExtractionError, ManifestExtractor, SourceClassifier, SourceKind, TarballConverter,
};
use crate::ports::outbound::{PackageRegistry, SourceHost};
use crate::shared::error::GateError;
use crate::shared::security::{validate_archive_size, validate_regular_file, MAX_ARCHIVE_SIZE};
use base64::Engine as _;
use std::path::Path;
use std::sync::Arc;

/// Dist-tag requested when an npm URL names no version
const LATEST_TAG: &str = "latest";

/// SourceResolver turns a package reference into a [`ResolvedPackage`]
///
/// Raw content is decoded directly; npm and GitHub URLs are fetched,
/// converted to the canonical zip form and then handed to the
/// [`ManifestExtractor`]. The resolver never touches the stores.
pub struct SourceResolver {
    registry: Arc<dyn PackageRegistry>,
    host: Arc<dyn SourceHost>,
    extractor: ManifestExtractor,
}

impl SourceResolver {
    pub fn new(
        registry: Arc<dyn PackageRegistry>,
        host: Arc<dyn SourceHost>,
        extractor: ManifestExtractor,
    ) -> Self {
        Self {
            registry,
            host,
            extractor,
        }
    }

    /// Resolves a reference
    ///
    /// # Arguments
    /// * `reference` - The validated inbound reference
    /// * `staging` - Request-scoped directory for intermediate downloads
    ///
    /// # Errors
    /// - `InvalidRequest` when content is not valid base64
    /// - `UnrecognizedSource` for URLs that are neither npm nor GitHub
    /// - `MissingManifest` when the archive has no `package.json`
    /// - `ResolutionFailed` for every other fetch or archive failure
    pub async fn resolve(
        &self,
        reference: &PackageReference,
        staging: &Path,
    ) -> Result<ResolvedPackage, GateError> {
        match reference.source() {
            PackageSource::Content(content) => self.resolve_content(content),
            PackageSource::Url(url) => match SourceClassifier::classify(url) {
                Some(SourceKind::Npm { name, version }) => {
                    self.resolve_npm(url, &name, version.as_deref(), staging)
                        .await
                }
                Some(SourceKind::GitHub { slug, branch }) => {
                    self.resolve_github(url, &slug, branch.as_deref()).await
                }
                None => Err(GateError::UnrecognizedSource { url: url.clone() }),
            },
        }
    }

    fn resolve_content(&self, content: &str) -> Result<ResolvedPackage, GateError> {
        let archive = base64::engine::general_purpose::STANDARD
            .decode(content.trim())
            .map_err(|e| GateError::InvalidRequest {
                reason: format!("Content is not valid base64: {}", e),
            })?;
        validate_archive_size(archive.len() as u64, "uploaded content", MAX_ARCHIVE_SIZE)
            .map_err(|e| GateError::InvalidRequest {
                reason: e.to_string(),
            })?;

        self.extract(archive, "uploaded content")
    }

    async fn resolve_npm(
        &self,
        url: &str,
        name: &str,
        version: Option<&str>,
        staging: &Path,
    ) -> Result<ResolvedPackage, GateError> {
        let failed = |details: String| GateError::ResolutionFailed {
            source_ref: url.to_string(),
            details,
        };

        let name = PackageName::new(name.to_string()).map_err(|e| failed(e.to_string()))?;
        let requested = version.unwrap_or(LATEST_TAG);
        let manifest = self
            .registry
            .fetch_manifest(name.as_str(), requested)
            .await
            .map_err(|e| failed(format!("{:#}", e)))?;
        tracing::debug!(package = %name, requested, resolved = %manifest.version, "resolved npm version");

        let tarball_url = manifest
            .dist
            .tarball
            .as_deref()
            .ok_or_else(|| failed(format!("{}@{} has no dist.tarball", name, manifest.version)))?;
        let tarball = self
            .registry
            .download_tarball(tarball_url)
            .await
            .map_err(|e| failed(format!("{:#}", e)))?;
        validate_archive_size(tarball.len() as u64, "npm tarball", MAX_ARCHIVE_SIZE)
            .map_err(|e| failed(e.to_string()))?;

        let staged = staging.join(format!(
            "{}-{}.tgz",
            name.as_str().replace(['@', '/'], "_"),
            manifest.version
        ));
        tokio::fs::write(&staged, &tarball)
            .await
            .map_err(|e| failed(format!("failed to stage tarball: {}", e)))?;
        validate_regular_file(&staged, "staged tarball").map_err(|e| failed(e.to_string()))?;
        let staged_bytes = tokio::fs::read(&staged)
            .await
            .map_err(|e| failed(format!("failed to read staged tarball: {}", e)))?;

        let archive = TarballConverter::to_zip(&staged_bytes).map_err(|e| failed(format!("{:#}", e)))?;
        if let Err(e) = tokio::fs::remove_file(&staged).await {
            tracing::debug!(path = %staged.display(), error = %e, "could not remove staged tarball");
        }

        self.extract(archive, url)
    }

    async fn resolve_github(
        &self,
        url: &str,
        slug: &RepoSlug,
        branch: Option<&str>,
    ) -> Result<ResolvedPackage, GateError> {
        let failed = |details: String| GateError::ResolutionFailed {
            source_ref: url.to_string(),
            details,
        };

        let branch = match branch {
            Some(branch) => branch.to_string(),
            None => self
                .host
                .default_branch(slug)
                .await
                .map_err(|e| failed(format!("{:#}", e)))?,
        };
        let archive = self
            .host
            .download_archive(slug, &branch)
            .await
            .map_err(|e| failed(format!("{:#}", e)))?;
        validate_archive_size(archive.len() as u64, "repository archive", MAX_ARCHIVE_SIZE)
            .map_err(|e| failed(e.to_string()))?;

        let package = self.extract(archive, url)?;
        if package.repository().is_none() {
            return Ok(package.with_repository(Some(slug.clone())));
        }
        Ok(package)
    }

    fn extract(&self, archive: Vec<u8>, source_ref: &str) -> Result<ResolvedPackage, GateError> {
        self.extractor.extract(archive).map_err(|e| match e {
            ExtractionError::MissingManifest => GateError::MissingManifest,
            other => GateError::ResolutionFailed {
                source_ref: source_ref.to_string(),
                details: other.to_string(),
            },
        })
    }
}
