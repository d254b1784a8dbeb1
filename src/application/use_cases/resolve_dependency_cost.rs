use crate::application::dto::CostRequest;
use crate::ingestion::domain::{CostEntry, CostReport, CostScope, PackageRecord};
use crate::ports::outbound::{BlobStore, MetadataStore, PackageRegistry, RegistryManifest};
use crate::shared::error::GateError;
use crate::shared::Result;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;

/// Maximum concurrent registry requests per traversal level
const MAX_CONCURRENT_FETCHES: usize = 8;

/// Dist-tag every dependency is resolved against
const LATEST_TAG: &str = "latest";

/// Default bound on transitive traversal depth
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// ResolveDependencyCostUseCase - estimates the installed size of a package
///
/// Walks the dependency graph breadth-first against the registry. A visited
/// set keyed by `name@version`, together with the set of names already
/// requested, makes cycles and diamonds terminate and keeps every package
/// counted once.
///
/// # Type Parameters
/// * `REG` - PackageRegistry implementation; each name is fetched at most
///   once per walk, so no cache is needed in front of it
/// * `MS` - MetadataStore implementation
/// * `BS` - BlobStore implementation
pub struct ResolveDependencyCostUseCase<REG, MS, BS> {
    registry: REG,
    metadata_store: MS,
    blob_store: BS,
    max_depth: usize,
}

impl<REG, MS, BS> ResolveDependencyCostUseCase<REG, MS, BS>
where
    REG: PackageRegistry,
    MS: MetadataStore,
    BS: BlobStore,
{
    pub fn new(registry: REG, metadata_store: MS, blob_store: BS) -> Self {
        Self {
            registry,
            metadata_store,
            blob_store,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Executes the cost resolution
    ///
    /// # Errors
    /// - `PackageNotFound` if no record exists for the ID
    /// - `ResolutionFailed` if the stored record cannot be read
    ///
    /// Dependencies that cannot be fetched are listed in the report's
    /// `unresolved` field rather than failing the request.
    pub async fn execute(&self, request: CostRequest) -> std::result::Result<CostReport, GateError> {
        let record = self.load_record(&request.package_id).await?;

        match request.scope {
            CostScope::RootOnly => self.root_cost(&record).await,
            CostScope::FirstLevel | CostScope::Transitive => {
                let dependencies = record.dependencies().map_err(|e| {
                    GateError::ResolutionFailed {
                        source_ref: record.id().to_string(),
                        details: format!("{:#}", e),
                    }
                })?;
                let roots: Vec<String> = dependencies.into_keys().collect();
                Ok(self.walk(roots, request.scope).await)
            }
        }
    }

    async fn load_record(&self, id: &str) -> std::result::Result<PackageRecord, GateError> {
        match self.metadata_store.get(id).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(GateError::PackageNotFound { id: id.to_string() }),
            Err(e) => Err(GateError::ResolutionFailed {
                source_ref: id.to_string(),
                details: format!("{:#}", e),
            }),
        }
    }

    async fn root_cost(&self, record: &PackageRecord) -> std::result::Result<CostReport, GateError> {
        let mut report = CostReport::new();
        let archive = self
            .blob_store
            .get(record.id())
            .await
            .map_err(|e| GateError::ResolutionFailed {
                source_ref: record.id().to_string(),
                details: format!("{:#}", e),
            })?;

        match archive {
            Some(bytes) => {
                report.add(CostEntry {
                    package_name: record.name().to_string(),
                    package_version: record.version().to_string(),
                    unpacked_size_bytes: bytes.len() as u64,
                });
            }
            None => report.add_unresolved(record.id()),
        }
        Ok(report)
    }

    async fn walk(&self, roots: Vec<String>, scope: CostScope) -> CostReport {
        let mut report = CostReport::new();
        let mut requested: HashSet<String> = HashSet::new();
        let mut visited: HashSet<String> = HashSet::new();

        let mut frontier: Vec<String> = roots
            .into_iter()
            .filter(|name| requested.insert(name.clone()))
            .collect();
        let mut depth = 1;

        while !frontier.is_empty() {
            tracing::debug!(depth, packages = frontier.len(), "resolving dependency level");

            let mut fetched: Vec<(String, Result<RegistryManifest>)> = stream::iter(frontier)
                .map(|name| async move {
                    let manifest = self.registry.fetch_manifest(&name, LATEST_TAG).await;
                    (name, manifest)
                })
                .buffer_unordered(MAX_CONCURRENT_FETCHES)
                .collect()
                .await;
            fetched.sort_by(|a, b| a.0.cmp(&b.0));

            let descend = scope == CostScope::Transitive && depth < self.max_depth;
            let mut next = Vec::new();
            for (name, outcome) in fetched {
                let manifest = match outcome {
                    Ok(manifest) => manifest,
                    Err(e) => {
                        tracing::warn!(package = %name, error = %e, "could not fetch dependency manifest");
                        report.add_unresolved(name);
                        continue;
                    }
                };

                if !visited.insert(format!("{}@{}", manifest.name, manifest.version)) {
                    continue;
                }
                report.add(CostEntry {
                    package_name: manifest.name.clone(),
                    package_version: manifest.version.clone(),
                    unpacked_size_bytes: manifest.dist.unpacked_size.unwrap_or(0),
                });

                if descend {
                    next.extend(
                        manifest
                            .dependencies
                            .into_keys()
                            .filter(|dep| requested.insert(dep.clone())),
                    );
                }
            }

            frontier = next;
            depth += 1;
        }

        tracing::info!(
            total_bytes = report.total_bytes(),
            packages = report.per_dependency().len(),
            unresolved = report.unresolved().len(),
            "dependency cost resolved"
        );
        report
    }
}
