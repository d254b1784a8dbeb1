//! registry-gate - quality scoring and ingestion for an npm package registry
//!
//! Packages arrive as a zip upload or as an npmjs.com / github.com URL. They
//! are resolved to a canonical zip archive, scored against their GitHub
//! repository, gated on the scores, optionally debloated, and stored as a
//! metadata record plus a blob.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`ingestion`): Value objects, archive services and scoring policies
//! - **Application Layer** (`application`): Use cases, metrics and DTOs
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): npm registry, GitHub, filesystem stores and console
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use registry_gate::prelude::*;
//! use std::path::Path;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn run() -> Result<()> {
//! let registry: Arc<dyn PackageRegistry> = Arc::new(NpmRegistryClient::new(
//!     DEFAULT_NPM_REGISTRY_URL,
//!     Duration::from_secs(30),
//! )?);
//! let host: Arc<dyn SourceHost> = Arc::new(GitHubClient::new(
//!     DEFAULT_GITHUB_API_URL,
//!     DEFAULT_GITHUB_WEB_URL,
//!     None,
//!     Duration::from_secs(30),
//! )?);
//!
//! let use_case = IngestPackageUseCase::new(
//!     SourceResolver::new(registry, host.clone(), ManifestExtractor::new(true)),
//!     MetricEngine::new(host),
//!     FileMetadataStore::new(Path::new(".registry-gate")),
//!     FileBlobStore::new(Path::new(".registry-gate")),
//!     StderrProgressReporter::new(),
//! );
//!
//! let request = IngestRequest::from_url("braces", "https://www.npmjs.com/package/braces", false);
//! let response = use_case.execute(request).await?;
//! println!("{}", response.metadata.id);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod ingestion;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::network::{
        CachingRegistryClient, GitHubClient, NpmRegistryClient, DEFAULT_GITHUB_API_URL,
        DEFAULT_GITHUB_WEB_URL, DEFAULT_NPM_REGISTRY_URL,
    };
    pub use crate::adapters::outbound::storage::{FileBlobStore, FileMetadataStore};
    pub use crate::application::dto::{CostRequest, IngestRequest, IngestResponse};
    pub use crate::application::metrics::{Metric, MetricEngine, ScoringTarget};
    pub use crate::application::use_cases::{
        IngestPackageUseCase, RatePackageUseCase, ResolveDependencyCostUseCase,
        ScoreUrlsUseCase, SourceResolver,
    };
    pub use crate::ingestion::domain::{
        CostReport, CostScope, MetricKind, MetricScore, PackageId, PackageRecord, Rating,
        RepoSlug,
    };
    pub use crate::ingestion::services::{DebloatProcessor, ManifestExtractor, QualityGate};
    pub use crate::ports::outbound::{
        BlobStore, MetadataStore, PackageRegistry, ProgressReporter, SourceHost,
    };
    pub use crate::shared::error::GateError;
    pub use crate::shared::Result;
}
