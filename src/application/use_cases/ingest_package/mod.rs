use crate::application::dto::{IngestRequest, IngestResponse, PackageData, PackageMetadata};
use crate::application::metrics::{MetricEngine, ScoringTarget};
use crate::application::use_cases::SourceResolver;
use crate::ingestion::domain::{PackageRecord, PackageReference, Rating, ResolvedPackage};
use crate::ingestion::services::{DebloatProcessor, GateDecision, QualityGate};
use crate::ports::outbound::{
    BlobStore, CreateOutcome, MetadataStore, ProgressReporter, ZIP_CONTENT_TYPE,
};
use crate::shared::error::{ErrorKind, GateError};
use base64::Engine as _;
use std::fmt;
use std::path::PathBuf;
use tempfile::TempDir;

/// Pipeline stages of a single ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionState {
    Validating,
    Resolving,
    Deduping,
    Scoring,
    Gating,
    Persisting,
    StoringBlob,
    Done,
    Errored(ErrorKind),
}

impl fmt::Display for IngestionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestionState::Errored(kind) => write!(f, "Errored({:?})", kind),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Tracks and logs the current stage
struct StateTracker {
    state: IngestionState,
}

impl StateTracker {
    fn new() -> Self {
        tracing::debug!(state = %IngestionState::Validating, "ingestion started");
        Self {
            state: IngestionState::Validating,
        }
    }

    fn advance(&mut self, next: IngestionState) {
        tracing::debug!(from = %self.state, to = %next, "ingestion state transition");
        self.state = next;
    }
}

/// IngestPackageUseCase - Core use case for package ingestion
///
/// Drives a reference through validate, resolve, dedupe, score, gate,
/// persist and blob upload. Every failure is returned as a typed
/// [`GateError`]; the staging directory is removed on every exit path.
///
/// # Type Parameters
/// * `MS` - MetadataStore implementation
/// * `BS` - BlobStore implementation
/// * `PR` - ProgressReporter implementation
pub struct IngestPackageUseCase<MS, BS, PR> {
    resolver: SourceResolver,
    engine: MetricEngine,
    metadata_store: MS,
    blob_store: BS,
    progress_reporter: PR,
    staging_root: Option<PathBuf>,
}

impl<MS, BS, PR> IngestPackageUseCase<MS, BS, PR>
where
    MS: MetadataStore,
    BS: BlobStore,
    PR: ProgressReporter,
{
    /// Creates a new IngestPackageUseCase with injected dependencies
    pub fn new(
        resolver: SourceResolver,
        engine: MetricEngine,
        metadata_store: MS,
        blob_store: BS,
        progress_reporter: PR,
    ) -> Self {
        Self {
            resolver,
            engine,
            metadata_store,
            blob_store,
            progress_reporter,
            staging_root: None,
        }
    }

    /// Places staging directories under `root` instead of the system temp dir
    pub fn with_staging_root(mut self, root: PathBuf) -> Self {
        self.staging_root = Some(root);
        self
    }

    /// Executes the ingestion use case
    ///
    /// # Arguments
    /// * `request` - Name, exactly one of Content or URL, and the debloat flag
    ///
    /// # Returns
    /// The stored package's metadata and base64 archive
    ///
    /// # Errors
    /// Returns the `GateError` of the stage that failed
    pub async fn execute(&self, request: IngestRequest) -> Result<IngestResponse, GateError> {
        let mut tracker = StateTracker::new();
        let outcome = self.run(request, &mut tracker).await;
        match &outcome {
            Ok(response) => {
                tracker.advance(IngestionState::Done);
                self.progress_reporter
                    .report_completion(&format!("✅ Stored package {}", response.metadata.id));
            }
            Err(e) => {
                tracker.advance(IngestionState::Errored(e.kind()));
                tracing::info!(error = %e, "ingestion rejected");
            }
        }
        outcome
    }

    async fn run(
        &self,
        request: IngestRequest,
        tracker: &mut StateTracker,
    ) -> Result<IngestResponse, GateError> {
        let reference =
            PackageReference::new(request.name, request.content, request.url, request.debloat)?;

        tracker.advance(IngestionState::Resolving);
        self.progress_reporter
            .report(&format!("🔍 Resolving {}...", reference.source_label()));
        let staging = self.create_staging_dir(&reference)?;
        let mut package = self.resolver.resolve(&reference, staging.path()).await?;
        let id = package.id();
        self.progress_reporter.report(&format!(
            "📦 Resolved {}@{}",
            package.name(),
            package.version()
        ));

        tracker.advance(IngestionState::Deduping);
        match self.metadata_store.get(id.as_str()).await {
            Ok(Some(_)) => {
                return Err(GateError::Conflict { id: id.to_string() });
            }
            Ok(None) => {}
            Err(e) => {
                // The conditional create below still guards against duplicates
                tracing::warn!(package = %id, error = %e, "duplicate check failed");
            }
        }

        tracker.advance(IngestionState::Scoring);
        let rating = self.score(&reference, &package).await?;

        tracker.advance(IngestionState::Gating);
        if let GateDecision::Reject { reason } =
            QualityGate::evaluate(&rating, reference.is_url_sourced())
        {
            return Err(GateError::Disqualified {
                id: id.to_string(),
                reason,
            });
        }

        if reference.debloat() {
            self.progress_reporter.report("🗜️  Debloating package archive...");
            let debloated = DebloatProcessor::debloat(package.archive());
            package.replace_archive(debloated);
        }

        tracker.advance(IngestionState::Persisting);
        let record = PackageRecord::from_resolved(&package, &rating).map_err(|e| {
            GateError::PersistenceFailed {
                id: id.to_string(),
                details: format!("{:#}", e),
            }
        })?;
        match self.metadata_store.create(&record).await {
            Ok(CreateOutcome::Created) => {}
            Ok(CreateOutcome::Conflict) => return Err(GateError::Conflict { id: id.to_string() }),
            Err(e) => {
                return Err(GateError::PersistenceFailed {
                    id: id.to_string(),
                    details: format!("{:#}", e),
                })
            }
        }

        tracker.advance(IngestionState::StoringBlob);
        self.blob_store
            .put(id.as_str(), package.archive(), ZIP_CONTENT_TYPE)
            .await
            .map_err(|e| GateError::BlobStoreFailed {
                id: id.to_string(),
                details: format!("{:#}", e),
            })?;

        Ok(IngestResponse {
            metadata: PackageMetadata {
                name: package.name().to_string(),
                version: package.version().to_string(),
                id: id.to_string(),
            },
            data: PackageData {
                content: base64::engine::general_purpose::STANDARD.encode(package.archive()),
                url: reference.url().map(str::to_string),
            },
        })
    }

    async fn score(
        &self,
        reference: &PackageReference,
        package: &ResolvedPackage,
    ) -> Result<Rating, GateError> {
        let Some(repo) = package.repository() else {
            if reference.is_url_sourced() {
                return Err(GateError::Disqualified {
                    id: package.id().to_string(),
                    reason: "package.json has no GitHub repository to score".to_string(),
                });
            }
            tracing::info!(package = %package.id(), "no repository, skipping scoring");
            return Ok(Rating::unscored());
        };

        self.progress_reporter
            .report(&format!("📊 Scoring {}...", repo.url()));
        let target =
            ScoringTarget::with_dependencies(repo.clone(), package.runtime_dependencies().clone());
        Ok(self.engine.score(target).await)
    }

    fn create_staging_dir(&self, reference: &PackageReference) -> Result<TempDir, GateError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("registry-gate-");
        let created = match &self.staging_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };
        created.map_err(|e| GateError::ResolutionFailed {
            source_ref: reference.source_label(),
            details: format!("failed to create staging directory: {}", e),
        })
    }
}
