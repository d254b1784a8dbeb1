use crate::application::metrics::{MetricEngine, ScoringTarget};
use crate::ingestion::domain::{Rating, RepoSlug};
use crate::ingestion::services::{SourceClassifier, SourceKind};
use crate::ports::outbound::{PackageRegistry, ProgressReporter};
use crate::shared::Result;
use std::sync::Arc;

/// Rating (or failure) for one input URL
#[derive(Debug, Clone)]
pub struct UrlScore {
    pub url: String,
    pub outcome: std::result::Result<Rating, String>,
}

/// ScoreUrlsUseCase - rates repositories without ingesting them
///
/// npm URLs are mapped to their GitHub repository through the registry's
/// `latest` manifest; GitHub URLs are scored directly.
pub struct ScoreUrlsUseCase<PR> {
    registry: Arc<dyn PackageRegistry>,
    engine: MetricEngine,
    progress_reporter: PR,
}

impl<PR: ProgressReporter> ScoreUrlsUseCase<PR> {
    pub fn new(registry: Arc<dyn PackageRegistry>, engine: MetricEngine, progress_reporter: PR) -> Self {
        Self {
            registry,
            engine,
            progress_reporter,
        }
    }

    /// Scores every URL in order; a URL that cannot be scored yields an
    /// error entry instead of aborting the batch
    pub async fn execute(&self, urls: &[String]) -> Vec<UrlScore> {
        let total = urls.len();
        let mut scores = Vec::with_capacity(total);

        for (index, url) in urls.iter().enumerate() {
            self.progress_reporter
                .report_progress(index, total, Some(url.as_str()));
            let outcome = match self.target_for(url).await {
                Ok(target) => Ok(self.engine.score(target).await),
                Err(e) => {
                    self.progress_reporter
                        .report_error(&format!("⚠️  {}: {:#}", url, e));
                    Err(format!("{:#}", e))
                }
            };
            scores.push(UrlScore {
                url: url.clone(),
                outcome,
            });
        }

        self.progress_reporter.report_progress(total, total, None);
        scores
    }

    async fn target_for(&self, url: &str) -> Result<ScoringTarget> {
        match SourceClassifier::classify(url) {
            Some(SourceKind::GitHub { slug, .. }) => Ok(ScoringTarget::repository(slug)),
            Some(SourceKind::Npm { name, version }) => {
                let manifest = self
                    .registry
                    .fetch_manifest(&name, version.as_deref().unwrap_or("latest"))
                    .await?;
                let slug = manifest
                    .repository
                    .as_ref()
                    .and_then(RepoSlug::from_manifest_value)
                    .ok_or_else(|| {
                        anyhow::anyhow!("{}@{} has no GitHub repository", name, manifest.version)
                    })?;
                Ok(ScoringTarget::with_dependencies(slug, manifest.dependencies))
            }
            None => anyhow::bail!("unsupported URL (expected npmjs.com or github.com)"),
        }
    }
}
