use super::{Metric, ScoringTarget};
use crate::ingestion::domain::{DependencyMap, MetricKind};
use crate::ingestion::policies::VersionPinningPolicy;
use crate::ports::outbound::SourceHost;
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct ManifestDependencies {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
}

/// VersionPinning: share of runtime dependencies pinned to a major+minor release
pub struct VersionPinningMetric {
    host: Arc<dyn SourceHost>,
}

impl VersionPinningMetric {
    pub fn new(host: Arc<dyn SourceHost>) -> Self {
        Self { host }
    }

    async fn dependencies(&self, target: &ScoringTarget) -> Result<Option<DependencyMap>> {
        if let Some(deps) = target.runtime_dependencies() {
            return Ok(Some(deps.clone()));
        }

        let Some(text) = self.host.file_content(target.repo(), "package.json").await? else {
            return Ok(None);
        };
        let manifest: ManifestDependencies = serde_json::from_str(&text)
            .with_context(|| format!("package.json of {} is not valid JSON", target.repo()))?;
        Ok(Some(
            manifest
                .dependencies
                .into_iter()
                .filter_map(|(name, v)| v.as_str().map(|v| (name, v.to_string())))
                .collect(),
        ))
    }
}

#[async_trait]
impl Metric for VersionPinningMetric {
    fn kind(&self) -> MetricKind {
        MetricKind::VersionPinning
    }

    async fn compute(&self, target: &ScoringTarget) -> Result<Option<f64>> {
        Ok(self
            .dependencies(target)
            .await?
            .map(|deps| VersionPinningPolicy::score(&deps)))
    }
}
