use super::{Metric, ScoringTarget};
use crate::ingestion::domain::MetricKind;
use crate::ports::outbound::{IssueCounts, SourceHost};
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Correctness: share of all issues that have been closed
pub struct CorrectnessMetric {
    host: Arc<dyn SourceHost>,
}

impl CorrectnessMetric {
    pub fn new(host: Arc<dyn SourceHost>) -> Self {
        Self { host }
    }

    pub fn score(counts: IssueCounts) -> f64 {
        let total = counts.open + counts.closed;
        if total == 0 {
            return 1.0;
        }
        counts.closed as f64 / total as f64
    }
}

#[async_trait]
impl Metric for CorrectnessMetric {
    fn kind(&self) -> MetricKind {
        MetricKind::Correctness
    }

    async fn compute(&self, target: &ScoringTarget) -> Result<Option<f64>> {
        let counts = self.host.issue_counts(target.repo()).await?;
        Ok(Some(Self::score(counts)))
    }
}
