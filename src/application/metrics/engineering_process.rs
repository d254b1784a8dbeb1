use super::{Metric, ScoringTarget};
use crate::ingestion::domain::MetricKind;
use crate::ports::outbound::{PullRequestReview, SourceHost};
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// EngineeringProcess: share of merged code that went through an approving review
pub struct EngineeringProcessMetric {
    host: Arc<dyn SourceHost>,
}

impl EngineeringProcessMetric {
    pub fn new(host: Arc<dyn SourceHost>) -> Self {
        Self { host }
    }

    pub fn score(pull_requests: &[PullRequestReview]) -> f64 {
        let total: u64 = pull_requests.iter().map(|pr| pr.additions).sum();
        if total == 0 {
            return 0.0;
        }
        let reviewed: u64 = pull_requests
            .iter()
            .filter(|pr| pr.approved)
            .map(|pr| pr.additions)
            .sum();
        reviewed as f64 / total as f64
    }
}

#[async_trait]
impl Metric for EngineeringProcessMetric {
    fn kind(&self) -> MetricKind {
        MetricKind::EngineeringProcess
    }

    async fn compute(&self, target: &ScoringTarget) -> Result<Option<f64>> {
        let pull_requests = self.host.merged_pull_requests(target.repo()).await?;
        Ok(Some(Self::score(&pull_requests)))
    }
}
