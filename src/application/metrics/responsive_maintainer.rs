use super::{Metric, ScoringTarget};
use crate::ingestion::domain::MetricKind;
use crate::ports::outbound::{IssueActivity, SourceHost};
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Number of recent issues and pull requests sampled
pub const SAMPLE_SIZE: usize = 100;

/// An item open or unresolved this many days contributes nothing
const HORIZON_DAYS: f64 = 30.0;

/// ResponsiveMaintainer: how quickly recent issues and pull requests get closed
pub struct ResponsiveMaintainerMetric {
    host: Arc<dyn SourceHost>,
}

impl ResponsiveMaintainerMetric {
    pub fn new(host: Arc<dyn SourceHost>) -> Self {
        Self { host }
    }

    /// Mean per-item score; closed items are judged on time to close and
    /// open items on their age. No activity scores 1.0.
    pub fn score(items: &[IssueActivity], now: DateTime<Utc>) -> f64 {
        if items.is_empty() {
            return 1.0;
        }

        let total: f64 = items
            .iter()
            .map(|item| {
                let end = item.closed_at.unwrap_or(now);
                let days = (end - item.created_at).num_seconds().max(0) as f64 / 86_400.0;
                (1.0 - days / HORIZON_DAYS).max(0.0)
            })
            .sum();

        total / items.len() as f64
    }
}

#[async_trait]
impl Metric for ResponsiveMaintainerMetric {
    fn kind(&self) -> MetricKind {
        MetricKind::ResponsiveMaintainer
    }

    async fn compute(&self, target: &ScoringTarget) -> Result<Option<f64>> {
        let items = self.host.recent_issues(target.repo(), SAMPLE_SIZE).await?;
        Ok(Some(Self::score(&items, Utc::now())))
    }
}
