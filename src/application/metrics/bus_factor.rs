use super::{Metric, ScoringTarget};
use crate::ingestion::domain::MetricKind;
use crate::ports::outbound::{ContributorCommits, SourceHost};
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Contributors needed for a full score
const SATURATION: usize = 5;

/// Share of all commits the top contributors must cover
const COVERAGE: f64 = 0.5;

/// BusFactor: how many top contributors it takes to account for half the
/// commits, saturating at five
pub struct BusFactorMetric {
    host: Arc<dyn SourceHost>,
}

impl BusFactorMetric {
    pub fn new(host: Arc<dyn SourceHost>) -> Self {
        Self { host }
    }

    pub fn score(contributors: &[ContributorCommits]) -> f64 {
        let mut commits: Vec<u64> = contributors.iter().map(|c| c.commits).collect();
        let total: u64 = commits.iter().sum();
        if total == 0 {
            return 0.0;
        }

        commits.sort_unstable_by(|a, b| b.cmp(a));
        let target = total as f64 * COVERAGE;
        let mut covered = 0u64;
        let mut needed = 0usize;
        for count in commits {
            covered += count;
            needed += 1;
            if covered as f64 >= target {
                break;
            }
        }

        needed.min(SATURATION) as f64 / SATURATION as f64
    }
}

#[async_trait]
impl Metric for BusFactorMetric {
    fn kind(&self) -> MetricKind {
        MetricKind::BusFactor
    }

    async fn compute(&self, target: &ScoringTarget) -> Result<Option<f64>> {
        Ok(self
            .host
            .contributor_commits(target.repo())
            .await?
            .map(|contributors| Self::score(&contributors)))
    }
}
