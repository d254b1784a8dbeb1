use super::{
    BusFactorMetric, CorrectnessMetric, EngineeringProcessMetric, LicenseMetric, Metric,
    RampUpMetric, ResponsiveMaintainerMetric, ScoringTarget, VersionPinningMetric,
};
use crate::ingestion::domain::{MetricResult, NetScore, Rating};
use crate::ingestion::services::NetScoreCalculator;
use crate::ports::outbound::SourceHost;
use std::sync::Arc;
use std::time::Instant;

/// MetricEngine runs every metric concurrently and aggregates the results
///
/// Each metric runs in its own task. The engine waits for all of them; a
/// metric that fails or panics is reported as unavailable without
/// affecting the others.
pub struct MetricEngine {
    metrics: Vec<Arc<dyn Metric>>,
}

impl MetricEngine {
    /// Creates an engine with the standard metric set backed by `host`
    pub fn new(host: Arc<dyn SourceHost>) -> Self {
        Self::with_metrics(vec![
            Arc::new(BusFactorMetric::new(host.clone())),
            Arc::new(ResponsiveMaintainerMetric::new(host.clone())),
            Arc::new(CorrectnessMetric::new(host.clone())),
            Arc::new(RampUpMetric::new(host.clone())),
            Arc::new(EngineeringProcessMetric::new(host.clone())),
            Arc::new(VersionPinningMetric::new(host.clone())),
            Arc::new(LicenseMetric::new(host)),
        ])
    }

    pub fn with_metrics(metrics: Vec<Arc<dyn Metric>>) -> Self {
        Self { metrics }
    }

    /// Scores a repository
    ///
    /// # Returns
    /// A rating with one result per metric and the weighted NetScore,
    /// whose latency is the wall-clock time until every metric settled
    pub async fn score(&self, target: ScoringTarget) -> Rating {
        let started = Instant::now();
        let target = Arc::new(target);

        let handles: Vec<_> = self
            .metrics
            .iter()
            .map(|metric| {
                let metric = Arc::clone(metric);
                let target = Arc::clone(&target);
                let kind = metric.kind();
                (
                    kind,
                    tokio::spawn(async move { metric.evaluate(&target).await }),
                )
            })
            .collect();

        let mut results: Vec<MetricResult> = Vec::with_capacity(handles.len());
        for (kind, handle) in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::warn!(metric = %kind, error = %e, "metric task aborted");
                    results.push(MetricResult::unavailable(kind));
                }
            }
        }

        let net = NetScoreCalculator::calculate(&results);
        let latency = started.elapsed();
        tracing::info!(
            repo = %target.repo(),
            net_score = net.to_stored(),
            latency_ms = latency.as_millis() as u64,
            "scored repository"
        );

        Rating::new(results, NetScore::new(net, latency))
    }
}
