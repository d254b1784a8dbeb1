//! Quality metrics computed against a package's source repository.
//!
//! Each metric is an independent [`Metric`] implementation; the
//! [`MetricEngine`] runs the fixed set concurrently and aggregates them.

mod bus_factor;
mod correctness;
mod engine;
mod engineering_process;
mod license;
mod ramp_up;
mod responsive_maintainer;
mod version_pinning;

pub use bus_factor::BusFactorMetric;
pub use correctness::CorrectnessMetric;
pub use engine::MetricEngine;
pub use engineering_process::EngineeringProcessMetric;
pub use license::LicenseMetric;
pub use ramp_up::RampUpMetric;
pub use responsive_maintainer::ResponsiveMaintainerMetric;
pub use version_pinning::VersionPinningMetric;

use crate::ingestion::domain::{DependencyMap, MetricKind, MetricResult, MetricScore, RepoSlug};
use crate::shared::Result;
use async_trait::async_trait;
use std::time::Instant;

/// What the metrics are evaluated against
#[derive(Debug, Clone)]
pub struct ScoringTarget {
    repo: RepoSlug,
    runtime_dependencies: Option<DependencyMap>,
}

impl ScoringTarget {
    /// A repository scored on its own (dependencies read from the host)
    pub fn repository(repo: RepoSlug) -> Self {
        Self {
            repo,
            runtime_dependencies: None,
        }
    }

    /// A repository scored together with the runtime dependencies of the
    /// package that was resolved from it
    pub fn with_dependencies(repo: RepoSlug, runtime_dependencies: DependencyMap) -> Self {
        Self {
            repo,
            runtime_dependencies: Some(runtime_dependencies),
        }
    }

    pub fn repo(&self) -> &RepoSlug {
        &self.repo
    }

    pub fn runtime_dependencies(&self) -> Option<&DependencyMap> {
        self.runtime_dependencies.as_ref()
    }
}

/// A single quality signal.
///
/// `compute` returns `Ok(Some(score))` with a score in `[0, 1]`,
/// `Ok(None)` when the host has no data for it, or an error; the latter
/// two both surface as [`MetricScore::Unavailable`].
#[async_trait]
pub trait Metric: Send + Sync {
    fn kind(&self) -> MetricKind;

    async fn compute(&self, target: &ScoringTarget) -> Result<Option<f64>>;

    /// Runs `compute`, measuring its latency and recovering failures
    async fn evaluate(&self, target: &ScoringTarget) -> MetricResult {
        let started = Instant::now();
        let outcome = self.compute(target).await;
        let latency = started.elapsed();

        let score = match outcome {
            Ok(Some(value)) => MetricScore::available(value),
            Ok(None) => {
                tracing::debug!(metric = %self.kind(), repo = %target.repo(), "metric has no data");
                MetricScore::Unavailable
            }
            Err(e) => {
                tracing::warn!(metric = %self.kind(), repo = %target.repo(), error = %e, "metric failed");
                MetricScore::Unavailable
            }
        };
        MetricResult::new(self.kind(), score, latency)
    }
}
