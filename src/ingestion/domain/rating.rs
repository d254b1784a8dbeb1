use super::metric::{MetricKind, MetricResult, MetricScore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

const NET_SCORE_KEY: &str = "NetScore";
const LATENCY_SUFFIX: &str = "Latency";

/// Aggregated gating score and the wall-clock time it took to compute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetScore {
    score: MetricScore,
    latency: Duration,
}

impl NetScore {
    pub fn new(score: MetricScore, latency: Duration) -> Self {
        Self { score, latency }
    }

    /// Score used when no repository was available to evaluate
    pub fn unavailable() -> Self {
        Self::new(MetricScore::Unavailable, Duration::ZERO)
    }

    pub fn score(&self) -> MetricScore {
        self.score
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

/// The full set of metric results for a package plus its NetScore.
///
/// Stored as a flat JSON object: one key per metric, a `<Key>Latency` entry
/// in seconds next to each, and `NetScore`/`NetScoreLatency`. Unavailable
/// scores are written as `-1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "BTreeMap<String, f64>", try_from = "BTreeMap<String, f64>")]
pub struct Rating {
    metrics: Vec<MetricResult>,
    net_score: NetScore,
}

impl Rating {
    pub fn new(mut metrics: Vec<MetricResult>, net_score: NetScore) -> Self {
        metrics.sort_by_key(|m| m.kind());
        Self { metrics, net_score }
    }

    /// Rating of a package that could not be scored at all
    pub fn unscored() -> Self {
        Self::new(
            MetricKind::ALL
                .into_iter()
                .map(MetricResult::unavailable)
                .collect(),
            NetScore::unavailable(),
        )
    }

    pub fn metrics(&self) -> &[MetricResult] {
        &self.metrics
    }

    pub fn metric(&self, kind: MetricKind) -> Option<&MetricResult> {
        self.metrics.iter().find(|m| m.kind() == kind)
    }

    pub fn net_score(&self) -> &NetScore {
        &self.net_score
    }
}

impl From<Rating> for BTreeMap<String, f64> {
    fn from(rating: Rating) -> Self {
        let mut map = BTreeMap::new();
        for metric in &rating.metrics {
            let key = metric.kind().json_key();
            map.insert(key.to_string(), metric.score().to_stored());
            map.insert(
                format!("{}{}", key, LATENCY_SUFFIX),
                metric.latency().as_secs_f64(),
            );
        }
        map.insert(NET_SCORE_KEY.to_string(), rating.net_score.score().to_stored());
        map.insert(
            format!("{}{}", NET_SCORE_KEY, LATENCY_SUFFIX),
            rating.net_score.latency().as_secs_f64(),
        );
        map
    }
}

impl TryFrom<BTreeMap<String, f64>> for Rating {
    type Error = String;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let latency_of = |key: &str| -> Duration {
            map.get(&format!("{}{}", key, LATENCY_SUFFIX))
                .copied()
                .filter(|secs| secs.is_finite() && *secs >= 0.0)
                .map(Duration::from_secs_f64)
                .unwrap_or_default()
        };

        let metrics = MetricKind::ALL
            .into_iter()
            .map(|kind| {
                let score = map
                    .get(kind.json_key())
                    .copied()
                    .map(MetricScore::from_stored)
                    .unwrap_or(MetricScore::Unavailable);
                MetricResult::new(kind, score, latency_of(kind.json_key()))
            })
            .collect();

        let net = map
            .get(NET_SCORE_KEY)
            .copied()
            .ok_or_else(|| format!("rating is missing the {} field", NET_SCORE_KEY))?;

        Ok(Rating::new(
            metrics,
            NetScore::new(MetricScore::from_stored(net), latency_of(NET_SCORE_KEY)),
        ))
    }
}
