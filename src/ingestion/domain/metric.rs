use std::time::Duration;

/// The fixed set of quality signals computed for a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKind {
    BusFactor,
    ResponsiveMaintainer,
    Correctness,
    RampUp,
    EngineeringProcess,
    VersionPinning,
    License,
}

impl MetricKind {
    pub const ALL: [MetricKind; 7] = [
        MetricKind::BusFactor,
        MetricKind::ResponsiveMaintainer,
        MetricKind::Correctness,
        MetricKind::RampUp,
        MetricKind::EngineeringProcess,
        MetricKind::VersionPinning,
        MetricKind::License,
    ];

    /// Contribution to the weighted average, or `None` for metrics that act
    /// as a multiplicative gate instead
    pub fn weight(self) -> Option<f64> {
        match self {
            MetricKind::BusFactor => Some(0.30),
            MetricKind::ResponsiveMaintainer => Some(0.30),
            MetricKind::Correctness => Some(0.15),
            MetricKind::RampUp => Some(0.15),
            MetricKind::EngineeringProcess => Some(0.05),
            MetricKind::VersionPinning => Some(0.05),
            MetricKind::License => None,
        }
    }

    /// Key used in the stored rating document
    pub fn json_key(self) -> &'static str {
        match self {
            MetricKind::BusFactor => "BusFactor",
            MetricKind::ResponsiveMaintainer => "ResponsiveMaintainer",
            MetricKind::Correctness => "Correctness",
            MetricKind::RampUp => "RampUp",
            MetricKind::EngineeringProcess => "PullRequest",
            MetricKind::VersionPinning => "GoodPinningPractice",
            MetricKind::License => "LicenseScore",
        }
    }

    pub fn from_json_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.json_key() == key)
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.json_key())
    }
}

/// Outcome of a single metric: a score in `[0, 1]` or a marker that the
/// signal could not be computed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricScore {
    Available(f64),
    Unavailable,
}

impl MetricScore {
    /// Sentinel written to storage for an unavailable score
    pub const UNAVAILABLE_SENTINEL: f64 = -1.0;

    /// Builds an available score, clamping into `[0, 1]`.
    /// Non-finite input is treated as unavailable.
    pub fn available(value: f64) -> Self {
        if value.is_finite() {
            MetricScore::Available(value.clamp(0.0, 1.0))
        } else {
            MetricScore::Unavailable
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            MetricScore::Available(v) => Some(v),
            MetricScore::Unavailable => None,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, MetricScore::Available(_))
    }

    pub fn to_stored(self) -> f64 {
        self.value().unwrap_or(Self::UNAVAILABLE_SENTINEL)
    }

    pub fn from_stored(value: f64) -> Self {
        if value < 0.0 {
            MetricScore::Unavailable
        } else {
            MetricScore::available(value)
        }
    }
}

/// A metric's score together with the time it took to compute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricResult {
    kind: MetricKind,
    score: MetricScore,
    latency: Duration,
}

impl MetricResult {
    pub fn new(kind: MetricKind, score: MetricScore, latency: Duration) -> Self {
        Self {
            kind,
            score,
            latency,
        }
    }

    pub fn unavailable(kind: MetricKind) -> Self {
        Self::new(kind, MetricScore::Unavailable, Duration::ZERO)
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn score(&self) -> MetricScore {
        self.score
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = MetricKind::ALL.iter().filter_map(|k| k.weight()).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(MetricKind::License.weight(), None);
    }

    #[test]
    fn test_json_keys_round_trip() {
        for kind in MetricKind::ALL {
            assert_eq!(MetricKind::from_json_key(kind.json_key()), Some(kind));
        }
        assert_eq!(MetricKind::from_json_key("NetScore"), None);
    }

    #[test]
    fn test_score_clamping_and_sentinel() {
        assert_eq!(MetricScore::available(1.7), MetricScore::Available(1.0));
        assert_eq!(MetricScore::available(-0.2), MetricScore::Available(0.0));
        assert_eq!(MetricScore::available(f64::NAN), MetricScore::Unavailable);
        assert_eq!(MetricScore::Unavailable.to_stored(), -1.0);
        assert_eq!(MetricScore::from_stored(-1.0), MetricScore::Unavailable);
        assert_eq!(MetricScore::from_stored(0.25), MetricScore::Available(0.25));
    }

    #[test]
    fn test_unavailable_result() {
        let result = MetricResult::unavailable(MetricKind::RampUp);
        assert_eq!(result.kind(), MetricKind::RampUp);
        assert!(!result.score().is_available());
        assert_eq!(result.latency(), Duration::ZERO);
    }
}
