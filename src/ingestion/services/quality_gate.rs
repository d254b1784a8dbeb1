use crate::ingestion::domain::Rating;

/// Minimum score at least one metric must reach for a URL-sourced package
pub const ACCEPTANCE_THRESHOLD: f64 = 0.5;

/// Verdict of the quality gate
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Accept,
    Reject { reason: String },
}

/// QualityGate service deciding whether a scored package may be stored
///
/// Only URL-sourced packages are gated. A package is rejected unless at
/// least one metric reaches [`ACCEPTANCE_THRESHOLD`]; an unavailable metric
/// never does, so a rating with nothing available is rejected too.
pub struct QualityGate;

impl QualityGate {
    pub fn evaluate(rating: &Rating, url_sourced: bool) -> GateDecision {
        if !url_sourced {
            return GateDecision::Accept;
        }

        let available: Vec<f64> = rating
            .metrics()
            .iter()
            .filter_map(|m| m.score().value())
            .collect();

        if available.iter().any(|v| *v >= ACCEPTANCE_THRESHOLD) {
            return GateDecision::Accept;
        }

        let reason = match available.iter().copied().reduce(f64::max) {
            Some(best) => format!(
                "all {} available metrics scored below {} (best {:.2})",
                available.len(),
                ACCEPTANCE_THRESHOLD,
                best
            ),
            None => "no metric could be computed for the repository".to_string(),
        };
        GateDecision::Reject { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::domain::{MetricKind, MetricResult, MetricScore, NetScore};
    use std::time::Duration;

    fn rating(scores: &[(MetricKind, MetricScore)]) -> Rating {
        Rating::new(
            scores
                .iter()
                .map(|(k, s)| MetricResult::new(*k, *s, Duration::ZERO))
                .collect(),
            NetScore::unavailable(),
        )
    }

    #[test]
    fn test_all_low_rejected() {
        let r = rating(&[
            (MetricKind::BusFactor, MetricScore::Available(0.2)),
            (MetricKind::RampUp, MetricScore::Available(0.49)),
            (MetricKind::Correctness, MetricScore::Unavailable),
        ]);
        match QualityGate::evaluate(&r, true) {
            GateDecision::Reject { reason } => assert!(reason.contains("below 0.5")),
            GateDecision::Accept => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_one_high_metric_accepts() {
        let r = rating(&[
            (MetricKind::BusFactor, MetricScore::Available(0.2)),
            (MetricKind::License, MetricScore::Available(1.0)),
        ]);
        assert_eq!(QualityGate::evaluate(&r, true), GateDecision::Accept);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let r = rating(&[(MetricKind::BusFactor, MetricScore::Available(0.5))]);
        assert_eq!(QualityGate::evaluate(&r, true), GateDecision::Accept);
    }

    #[test]
    fn test_no_available_metrics_rejected() {
        let r = rating(
            &MetricKind::ALL
                .iter()
                .map(|k| (*k, MetricScore::Unavailable))
                .collect::<Vec<_>>(),
        );
        match QualityGate::evaluate(&r, true) {
            GateDecision::Reject { reason } => assert!(reason.contains("no metric")),
            GateDecision::Accept => panic!("expected rejection"),
        }
        assert!(matches!(
            QualityGate::evaluate(&Rating::unscored(), true),
            GateDecision::Reject { .. }
        ));
    }

    #[test]
    fn test_no_available_metrics_content_accepted() {
        assert_eq!(QualityGate::evaluate(&Rating::unscored(), false), GateDecision::Accept);
    }

    #[test]
    fn test_content_sourced_never_gated() {
        let r = rating(&[(MetricKind::BusFactor, MetricScore::Available(0.0))]);
        assert_eq!(QualityGate::evaluate(&r, false), GateDecision::Accept);
    }
}
