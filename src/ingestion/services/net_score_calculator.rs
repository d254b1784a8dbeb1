use crate::ingestion::domain::{MetricKind, MetricResult, MetricScore};

/// NetScoreCalculator service for aggregating metric results
///
/// The score is the weighted mean of the available weighted metrics,
/// multiplied by the license gate when the license could be determined.
/// Unavailable metrics are dropped from both numerator and denominator.
pub struct NetScoreCalculator;

impl NetScoreCalculator {
    pub fn calculate(results: &[MetricResult]) -> MetricScore {
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        let mut license_gate = None;

        for result in results {
            let Some(value) = result.score().value() else {
                continue;
            };
            match result.kind().weight() {
                Some(weight) => {
                    weighted_sum += value * weight;
                    total_weight += weight;
                }
                None if result.kind() == MetricKind::License => license_gate = Some(value),
                None => {}
            }
        }

        if total_weight <= 0.0 {
            return MetricScore::Unavailable;
        }

        let mean = weighted_sum / total_weight;
        MetricScore::available(mean * license_gate.unwrap_or(1.0))
    }
}
