use super::{Metric, ScoringTarget};
use crate::ingestion::domain::MetricKind;
use crate::ingestion::policies::LicensePolicy;
use crate::ports::outbound::SourceHost;
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// License: 1.0 for an OSI-approved license detected by the host, else 0.0
pub struct LicenseMetric {
    host: Arc<dyn SourceHost>,
}

impl LicenseMetric {
    pub fn new(host: Arc<dyn SourceHost>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl Metric for LicenseMetric {
    fn kind(&self) -> MetricKind {
        MetricKind::License
    }

    async fn compute(&self, target: &ScoringTarget) -> Result<Option<f64>> {
        let spdx_id = self.host.license_spdx_id(target.repo()).await?;
        Ok(Some(LicensePolicy::score(spdx_id.as_deref())))
    }
}
