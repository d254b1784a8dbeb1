use crate::ingestion::domain::Rating;
use crate::ports::outbound::MetadataStore;
use crate::shared::error::GateError;

/// RatePackageUseCase - returns the rating stored with an ingested package
pub struct RatePackageUseCase<MS> {
    metadata_store: MS,
}

impl<MS: MetadataStore> RatePackageUseCase<MS> {
    pub fn new(metadata_store: MS) -> Self {
        Self { metadata_store }
    }

    pub async fn execute(&self, package_id: &str) -> Result<Rating, GateError> {
        let record = self
            .metadata_store
            .get(package_id)
            .await
            .map_err(|e| GateError::ResolutionFailed {
                source_ref: package_id.to_string(),
                details: format!("{:#}", e),
            })?
            .ok_or_else(|| GateError::PackageNotFound {
                id: package_id.to_string(),
            })?;

        record.rating().map_err(|e| GateError::ResolutionFailed {
            source_ref: package_id.to_string(),
            details: format!("{:#}", e),
        })
    }
}
