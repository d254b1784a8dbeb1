use crate::ingestion::domain::PackageRecord;
use crate::shared::Result;
use async_trait::async_trait;

/// Outcome of a conditional create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// A record with the same ID already existed; nothing was written
    Conflict,
}

/// MetadataStore port for durable package records
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Looks up a record by package ID
    async fn get(&self, id: &str) -> Result<Option<PackageRecord>>;

    /// Creates a record only if no record with its ID exists
    ///
    /// The check and the write must be atomic with respect to other
    /// callers, so that two concurrent creates of one ID cannot both
    /// return `Created`.
    ///
    /// # Errors
    /// Returns an error only for storage failures; an existing record is
    /// reported as `CreateOutcome::Conflict`.
    async fn create(&self, record: &PackageRecord) -> Result<CreateOutcome>;
}
