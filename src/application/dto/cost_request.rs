use crate::ingestion::domain::CostScope;

/// CostRequest - Request DTO for the dependency cost use case
#[derive(Debug, Clone)]
pub struct CostRequest {
    /// ID of an ingested package
    pub package_id: String,
    pub scope: CostScope,
}

impl CostRequest {
    pub fn new(package_id: impl Into<String>, scope: CostScope) -> Self {
        Self {
            package_id: package_id.into(),
            scope,
        }
    }

    /// Maps the API's `includeTransitiveDependencies` flag to a scope
    pub fn from_flag(package_id: impl Into<String>, include_transitive: bool) -> Self {
        let scope = if include_transitive {
            CostScope::Transitive
        } else {
            CostScope::FirstLevel
        };
        Self::new(package_id, scope)
    }
}
