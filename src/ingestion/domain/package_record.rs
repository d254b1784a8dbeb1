use super::rating::Rating;
use super::resolved_package::{DependencyMap, ResolvedPackage};
use crate::shared::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Durable metadata for an accepted package.
///
/// `Dependencies` and `Rating` are stored as JSON-encoded strings, matching
/// the registry's record schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Version")]
    version: String,
    #[serde(rename = "Dependencies")]
    dependencies: String,
    #[serde(rename = "ReadMe")]
    readme: String,
    #[serde(rename = "Rating")]
    rating: String,
}

impl PackageRecord {
    /// Builds the record for a resolved package and its rating
    ///
    /// # Errors
    /// Returns an error if the dependency map or rating cannot be encoded
    pub fn from_resolved(package: &ResolvedPackage, rating: &Rating) -> Result<Self> {
        Ok(Self {
            id: package.id().to_string(),
            name: package.name().to_string(),
            version: package.version().to_string(),
            dependencies: serde_json::to_string(&package.all_dependencies())
                .context("Failed to encode dependency map")?,
            readme: package.readme().to_string(),
            rating: serde_json::to_string(rating).context("Failed to encode rating")?,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn readme(&self) -> &str {
        &self.readme
    }

    pub fn dependencies(&self) -> Result<DependencyMap> {
        if self.dependencies.trim().is_empty() {
            return Ok(DependencyMap::new());
        }
        serde_json::from_str(&self.dependencies)
            .with_context(|| format!("Stored dependencies of {} are not valid JSON", self.id))
    }

    pub fn rating(&self) -> Result<Rating> {
        serde_json::from_str(&self.rating)
            .with_context(|| format!("Stored rating of {} is not valid JSON", self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::domain::{MetricScore, PackageName, Version};

    fn resolved() -> ResolvedPackage {
        ResolvedPackage::new(
            PackageName::new("braces".to_string()).unwrap(),
            Version::new("3.0.3".to_string()).unwrap(),
            vec![],
        )
        .with_dependencies(
            DependencyMap::from([("fill-range".to_string(), "^7.1.1".to_string())]),
            DependencyMap::new(),
        )
        .with_readme("# braces".to_string())
    }

    #[test]
    fn test_record_fields_and_schema() {
        let record = PackageRecord::from_resolved(&resolved(), &Rating::unscored()).unwrap();
        assert_eq!(record.id(), "braces3.0.3");
        assert_eq!(record.name(), "braces");
        assert_eq!(record.version(), "3.0.3");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["ID"], "braces3.0.3");
        assert_eq!(json["ReadMe"], "# braces");
        assert_eq!(json["Dependencies"], r#"{"fill-range":"^7.1.1"}"#);
        assert!(json["Rating"].as_str().unwrap().contains("\"NetScore\":-1"));
    }

    #[test]
    fn test_decode_nested_documents() {
        let record = PackageRecord::from_resolved(&resolved(), &Rating::unscored()).unwrap();
        let deps = record.dependencies().unwrap();
        assert_eq!(deps["fill-range"], "^7.1.1");
        assert_eq!(
            record.rating().unwrap().net_score().score(),
            MetricScore::Unavailable
        );
    }
}
