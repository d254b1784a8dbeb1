pub mod cost_report;
pub mod metric;
pub mod package;
pub mod package_record;
pub mod package_reference;
pub mod rating;
pub mod repo_slug;
pub mod resolved_package;

pub use cost_report::{CostEntry, CostReport, CostScope};
pub use metric::{MetricKind, MetricResult, MetricScore};
pub use package::{PackageId, PackageName, Version, DEFAULT_VERSION};
pub use package_record::PackageRecord;
pub use package_reference::{PackageReference, PackageSource};
pub use rating::{NetScore, Rating};
pub use repo_slug::RepoSlug;
pub use resolved_package::{DependencyMap, ResolvedPackage};
