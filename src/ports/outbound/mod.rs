/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces the ingestion core uses to reach the
/// package registry, the source host, the two stores and the console.
pub mod blob_store;
pub mod metadata_store;
pub mod package_registry;
pub mod progress_reporter;
pub mod source_host;

pub use blob_store::{BlobStore, ZIP_CONTENT_TYPE};
pub use metadata_store::{CreateOutcome, MetadataStore};
pub use package_registry::{PackageRegistry, RegistryDist, RegistryManifest};
pub use progress_reporter::ProgressReporter;
pub use source_host::{
    ContributorCommits, IssueActivity, IssueCounts, PullRequestReview, SourceHost, TreeEntry,
};
