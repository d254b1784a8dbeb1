/// Mock implementations for testing
mod mock_package_registry;
mod mock_progress_reporter;
mod mock_source_host;
mod mock_stores;

pub use mock_package_registry::MockPackageRegistry;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_source_host::MockSourceHost;
pub use mock_stores::{InMemoryBlobStore, InMemoryMetadataStore};
