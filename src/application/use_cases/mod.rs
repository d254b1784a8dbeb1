/// Use cases module containing application business logic orchestration
mod ingest_package;
mod rate_package;
mod resolve_dependency_cost;
mod resolve_source;
mod score_urls;

pub use ingest_package::{IngestPackageUseCase, IngestionState};
pub use rate_package::RatePackageUseCase;
pub use resolve_dependency_cost::{ResolveDependencyCostUseCase, DEFAULT_MAX_DEPTH};
pub use resolve_source::SourceResolver;
pub use score_urls::{ScoreUrlsUseCase, UrlScore};
