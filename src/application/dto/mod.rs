/// Data Transfer Objects for application layer
///
/// DTOs carry requests and results between the CLI adapter and the use
/// cases, keeping the ingestion domain isolated from wire formats.
mod cost_request;
mod ingest_request;
mod ingest_response;

pub use cost_request::CostRequest;
pub use ingest_request::IngestRequest;
pub use ingest_response::{IngestResponse, PackageData, PackageMetadata};
