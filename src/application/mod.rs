/// Application layer - Use cases, metrics and DTOs
///
/// This layer orchestrates the ingestion domain services and reaches
/// infrastructure only through ports.
pub mod dto;
pub mod metrics;
pub mod use_cases;
