/// Shared test doubles and fixtures for the integration tests
#[allow(dead_code)]
pub mod fixtures;
#[allow(dead_code)]
pub mod mocks;
