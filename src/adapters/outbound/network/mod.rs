/// Network adapters for external API calls
mod caching_registry_client;
mod github_client;
mod npm_registry_client;

pub use caching_registry_client::CachingRegistryClient;
pub use github_client::{GitHubClient, DEFAULT_GITHUB_API_URL, DEFAULT_GITHUB_WEB_URL};
pub use npm_registry_client::{NpmRegistryClient, DEFAULT_NPM_REGISTRY_URL};
