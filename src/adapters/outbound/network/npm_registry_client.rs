use crate::ports::outbound::{PackageRegistry, RegistryManifest};
use crate::shared::security::validate_url_component;
use crate::shared::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

/// Public npm registry
pub const DEFAULT_NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// NpmRegistryClient adapter for the npm registry HTTP API
///
/// Implements the PackageRegistry port. Manifest lookups use
/// `GET {registry}/<name>/<version-or-tag>`; transient failures are retried
/// with a linear back-off, a 404 is reported immediately.
pub struct NpmRegistryClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl NpmRegistryClient {
    /// Creates a new registry client
    ///
    /// # Arguments
    /// * `base_url` - Registry root, e.g. `https://registry.npmjs.org`
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let user_agent = format!("registry-gate/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_retries: 3,
        })
    }

    /// Builds the manifest URL; scoped names keep their `@` and encode the `/`
    fn manifest_url(&self, name: &str, version: &str) -> Result<String> {
        validate_url_component(name, "Package name", true)?;
        validate_url_component(version, "Version", false)?;

        let encoded_name = match name.strip_prefix('@') {
            Some(scoped) => format!("@{}", urlencoding::encode(scoped)),
            None => urlencoding::encode(name).into_owned(),
        };
        Ok(format!(
            "{}/{}/{}",
            self.base_url,
            encoded_name,
            urlencoding::encode(version)
        ))
    }

    /// Fetches the manifest with retry logic (async)
    async fn fetch_with_retry(&self, url: &str) -> Result<RegistryManifest> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match self.fetch_once(url).await {
                Ok(Some(manifest)) => return Ok(manifest),
                Ok(None) => anyhow::bail!("npm registry has no entry at {}", url),
                Err(e) => {
                    tracing::debug!(url, attempt, error = %e, "npm registry request failed");
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("npm registry request to {} failed", url)))
    }

    /// `Ok(None)` means the registry answered 404
    async fn fetch_once(&self, url: &str) -> Result<Option<RegistryManifest>> {
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            anyhow::bail!("npm registry returned status code {}", response.status());
        }

        Ok(Some(response.json().await?))
    }
}

#[async_trait]
impl PackageRegistry for NpmRegistryClient {
    async fn fetch_manifest(&self, name: &str, version: &str) -> Result<RegistryManifest> {
        let url = self.manifest_url(name, version)?;
        self.fetch_with_retry(&url).await
    }

    async fn download_tarball(&self, url: &str) -> Result<Vec<u8>> {
        if !url.starts_with("https://") && !url.starts_with("http://") {
            anyhow::bail!("Security: tarball URL must be http(s): {}", url);
        }

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("tarball download returned status code {}", response.status());
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> NpmRegistryClient {
        NpmRegistryClient::new("https://registry.example.org/", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_manifest_url_plain() {
        assert_eq!(
            client().manifest_url("braces", "latest").unwrap(),
            "https://registry.example.org/braces/latest"
        );
    }

    #[test]
    fn test_manifest_url_scoped() {
        assert_eq!(
            client().manifest_url("@types/node", "20.1.0").unwrap(),
            "https://registry.example.org/@types%2Fnode/20.1.0"
        );
    }

    #[test]
    fn test_manifest_url_rejects_injection() {
        assert!(client().manifest_url("../admin", "latest").is_err());
        assert!(client().manifest_url("braces", "1.0.0?x").is_err());
    }

    #[tokio::test]
    async fn test_download_rejects_non_http_urls() {
        let err = client().download_tarball("file:///etc/passwd").await.unwrap_err();
        assert!(err.to_string().contains("Security"));
    }
}
