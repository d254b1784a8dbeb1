use crate::ingestion::domain::RepoSlug;
use crate::ports::outbound::{
    ContributorCommits, IssueActivity, IssueCounts, PullRequestReview, SourceHost, TreeEntry,
};
use crate::shared::security::validate_url_component;
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GITHUB_WEB_URL: &str = "https://github.com";

/// Page size used for list endpoints (GitHub maximum)
const PAGE_SIZE: usize = 100;

/// Upper bound on GraphQL pages fetched for merged pull requests
const MAX_PULL_REQUEST_PAGES: usize = 5;

/// Remaining-request level below which a warning is logged
const RATE_LIMIT_WARNING_LEVEL: u64 = 10;

const MERGED_PULL_REQUESTS_QUERY: &str = r#"
query($owner: String!, $name: String!, $cursor: String) {
  repository(owner: $owner, name: $name) {
    pullRequests(states: MERGED, first: 100, after: $cursor, orderBy: {field: UPDATED_AT, direction: DESC}) {
      pageInfo { hasNextPage endCursor }
      nodes {
        additions
        reviews(states: APPROVED, first: 1) { totalCount }
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct RepositoryInfo {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct ContributorStats {
    total: u64,
    #[serde(default)]
    author: Option<Author>,
}

#[derive(Debug, Deserialize)]
struct Author {
    login: String,
}

#[derive(Debug, Deserialize)]
struct Issue {
    created_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct GitTree {
    tree: Vec<GitTreeItem>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct GitTreeItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct LicenseResponse {
    license: Option<LicenseInfo>,
}

#[derive(Debug, Deserialize)]
struct LicenseInfo {
    spdx_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileContent {
    content: String,
    #[serde(default)]
    encoding: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<GraphQlData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlData {
    repository: Option<GraphQlRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRepository {
    pull_requests: PullRequestConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestConnection {
    page_info: PageInfo,
    nodes: Vec<PullRequestNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PullRequestNode {
    additions: u64,
    reviews: ReviewCount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewCount {
    total_count: u64,
}

/// Classified response of a GET against the REST API
enum ApiResponse<T> {
    Ok(T),
    /// 202: GitHub is still computing the answer
    Pending,
    NotFound,
}

/// GitHubClient adapter for the GitHub REST and GraphQL APIs
///
/// Implements the SourceHost port. Requests are retried with a linear
/// back-off on transport errors and 5xx responses. The
/// `x-ratelimit-remaining` header is logged but not enforced.
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
    web_url: String,
    authenticated: bool,
    max_retries: u32,
}

impl GitHubClient {
    /// Creates a new GitHub client
    ///
    /// # Arguments
    /// * `api_url` - REST/GraphQL root, e.g. `https://api.github.com`
    /// * `web_url` - Web root used for archive downloads, e.g. `https://github.com`
    /// * `token` - Optional personal access token
    /// * `timeout` - Per-request timeout
    pub fn new(
        api_url: impl Into<String>,
        web_url: impl Into<String>,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        if let Some(token) = token {
            let mut auth = HeaderValue::from_str(&format!("token {}", token))
                .context("GitHub token contains invalid header characters")?;
            auth.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("registry-gate/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            web_url: web_url.into().trim_end_matches('/').to_string(),
            authenticated: token.is_some(),
            max_retries: 3,
        })
    }

    fn repo_path(repo: &RepoSlug) -> Result<String> {
        validate_url_component(repo.owner(), "Repository owner", false)?;
        validate_url_component(repo.repo(), "Repository name", false)?;
        Ok(format!(
            "{}/{}",
            urlencoding::encode(repo.owner()),
            urlencoding::encode(repo.repo())
        ))
    }

    fn log_rate_limit(headers: &HeaderMap) {
        let remaining = headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        match remaining {
            Some(r) if r < RATE_LIMIT_WARNING_LEVEL => {
                tracing::warn!(remaining = r, "GitHub rate limit nearly exhausted")
            }
            Some(r) => tracing::trace!(remaining = r, "GitHub rate limit"),
            None => {}
        }
    }

    /// Sends a request built by `build`, retrying transient failures
    async fn send_with_retry<F>(&self, build: F) -> Result<reqwest::Response>
    where
        F: Fn() -> reqwest::RequestBuilder + Send + Sync,
    {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match build().send().await {
                Ok(response) if response.status().is_server_error() => {
                    last_error = Some(anyhow::anyhow!(
                        "GitHub API returned status code {}",
                        response.status()
                    ));
                }
                Ok(response) => {
                    Self::log_rate_limit(response.headers());
                    return Ok(response);
                }
                Err(e) => last_error = Some(e.into()),
            }
            if attempt < self.max_retries {
                tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("GitHub request failed")))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse<T>> {
        let url = with_query(url, query);
        let response = self.send_with_retry(|| self.client.get(&url)).await?;

        match response.status() {
            StatusCode::ACCEPTED | StatusCode::NO_CONTENT => Ok(ApiResponse::Pending),
            StatusCode::NOT_FOUND => Ok(ApiResponse::NotFound),
            status if status.is_success() => Ok(ApiResponse::Ok(
                response
                    .json()
                    .await
                    .with_context(|| format!("Unexpected response body from {}", url))?,
            )),
            status => anyhow::bail!("GitHub API returned status code {} for {}", status, url),
        }
    }

    /// Like `get_json` but treats anything other than 200 as an error
    async fn get_required<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        match self.get_json(url, query).await? {
            ApiResponse::Ok(value) => Ok(value),
            ApiResponse::Pending => anyhow::bail!("GitHub has not finished computing {}", url),
            ApiResponse::NotFound => anyhow::bail!("GitHub resource not found: {}", url),
        }
    }

    async fn search_count(&self, repo: &RepoSlug, state: &str) -> Result<u64> {
        let url = format!("{}/search/issues", self.api_url);
        let query = [
            ("q", format!("repo:{} type:issue state:{}", repo, state)),
            ("per_page", "1".to_string()),
        ];
        let result: SearchResult = self.get_required(&url, &query).await?;
        Ok(result.total_count)
    }
}

/// Appends percent-encoded query parameters to `url`
fn with_query(url: &str, query: &[(&str, String)]) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let pairs: Vec<String> = query
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect();
    format!("{}?{}", url, pairs.join("&"))
}

#[async_trait]
impl SourceHost for GitHubClient {
    async fn default_branch(&self, repo: &RepoSlug) -> Result<String> {
        let url = format!("{}/repos/{}", self.api_url, Self::repo_path(repo)?);
        let info: RepositoryInfo = self.get_required(&url, &[]).await?;
        Ok(info.default_branch)
    }

    async fn download_archive(&self, repo: &RepoSlug, branch: &str) -> Result<Vec<u8>> {
        let mut encoded_branch = Vec::new();
        for segment in branch.split('/') {
            validate_url_component(segment, "Branch", false)?;
            encoded_branch.push(urlencoding::encode(segment).into_owned());
        }
        let url = format!(
            "{}/{}/archive/refs/heads/{}.zip",
            self.web_url,
            Self::repo_path(repo)?,
            encoded_branch.join("/")
        );

        let response = self.send_with_retry(|| self.client.get(&url)).await?;
        if !response.status().is_success() {
            anyhow::bail!(
                "Archive download of {}@{} returned status code {}",
                repo,
                branch,
                response.status()
            );
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn contributor_commits(&self, repo: &RepoSlug) -> Result<Option<Vec<ContributorCommits>>> {
        let url = format!("{}/repos/{}/stats/contributors", self.api_url, Self::repo_path(repo)?);
        match self.get_json::<Vec<ContributorStats>>(&url, &[]).await? {
            ApiResponse::Ok(stats) => Ok(Some(
                stats
                    .into_iter()
                    .map(|s| ContributorCommits {
                        login: s.author.map(|a| a.login).unwrap_or_default(),
                        commits: s.total,
                    })
                    .collect(),
            )),
            ApiResponse::Pending => Ok(None),
            ApiResponse::NotFound => anyhow::bail!("repository {} not found", repo),
        }
    }

    async fn recent_issues(&self, repo: &RepoSlug, limit: usize) -> Result<Vec<IssueActivity>> {
        let url = format!("{}/repos/{}/issues", self.api_url, Self::repo_path(repo)?);
        let query = [
            ("state", "all".to_string()),
            ("sort", "created".to_string()),
            ("direction", "desc".to_string()),
            ("per_page", limit.clamp(1, PAGE_SIZE).to_string()),
        ];
        let issues: Vec<Issue> = self.get_required(&url, &query).await?;
        Ok(issues
            .into_iter()
            .take(limit)
            .map(|issue| IssueActivity {
                created_at: issue.created_at,
                closed_at: issue.closed_at,
                is_pull_request: issue.pull_request.is_some(),
            })
            .collect())
    }

    async fn issue_counts(&self, repo: &RepoSlug) -> Result<IssueCounts> {
        Self::repo_path(repo)?;
        let open = self.search_count(repo, "open").await?;
        let closed = self.search_count(repo, "closed").await?;
        Ok(IssueCounts { open, closed })
    }

    async fn repository_tree(&self, repo: &RepoSlug) -> Result<Vec<TreeEntry>> {
        let url = format!("{}/repos/{}/git/trees/HEAD", self.api_url, Self::repo_path(repo)?);
        let tree: GitTree = self
            .get_required(&url, &[("recursive", "1".to_string())])
            .await?;
        if tree.truncated {
            tracing::debug!(repo = %repo, "git tree listing truncated by GitHub");
        }
        Ok(tree
            .tree
            .into_iter()
            .filter(|item| item.kind == "blob")
            .map(|item| TreeEntry {
                path: item.path,
                size: item.size.unwrap_or(0),
            })
            .collect())
    }

    async fn license_spdx_id(&self, repo: &RepoSlug) -> Result<Option<String>> {
        let url = format!("{}/repos/{}/license", self.api_url, Self::repo_path(repo)?);
        match self.get_json::<LicenseResponse>(&url, &[]).await? {
            ApiResponse::Ok(response) => Ok(response.license.and_then(|l| l.spdx_id)),
            ApiResponse::NotFound => Ok(None),
            ApiResponse::Pending => anyhow::bail!("license detection pending for {}", repo),
        }
    }

    async fn merged_pull_requests(&self, repo: &RepoSlug) -> Result<Vec<PullRequestReview>> {
        if !self.authenticated {
            anyhow::bail!("the GitHub GraphQL API requires a token");
        }

        let url = format!("{}/graphql", self.api_url);
        let mut reviews = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_PULL_REQUEST_PAGES {
            let body = serde_json::json!({
                "query": MERGED_PULL_REQUESTS_QUERY,
                "variables": {
                    "owner": repo.owner(),
                    "name": repo.repo(),
                    "cursor": cursor,
                },
            });
            let response = self
                .send_with_retry(|| self.client.post(&url).json(&body))
                .await?;
            if !response.status().is_success() {
                anyhow::bail!("GitHub GraphQL API returned status code {}", response.status());
            }

            let parsed: GraphQlResponse = response.json().await?;
            if let Some(error) = parsed.errors.first() {
                anyhow::bail!("GitHub GraphQL error: {}", error.message);
            }
            let connection = parsed
                .data
                .and_then(|d| d.repository)
                .map(|r| r.pull_requests)
                .ok_or_else(|| anyhow::anyhow!("repository {} not found", repo))?;

            reviews.extend(connection.nodes.into_iter().map(|node| PullRequestReview {
                additions: node.additions,
                approved: node.reviews.total_count > 0,
            }));

            match connection.page_info.end_cursor {
                Some(next) if connection.page_info.has_next_page => cursor = Some(next),
                _ => break,
            }
        }

        Ok(reviews)
    }

    async fn file_content(&self, repo: &RepoSlug, path: &str) -> Result<Option<String>> {
        let mut encoded_path = Vec::new();
        for segment in path.split('/') {
            validate_url_component(segment, "File path", false)?;
            encoded_path.push(urlencoding::encode(segment).into_owned());
        }
        let url = format!(
            "{}/repos/{}/contents/{}",
            self.api_url,
            Self::repo_path(repo)?,
            encoded_path.join("/")
        );

        let file = match self.get_json::<FileContent>(&url, &[]).await? {
            ApiResponse::Ok(file) => file,
            ApiResponse::NotFound => return Ok(None),
            ApiResponse::Pending => anyhow::bail!("contents of {} not available yet", path),
        };
        if file.encoding != "base64" {
            return Ok(Some(file.content));
        }

        let compact: String = file.content.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(compact)
            .with_context(|| format!("{} content is not valid base64", path))?;
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }
}
