use crate::ingestion::domain::RepoSlug;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Commit count of one contributor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributorCommits {
    pub login: String,
    pub commits: u64,
}

/// An issue or pull request as listed by the issues endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueActivity {
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub is_pull_request: bool,
}

/// Issue totals from the search API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueCounts {
    pub open: u64,
    pub closed: u64,
}

/// One blob in the recursive git tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: String,
    pub size: u64,
}

/// Additions of a merged pull request and whether it was approved in review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestReview {
    pub additions: u64,
    pub approved: bool,
}

/// SourceHost port for the repository hosting service (GitHub)
///
/// Methods that back a metric return `Ok(None)` when the host has no answer
/// yet (e.g. statistics still being computed) and `Err` when the request
/// failed; both make the metric unavailable.
#[async_trait]
pub trait SourceHost: Send + Sync {
    async fn default_branch(&self, repo: &RepoSlug) -> Result<String>;

    /// Downloads the zip archive of a branch
    async fn download_archive(&self, repo: &RepoSlug, branch: &str) -> Result<Vec<u8>>;

    async fn contributor_commits(&self, repo: &RepoSlug) -> Result<Option<Vec<ContributorCommits>>>;

    /// The most recent issues and pull requests, newest first
    async fn recent_issues(&self, repo: &RepoSlug, limit: usize) -> Result<Vec<IssueActivity>>;

    async fn issue_counts(&self, repo: &RepoSlug) -> Result<IssueCounts>;

    /// Blobs of the default branch's recursive tree
    async fn repository_tree(&self, repo: &RepoSlug) -> Result<Vec<TreeEntry>>;

    /// SPDX identifier of the detected repository license, if any
    async fn license_spdx_id(&self, repo: &RepoSlug) -> Result<Option<String>>;

    async fn merged_pull_requests(&self, repo: &RepoSlug) -> Result<Vec<PullRequestReview>>;

    /// Text of a file on the default branch, `None` when it does not exist
    async fn file_content(&self, repo: &RepoSlug, path: &str) -> Result<Option<String>>;
}
