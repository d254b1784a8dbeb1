use async_trait::async_trait;
use chrono::{Duration, Utc};
use registry_gate::ingestion::domain::RepoSlug;
use registry_gate::ports::outbound::{
    ContributorCommits, IssueActivity, IssueCounts, PullRequestReview, SourceHost, TreeEntry,
};
use registry_gate::prelude::Result;

/// Mock SourceHost describing a single repository
///
/// `healthy()` models an active, well-maintained MIT project; `neglected()`
/// a single-maintainer project with mostly open issues and no license.
#[derive(Clone)]
pub struct MockSourceHost {
    pub archive: Vec<u8>,
    pub contributors: Vec<ContributorCommits>,
    pub issue_counts: IssueCounts,
    pub issues_fail: bool,
    pub tree: Vec<TreeEntry>,
    pub license: Option<String>,
    pub pull_requests: Vec<PullRequestReview>,
    pub package_json: Option<String>,
}

impl MockSourceHost {
    pub fn healthy(archive: Vec<u8>) -> Self {
        Self {
            archive,
            contributors: ["ann", "bob", "cy", "dee", "eve"]
                .iter()
                .map(|login| ContributorCommits {
                    login: login.to_string(),
                    commits: 40,
                })
                .collect(),
            issue_counts: IssueCounts {
                open: 10,
                closed: 90,
            },
            issues_fail: false,
            tree: vec![
                TreeEntry {
                    path: "index.js".to_string(),
                    size: 2_000,
                },
                TreeEntry {
                    path: "README.md".to_string(),
                    size: 2_000,
                },
            ],
            license: Some("MIT".to_string()),
            pull_requests: vec![PullRequestReview {
                additions: 100,
                approved: true,
            }],
            package_json: None,
        }
    }

    pub fn neglected(archive: Vec<u8>) -> Self {
        Self {
            archive,
            contributors: vec![ContributorCommits {
                login: "solo".to_string(),
                commits: 500,
            }],
            issue_counts: IssueCounts {
                open: 95,
                closed: 5,
            },
            issues_fail: true,
            tree: vec![TreeEntry {
                path: "index.js".to_string(),
                size: 50_000,
            }],
            license: None,
            pull_requests: vec![PullRequestReview {
                additions: 100,
                approved: false,
            }],
            package_json: None,
        }
    }
}

#[async_trait]
impl SourceHost for MockSourceHost {
    async fn default_branch(&self, _repo: &RepoSlug) -> Result<String> {
        Ok("main".to_string())
    }

    async fn download_archive(&self, _repo: &RepoSlug, _branch: &str) -> Result<Vec<u8>> {
        Ok(self.archive.clone())
    }

    async fn contributor_commits(&self, _repo: &RepoSlug) -> Result<Option<Vec<ContributorCommits>>> {
        Ok(Some(self.contributors.clone()))
    }

    async fn recent_issues(&self, _repo: &RepoSlug, limit: usize) -> Result<Vec<IssueActivity>> {
        if self.issues_fail {
            anyhow::bail!("issues endpoint unavailable");
        }
        let now = Utc::now();
        Ok((0..limit.min(10))
            .map(|i| IssueActivity {
                created_at: now - Duration::days(i as i64 + 1),
                closed_at: Some(now - Duration::days(i as i64)),
                is_pull_request: false,
            })
            .collect())
    }

    async fn issue_counts(&self, _repo: &RepoSlug) -> Result<IssueCounts> {
        Ok(self.issue_counts)
    }

    async fn repository_tree(&self, _repo: &RepoSlug) -> Result<Vec<TreeEntry>> {
        Ok(self.tree.clone())
    }

    async fn license_spdx_id(&self, _repo: &RepoSlug) -> Result<Option<String>> {
        Ok(self.license.clone())
    }

    async fn merged_pull_requests(&self, _repo: &RepoSlug) -> Result<Vec<PullRequestReview>> {
        Ok(self.pull_requests.clone())
    }

    async fn file_content(&self, _repo: &RepoSlug, path: &str) -> Result<Option<String>> {
        Ok(match path {
            "package.json" => self.package_json.clone(),
            _ => None,
        })
    }
}
