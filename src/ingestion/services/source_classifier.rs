use crate::ingestion::domain::RepoSlug;
use regex::Regex;
use std::sync::LazyLock;

static NPM_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?i:https?://(?:www\.)?npmjs\.com)/package/((?:@[^/?#]+(?:/|%2[fF]))?[^/?#@]+)(?:/v/([^/?#]+))?/?(?:[?#].*)?$",
    )
    .expect("unable to compile npm package url regex")
});

static GITHUB_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?i:https?://(?:www\.)?github\.com)/([^/?#]+)/([^/?#]+?)(?:\.git)?(?:/tree/([^?#]+?))?/?(?:[?#].*)?$",
    )
    .expect("unable to compile github repository url regex")
});

/// Classification of a package URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// `npmjs.com/package/<name>(/v/<version>)?`
    Npm {
        name: String,
        version: Option<String>,
    },
    /// `github.com/<owner>/<repo>(/tree/<branch>)?`
    GitHub {
        slug: RepoSlug,
        branch: Option<String>,
    },
}

/// SourceClassifier service for recognizing supported package URLs
pub struct SourceClassifier;

impl SourceClassifier {
    /// Classifies a URL, returning `None` when it is not a supported source
    pub fn classify(url: &str) -> Option<SourceKind> {
        let url = url.trim();

        if let Some(caps) = NPM_URL_RE.captures(url) {
            let raw_name = caps.get(1)?.as_str();
            let name = urlencoding::decode(raw_name)
                .map(|n| n.into_owned())
                .unwrap_or_else(|_| raw_name.to_string());
            let version = caps.get(2).map(|v| v.as_str().to_string());
            return Some(SourceKind::Npm { name, version });
        }

        if let Some(caps) = GITHUB_URL_RE.captures(url) {
            let slug = RepoSlug::new(caps.get(1)?.as_str(), caps.get(2)?.as_str()).ok()?;
            let branch = caps
                .get(3)
                .map(|b| b.as_str().trim_end_matches('/').to_string())
                .filter(|b| !b.is_empty());
            return Some(SourceKind::GitHub { slug, branch });
        }

        None
    }
}
