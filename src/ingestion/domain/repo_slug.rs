use crate::shared::Result;

const GITHUB_HOST: &str = "github.com";

/// A GitHub repository coordinate (`owner/repo`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    owner: String,
    repo: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Result<Self> {
        let owner = owner.into();
        let repo = repo.into();
        if !Self::valid_segment(&owner) || !Self::valid_segment(&repo) {
            anyhow::bail!("Invalid GitHub repository coordinate: {}/{}", owner, repo);
        }
        Ok(Self { owner, repo })
    }

    fn valid_segment(segment: &str) -> bool {
        !segment.is_empty()
            && segment != "."
            && segment != ".."
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Normalized web URL, `https://github.com/<owner>/<repo>`
    pub fn url(&self) -> String {
        format!("https://{}/{}/{}", GITHUB_HOST, self.owner, self.repo)
    }

    /// Parses the `repository` field of a package manifest.
    ///
    /// Accepted forms:
    /// - `https://github.com/o/r`, `git+https://github.com/o/r.git`
    /// - `git://github.com/o/r.git`, `git+ssh://git@github.com/o/r.git`
    /// - `git@github.com:o/r.git`
    /// - `github:o/r` and the bare `o/r` shorthand
    ///
    /// Returns `None` for non-GitHub hosts and anything unparseable.
    pub fn from_repository_field(raw: &str) -> Option<Self> {
        let mut rest = raw.trim();
        rest = rest.strip_prefix("git+").unwrap_or(rest);

        let path = if let Some(shorthand) = rest.strip_prefix("github:") {
            shorthand
        } else if let Some(scp) = rest.strip_prefix("git@github.com:") {
            scp
        } else if let Some((_, after_scheme)) = rest.split_once("://") {
            // Drop any user-info (`git@`) before the host
            let authority_and_path = after_scheme
                .split_once('@')
                .filter(|(user, _)| !user.contains('/'))
                .map(|(_, host)| host)
                .unwrap_or(after_scheme);
            let (host, path) = authority_and_path.split_once('/')?;
            let host = host.split(':').next().unwrap_or(host);
            if !host.eq_ignore_ascii_case(GITHUB_HOST)
                && !host.eq_ignore_ascii_case("www.github.com")
            {
                return None;
            }
            path
        } else if !rest.contains(':') && rest.matches('/').count() == 1 {
            rest
        } else {
            return None;
        };

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let owner = segments.next()?;
        let repo = segments.next()?;
        let repo = repo.split(['#', '?']).next().unwrap_or(repo);
        let repo = repo.strip_suffix(".git").unwrap_or(repo);

        Self::new(owner, repo).ok()
    }

    /// Parses a manifest `repository` value, which may be a string or an
    /// object carrying a `url` key
    pub fn from_manifest_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(raw) => Self::from_repository_field(raw),
            serde_json::Value::Object(map) => map
                .get("url")
                .and_then(|u| u.as_str())
                .and_then(Self::from_repository_field),
            _ => None,
        }
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
