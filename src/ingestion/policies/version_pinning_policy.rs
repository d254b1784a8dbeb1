use crate::ingestion::domain::DependencyMap;

/// VersionPinningPolicy decides which dependency constraints count as pinned
///
/// A constraint is pinned when it resolves to a specific major+minor release:
/// - no caret (`^`) or tilde (`~`)
/// - not a range (`>`, `<`, `||`, or a hyphen range `a - b`)
/// - at least a numeric major and minor component (`1.2`, `1.2.3`, `=1.2.3`, `v1.2.x`)
///
/// Tags (`latest`), wildcards (`*`, `1.x`), URLs and git references are not pinned.
pub struct VersionPinningPolicy;

impl VersionPinningPolicy {
    pub fn is_pinned(constraint: &str) -> bool {
        let constraint = constraint.trim();

        if constraint.contains('^') || constraint.contains('~') {
            return false;
        }
        if constraint.contains('>')
            || constraint.contains('<')
            || constraint.contains("||")
            || constraint.contains(" - ")
        {
            return false;
        }

        let version = constraint.strip_prefix('=').unwrap_or(constraint).trim();
        let version = version.strip_prefix('v').unwrap_or(version);

        let mut parts = version.split('.');
        let major = parts.next().unwrap_or_default();
        let minor = parts.next().unwrap_or_default();

        Self::is_numeric(major) && Self::is_numeric(minor)
    }

    fn is_numeric(part: &str) -> bool {
        !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
    }

    /// Fraction of pinned constraints; an empty map scores 1.0
    pub fn score(dependencies: &DependencyMap) -> f64 {
        if dependencies.is_empty() {
            return 1.0;
        }
        let pinned = dependencies
            .values()
            .filter(|constraint| Self::is_pinned(constraint))
            .count();
        pinned as f64 / dependencies.len() as f64
    }
}
