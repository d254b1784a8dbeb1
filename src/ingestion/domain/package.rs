use crate::shared::Result;

/// Maximum length for npm package names (registry limit)
const MAX_PACKAGE_NAME_LENGTH: usize = 214;

/// Maximum length for package versions (security limit)
const MAX_VERSION_LENGTH: usize = 100;

/// Version assumed when a manifest omits the `version` field
pub const DEFAULT_VERSION: &str = "1.0.0";

/// NewType wrapper for an npm package name with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(name: String) -> Result<Self> {
        if name.is_empty() {
            anyhow::bail!("Package name cannot be empty");
        }

        if name.len() > MAX_PACKAGE_NAME_LENGTH {
            anyhow::bail!(
                "Package name is too long ({} bytes). Maximum allowed: {} bytes",
                name.len(),
                MAX_PACKAGE_NAME_LENGTH
            );
        }

        // npm names: optional @scope/ prefix, then URL-safe characters
        let bare = match name.strip_prefix('@') {
            Some(scoped) => match scoped.split_once('/') {
                Some((scope, rest)) if !scope.is_empty() && !rest.is_empty() => {
                    if !Self::valid_segment(scope) {
                        anyhow::bail!("Package scope contains invalid characters: {}", name);
                    }
                    rest
                }
                _ => anyhow::bail!("Scoped package name must look like @scope/name: {}", name),
            },
            None => name.as_str(),
        };

        if !Self::valid_segment(bare) {
            anyhow::bail!(
                "Package name contains invalid characters. Only alphanumeric, hyphens, underscores, dots, and tildes are allowed: {}",
                name
            );
        }

        Ok(Self(name))
    }

    fn valid_segment(segment: &str) -> bool {
        segment
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// NewType wrapper for a concrete package version with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    pub fn new(version: String) -> Result<Self> {
        if version.is_empty() {
            anyhow::bail!("Package version cannot be empty");
        }

        if version.len() > MAX_VERSION_LENGTH {
            anyhow::bail!(
                "Package version is too long ({} bytes). Maximum allowed: {} bytes",
                version.len(),
                MAX_VERSION_LENGTH
            );
        }

        if !version
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '+'))
        {
            anyhow::bail!(
                "Package version contains invalid characters. Only alphanumeric, dots, hyphens, and plus are allowed."
            );
        }

        Ok(Self(version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique package identifier: the package name immediately followed by its version
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(String);

impl PackageId {
    pub fn new(name: &PackageName, version: &Version) -> Self {
        Self(format!("{}{}", name.as_str(), version.as_str()))
    }

    /// Wraps an identifier supplied by a caller (e.g. a cost or rating lookup)
    pub fn from_raw(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            anyhow::bail!("Package ID cannot be empty");
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PackageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_name_new_valid() {
        let name = PackageName::new("braces".to_string()).unwrap();
        assert_eq!(name.as_str(), "braces");
    }

    #[test]
    fn test_package_name_scoped() {
        let name = PackageName::new("@types/node".to_string()).unwrap();
        assert_eq!(name.as_str(), "@types/node");
        assert!(PackageName::new("@types".to_string()).is_err());
        assert!(PackageName::new("@/node".to_string()).is_err());
    }

    #[test]
    fn test_package_name_rejects_separators() {
        assert!(PackageName::new("".to_string()).is_err());
        assert!(PackageName::new("a/b".to_string()).is_err());
        assert!(PackageName::new("evil name".to_string()).is_err());
        assert!(PackageName::new("x".repeat(215)).is_err());
    }

    #[test]
    fn test_version_validation() {
        assert_eq!(Version::new("3.0.3".to_string()).unwrap().as_str(), "3.0.3");
        assert!(Version::new("1.0.0-beta.1+build".to_string()).is_ok());
        assert!(Version::new("".to_string()).is_err());
        assert!(Version::new("1.0.0; rm -rf".to_string()).is_err());
    }

    #[test]
    fn test_package_id_concatenates_name_and_version() {
        let name = PackageName::new("braces".to_string()).unwrap();
        let version = Version::new("3.0.3".to_string()).unwrap();
        assert_eq!(PackageId::new(&name, &version).as_str(), "braces3.0.3");
    }

    #[test]
    fn test_package_id_from_raw() {
        assert_eq!(PackageId::from_raw("lodash4.17.21").unwrap().to_string(), "lodash4.17.21");
        assert!(PackageId::from_raw("  ").is_err());
    }
}
