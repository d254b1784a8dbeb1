use crate::ingestion::domain::{
    DependencyMap, PackageName, RepoSlug, ResolvedPackage, Version, DEFAULT_VERSION,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use thiserror::Error;

const MANIFEST_FILE: &str = "package.json";
const README_FILE: &str = "README.md";

/// Largest manifest or README we are willing to read into memory (8 MB)
const MAX_TEXT_ENTRY_SIZE: u64 = 8 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("archive does not contain a package.json")]
    MissingManifest,

    #[error("archive does not contain a README.md")]
    MissingReadme,

    #[error("archive is not a readable zip file: {0}")]
    InvalidArchive(String),

    #[error("package.json is invalid: {0}")]
    InvalidManifest(String),
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    main: Option<String>,
    #[serde(default)]
    repository: Option<serde_json::Value>,
    #[serde(default)]
    dependencies: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: Option<BTreeMap<String, serde_json::Value>>,
}

/// ManifestExtractor service for reading package metadata out of a zip archive
///
/// The shallowest `package.json` and `README.md` in the archive are used, so
/// archives wrapped in a top-level directory (GitHub archives, npm's
/// `package/`) resolve the same as flat ones.
#[derive(Debug, Clone, Copy)]
pub struct ManifestExtractor {
    strict_readme: bool,
}

impl ManifestExtractor {
    /// # Arguments
    /// * `strict_readme` - When true a missing README.md is an error;
    ///   otherwise the readme is left empty
    pub fn new(strict_readme: bool) -> Self {
        Self { strict_readme }
    }

    /// Extracts a [`ResolvedPackage`] from canonical zip bytes
    ///
    /// The archive bytes are moved into the returned package unchanged.
    ///
    /// # Errors
    /// - `MissingManifest` when no `package.json` exists
    /// - `MissingReadme` in strict mode when no `README.md` exists
    /// - `InvalidManifest` when the manifest is not JSON or has no `name`
    /// - `InvalidArchive` when the bytes are not a zip file
    pub fn extract(&self, archive: Vec<u8>) -> Result<ResolvedPackage, ExtractionError> {
        let (manifest_text, readme) = {
            let mut zip = zip::ZipArchive::new(Cursor::new(archive.as_slice()))
                .map_err(|e| ExtractionError::InvalidArchive(e.to_string()))?;

            let manifest_index = Self::find_shallowest(&mut zip, MANIFEST_FILE)?
                .ok_or(ExtractionError::MissingManifest)?;
            let manifest_text = Self::read_text(&mut zip, manifest_index)?;

            let readme = match Self::find_shallowest(&mut zip, README_FILE)? {
                Some(index) => Self::read_text(&mut zip, index)?,
                None if self.strict_readme => return Err(ExtractionError::MissingReadme),
                None => String::new(),
            };
            (manifest_text, readme)
        };

        let manifest: RawManifest = serde_json::from_str(&manifest_text)
            .map_err(|e| ExtractionError::InvalidManifest(e.to_string()))?;

        let name = manifest
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ExtractionError::InvalidManifest("missing \"name\"".to_string()))?;
        let name = PackageName::new(name.trim().to_string())
            .map_err(|e| ExtractionError::InvalidManifest(e.to_string()))?;

        let version = manifest
            .version
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());
        let version =
            Version::new(version).map_err(|e| ExtractionError::InvalidManifest(e.to_string()))?;

        let repository = manifest
            .repository
            .as_ref()
            .and_then(RepoSlug::from_manifest_value);

        Ok(ResolvedPackage::new(name, version, archive)
            .with_repository(repository)
            .with_dependencies(
                Self::string_constraints(manifest.dependencies),
                Self::string_constraints(manifest.dev_dependencies),
            )
            .with_entry_point(manifest.main.filter(|m| !m.trim().is_empty()))
            .with_readme(readme))
    }

    /// Returns the index of the shallowest file whose name is exactly `file_name`
    fn find_shallowest<R: Read + std::io::Seek>(
        zip: &mut zip::ZipArchive<R>,
        file_name: &str,
    ) -> Result<Option<usize>, ExtractionError> {
        let mut best: Option<(usize, usize)> = None;
        for index in 0..zip.len() {
            let entry = zip
                .by_index_raw(index)
                .map_err(|e| ExtractionError::InvalidArchive(e.to_string()))?;
            if entry.is_dir() {
                continue;
            }
            let path = entry.name().trim_start_matches("./");
            let matches = path == file_name || path.ends_with(&format!("/{}", file_name));
            if !matches {
                continue;
            }
            let depth = path.matches('/').count();
            match best {
                Some((_, best_depth)) if best_depth <= depth => {}
                _ => best = Some((index, depth)),
            }
        }
        Ok(best.map(|(index, _)| index))
    }

    fn read_text<R: Read + std::io::Seek>(
        zip: &mut zip::ZipArchive<R>,
        index: usize,
    ) -> Result<String, ExtractionError> {
        let entry = zip
            .by_index(index)
            .map_err(|e| ExtractionError::InvalidArchive(e.to_string()))?;
        let name = entry.name().to_string();
        let mut bytes = Vec::new();
        entry
            .take(MAX_TEXT_ENTRY_SIZE)
            .read_to_end(&mut bytes)
            .map_err(|e| ExtractionError::InvalidArchive(format!("{}: {}", name, e)))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Keeps string-valued constraints; malformed entries are dropped
    fn string_constraints(raw: Option<BTreeMap<String, serde_json::Value>>) -> DependencyMap {
        raw.unwrap_or_default()
            .into_iter()
            .filter_map(|(name, value)| value.as_str().map(|v| (name, v.to_string())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_full_manifest() {
        let archive = build_zip(&[
            (
                "package.json",
                r#"{
                    "name": "braces",
                    "version": "3.0.3",
                    "main": "index.js",
                    "repository": "micromatch/braces",
                    "dependencies": {"fill-range": "^7.1.1"},
                    "devDependencies": {"mocha": "^10.4.0"}
                }"#,
            ),
            ("README.md", "# braces"),
            ("index.js", "module.exports = {};"),
        ]);

        let pkg = ManifestExtractor::new(true).extract(archive.clone()).unwrap();
        assert_eq!(pkg.id().as_str(), "braces3.0.3");
        assert_eq!(pkg.entry_point(), Some("index.js"));
        assert_eq!(pkg.readme(), "# braces");
        assert_eq!(
            pkg.repository().map(|r| r.url()),
            Some("https://github.com/micromatch/braces".to_string())
        );
        assert_eq!(pkg.runtime_dependencies().len(), 1);
        assert_eq!(pkg.all_dependencies().len(), 2);
        assert_eq!(pkg.archive(), archive.as_slice());
    }

    #[test]
    fn test_version_defaults_and_shallowest_manifest_wins() {
        let archive = build_zip(&[
            ("repo-main/node_modules/dep/package.json", r#"{"name":"dep","version":"9.9.9"}"#),
            ("repo-main/package.json", r#"{"name":"root"}"#),
        ]);

        let pkg = ManifestExtractor::new(false).extract(archive).unwrap();
        assert_eq!(pkg.name().as_str(), "root");
        assert_eq!(pkg.version().as_str(), "1.0.0");
        assert_eq!(pkg.readme(), "");
        assert!(pkg.repository().is_none());
    }

    #[test]
    fn test_missing_manifest() {
        let archive = build_zip(&[("README.md", "# nothing")]);
        let err = ManifestExtractor::new(false).extract(archive).unwrap_err();
        assert!(matches!(err, ExtractionError::MissingManifest));
    }

    #[test]
    fn test_similar_file_names_are_not_manifests() {
        let archive = build_zip(&[("my-package.json", r#"{"name":"x"}"#)]);
        let err = ManifestExtractor::new(false).extract(archive).unwrap_err();
        assert!(matches!(err, ExtractionError::MissingManifest));
    }

    #[test]
    fn test_strict_readme() {
        let archive = build_zip(&[("package.json", r#"{"name":"x","version":"1.0.0"}"#)]);
        let err = ManifestExtractor::new(true).extract(archive).unwrap_err();
        assert!(matches!(err, ExtractionError::MissingReadme));
    }

    #[test]
    fn test_manifest_without_name_is_invalid() {
        let archive = build_zip(&[("package.json", r#"{"version":"1.0.0"}"#)]);
        let err = ManifestExtractor::new(false).extract(archive).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidManifest(_)));
    }

    #[test]
    fn test_not_a_zip() {
        let err = ManifestExtractor::new(false)
            .extract(b"definitely not a zip".to_vec())
            .unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidArchive(_)));
    }

    #[test]
    fn test_object_repository_and_non_string_dependencies() {
        let archive = build_zip(&[(
            "package.json",
            r#"{
                "name": "x",
                "repository": {"type": "git", "url": "git+ssh://git@github.com/o/r.git"},
                "dependencies": {"a": "1.0.0", "b": 42}
            }"#,
        )]);
        let pkg = ManifestExtractor::new(false).extract(archive).unwrap();
        assert_eq!(pkg.repository().unwrap().to_string(), "o/r");
        assert_eq!(pkg.runtime_dependencies().len(), 1);
    }
}
