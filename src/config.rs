//! Configuration file support for registry-gate.
//!
//! Provides YAML-based configuration through `registry-gate.config.yml`
//! files, and resolves it together with CLI flags and the environment into
//! the [`Settings`] every command runs with.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::adapters::outbound::network::{
    DEFAULT_GITHUB_API_URL, DEFAULT_GITHUB_WEB_URL, DEFAULT_NPM_REGISTRY_URL,
};
use crate::application::use_cases::DEFAULT_MAX_DEPTH;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "registry-gate.config.yml";

/// Environment variable holding the GitHub token; wins over the config file
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

const DEFAULT_STORAGE_DIR: &str = ".registry-gate";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub storage_dir: Option<PathBuf>,
    pub npm_registry_url: Option<String>,
    pub github_api_url: Option<String>,
    pub github_web_url: Option<String>,
    pub github_token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub strict_readme: Option<bool>,
    pub max_depth: Option<usize>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Effective settings after merging defaults, the config file and the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub storage_dir: PathBuf,
    pub npm_registry_url: String,
    pub github_api_url: String,
    pub github_web_url: String,
    pub github_token: Option<String>,
    pub timeout: Duration,
    pub strict_readme: bool,
    pub max_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            npm_registry_url: DEFAULT_NPM_REGISTRY_URL.to_string(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            github_web_url: DEFAULT_GITHUB_WEB_URL.to_string(),
            github_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            strict_readme: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Settings {
    /// Layers a config file over the defaults
    pub fn from_config(config: Option<ConfigFile>) -> Self {
        let defaults = Self::default();
        let Some(config) = config else {
            return defaults;
        };

        Self {
            storage_dir: config.storage_dir.unwrap_or(defaults.storage_dir),
            npm_registry_url: config.npm_registry_url.unwrap_or(defaults.npm_registry_url),
            github_api_url: config.github_api_url.unwrap_or(defaults.github_api_url),
            github_web_url: config.github_web_url.unwrap_or(defaults.github_web_url),
            github_token: config.github_token.filter(|t| !t.trim().is_empty()),
            timeout: config
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            strict_readme: config.strict_readme.unwrap_or(defaults.strict_readme),
            max_depth: config.max_depth.unwrap_or(defaults.max_depth),
        }
    }

    /// Applies an environment token, if one is set and non-empty
    pub fn with_env_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.github_token = Some(token);
        }
        self
    }

    pub fn with_storage_dir(mut self, storage_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = storage_dir {
            self.storage_dir = dir;
        }
        self
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if config.timeout_secs == Some(0) {
        bail!(
            "Invalid config: timeout_secs must be greater than zero.\n\n\
             💡 Hint: Remove the field to use the default of {} seconds.",
            DEFAULT_TIMEOUT_SECS
        );
    }

    if config.max_depth == Some(0) {
        bail!(
            "Invalid config: max_depth must be greater than zero.\n\n\
             💡 Hint: Use `cost --root-only` to skip dependency traversal instead."
        );
    }

    let urls = [
        ("npm_registry_url", &config.npm_registry_url),
        ("github_api_url", &config.github_api_url),
        ("github_web_url", &config.github_web_url),
    ];
    for (field, value) in urls {
        if let Some(url) = value {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                bail!(
                    "Invalid config: {} must be an http(s) URL, got '{}'.\n\n\
                     💡 Hint: Include the scheme, e.g. \"https://registry.npmjs.org\".",
                    field,
                    url
                );
            }
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        tracing::warn!(field = %key, "unknown config field will be ignored");
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
storage_dir: /var/lib/registry
npm_registry_url: https://npm.internal.example
github_token: ghp_example
timeout_secs: 10
strict_readme: false
max_depth: 4
"#,
        )
        .unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.storage_dir, Some(PathBuf::from("/var/lib/registry")));
        assert_eq!(
            config.npm_registry_url.as_deref(),
            Some("https://npm.internal.example")
        );
        assert_eq!(config.timeout_secs, Some(10));
        assert_eq!(config.strict_readme, Some(false));
        assert_eq!(config.max_depth, Some(4));

        let settings = Settings::from_config(Some(config));
        assert_eq!(settings.timeout, Duration::from_secs(10));
        assert_eq!(settings.github_token.as_deref(), Some("ghp_example"));
        assert_eq!(settings.github_api_url, DEFAULT_GITHUB_API_URL);
        assert!(!settings.strict_readme);
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "max_depth: 2\n").unwrap();

        let config = discover_config(dir.path()).unwrap();
        assert_eq!(config.unwrap().max_depth, Some(2));
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        let config = discover_config(dir.path()).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config_from_path(Path::new("/nonexistent/config.yml"));
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("bad.yml");
        fs::write(&config_path, "invalid: yaml: [[[broken").unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "timeout_secs: 0\n").unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("timeout_secs"));
    }

    #[test]
    fn test_url_without_scheme_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "github_api_url: api.github.com\n").unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("github_api_url"));
    }

    #[test]
    fn test_unknown_fields_warning() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
max_depth: 3
unknown_field: true
another_unknown: value
"#,
        )
        .unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.unknown_fields.len(), 2);
        assert!(config.unknown_fields.contains_key("unknown_field"));
    }

    #[test]
    fn test_env_token_overrides_config() {
        let config = ConfigFile {
            github_token: Some("from-file".to_string()),
            ..Default::default()
        };
        let settings =
            Settings::from_config(Some(config)).with_env_token(Some("from-env".to_string()));
        assert_eq!(settings.github_token.as_deref(), Some("from-env"));

        let blank = Settings::default().with_env_token(Some("  ".to_string()));
        assert!(blank.github_token.is_none());
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::from_config(None).with_storage_dir(None);
        assert_eq!(settings.storage_dir, PathBuf::from(".registry-gate"));
        assert_eq!(settings.npm_registry_url, "https://registry.npmjs.org");
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(settings.strict_readme);
        assert_eq!(settings.max_depth, 10);
    }
}
