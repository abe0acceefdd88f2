//! Configuration for DigiBlog.
//!
//! Reads `digi.toml`, found in the working directory or one of its parents
//! unless a path is given. Relative paths in the file are resolved against
//! the directory holding it. Command line values are applied last via
//! [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `${VAR}` (error if unset) and `${VAR:-default}` are expanded in:
//! - `server.host`
//! - `source.remote.base_url`
//! - `source.remote.owner`
//! - `source.remote.repo`
//! - `source.remote.branch`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "digi.toml";

/// Values from the command line that take precedence over the file.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub mode: Option<SourceMode>,
    pub root_dir: Option<PathBuf>,
    pub cache_enabled: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub source: SourceConfig,
    pub cache: CacheConfig,
    pub search: SearchConfig,

    /// File the configuration was read from.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        }
    }
}

/// Where documents come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Read from `root_dir` on disk.
    Local,
    /// Fetch from the raw GitHub content host.
    #[default]
    Remote,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub mode: SourceMode,
    /// Root for local mode. Holds `markdown_dir`.
    pub root_dir: PathBuf,
    /// Directory of the documents, relative to the root or repository.
    pub markdown_dir: String,
    pub remote: RemoteConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::default(),
            root_dir: PathBuf::from("."),
            markdown_dir: "markdown".to_owned(),
            remote: RemoteConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub base_url: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub timeout_secs: u64,
}

impl RemoteConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://raw.githubusercontent.com".to_owned(),
            owner: "frank-kolesik".to_owned(),
            repo: "digi-blog".to_owned(),
            branch: "main".to_owned(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
    pub ttl_secs: u64,
}

impl CacheConfig {
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 300,
            ttl_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Catalog file (JSON or YAML). The built-in catalog is used when unset.
    pub catalog: Option<PathBuf>,
    pub debounce_ms: u64,
    /// Highest per-field score that still counts as a match.
    pub threshold: f64,
}

impl SearchConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            debounce_ms: 250,
            threshold: 0.4,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    #[error("Environment variable error in {field}: {message}")]
    EnvVar { field: String, message: String },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )))
    }
}

impl Config {
    /// Load the configuration and apply command line settings.
    ///
    /// An explicit `config_path` must exist. Without one, `digi.toml` is
    /// searched upwards from the working directory; if none is found the
    /// defaults apply with the working directory as root.
    ///
    /// # Errors
    ///
    /// Fails on a missing explicit file, unreadable or malformed TOML, an
    /// unset environment variable, or a value that does not validate.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Self::load_from_file(path)?,
            None => match discover_config() {
                Some(found) => Self::load_from_file(&found)?,
                None => Self::default_with_base(&std::env::current_dir()?),
            },
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file, resolving paths relative to it.
    ///
    /// # Errors
    ///
    /// Fails on I/O, TOML or environment expansion errors.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.expand_env_vars()?;

        let base = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(base);
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Defaults, with relative paths anchored at `base`.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        let mut config = Self::default();
        config.resolve_paths(base);
        config
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(mode) = settings.mode {
            self.source.mode = mode;
        }
        if let Some(root_dir) = &settings.root_dir {
            self.source.root_dir.clone_from(root_dir);
        }
        if let Some(enabled) = settings.cache_enabled {
            self.cache.enabled = enabled;
        }
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_in(&mut self.server.host, "server.host")?;

        let remote = &mut self.source.remote;
        expand::expand_in(&mut remote.base_url, "source.remote.base_url")?;
        expand::expand_in(&mut remote.owner, "source.remote.owner")?;
        expand::expand_in(&mut remote.repo, "source.remote.repo")?;
        expand::expand_in(&mut remote.branch, "source.remote.branch")?;
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        self.source.root_dir = base.join(&self.source.root_dir);
        if let Some(catalog) = &self.search.catalog {
            self.search.catalog = Some(base.join(catalog));
        }
    }

    /// Check that every value is usable.
    ///
    /// Remote settings are only checked in remote mode.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port cannot be 0".to_owned()));
        }

        require_non_empty(&self.source.markdown_dir, "source.markdown_dir")?;
        if Path::new(&self.source.markdown_dir).is_absolute() {
            return Err(ConfigError::Validation(
                "source.markdown_dir must be relative".to_owned(),
            ));
        }

        if self.source.mode == SourceMode::Remote {
            let remote = &self.source.remote;
            require_non_empty(&remote.base_url, "source.remote.base_url")?;
            require_http_url(&remote.base_url, "source.remote.base_url")?;
            require_non_empty(&remote.owner, "source.remote.owner")?;
            require_non_empty(&remote.repo, "source.remote.repo")?;
            require_non_empty(&remote.branch, "source.remote.branch")?;
            if remote.timeout_secs == 0 {
                return Err(ConfigError::Validation(
                    "source.remote.timeout_secs must be greater than 0".to_owned(),
                ));
            }
        }

        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err(ConfigError::Validation(
                "cache.max_entries must be greater than 0 when the cache is enabled".to_owned(),
            ));
        }

        if !(0.0..=1.0).contains(&self.search.threshold) {
            return Err(ConfigError::Validation(
                "search.threshold must be between 0.0 and 1.0".to_owned(),
            ));
        }

        Ok(())
    }
}

fn discover_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn assert_validation_error(config: &Config, expected: &[&str]) {
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected {
            assert!(msg.contains(s), "Expected error to contain '{s}', got: {msg}");
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default_with_base(Path::new("/site"));

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.source.mode, SourceMode::Remote);
        assert_eq!(config.source.root_dir, PathBuf::from("/site/."));
        assert_eq!(config.source.markdown_dir, "markdown");
        assert_eq!(config.source.remote.owner, "frank-kolesik");
        assert_eq!(config.source.remote.timeout(), Duration::from_secs(30));
        assert!(config.cache.enabled);
        assert_eq!(config.cache.max_entries, 300);
        assert_eq!(config.cache.ttl(), Duration::from_secs(60));
        assert_eq!(config.search.catalog, None);
        assert_eq!(config.search.debounce(), Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_file() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 8080

[source]
mode = "local"
root_dir = "content"

[source.remote]
branch = "develop"

[cache]
enabled = false

[search]
catalog = "catalog.yaml"
debounce_ms = 100
threshold = 0.3
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.source.mode, SourceMode::Local);
        assert_eq!(config.source.root_dir, PathBuf::from("/project/content"));
        assert_eq!(config.source.remote.branch, "develop");
        assert_eq!(config.source.remote.repo, "digi-blog");
        assert!(!config.cache.enabled);
        assert_eq!(
            config.search.catalog,
            Some(PathBuf::from("/project/catalog.yaml"))
        );
        assert_eq!(config.search.debounce_ms, 100);
    }

    #[test]
    fn test_unknown_mode_is_parse_error() {
        let result: Result<Config, _> = toml::from_str("[source]\nmode = \"ftp\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("digi.toml");
        std::fs::write(&path, "[server]\nport = 4000\n[source]\nmode = \"local\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.source.root_dir, temp.path().join("."));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/digi.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("digi.toml");
        std::fs::write(&path, "[search]\nthreshold = 2.0\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("search.threshold"));
    }

    #[test]
    fn test_cli_settings_take_precedence() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("digi.toml");
        std::fs::write(&path, "[server]\nport = 4000\n").unwrap();

        let settings = CliSettings {
            port: Some(9000),
            mode: Some(SourceMode::Local),
            root_dir: Some(PathBuf::from("/docs")),
            cache_enabled: Some(false),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.source.mode, SourceMode::Local);
        assert_eq!(config.source.root_dir, PathBuf::from("/docs"));
        assert!(!config.cache.enabled);
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: variable names are unique to this test
        unsafe {
            std::env::set_var("DIGI_TEST_OWNER", "schule");
            std::env::remove_var("DIGI_TEST_BRANCH");
        }

        let toml = r#"
[source.remote]
owner = "${DIGI_TEST_OWNER}"
branch = "${DIGI_TEST_BRANCH:-main}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.source.remote.owner, "schule");
        assert_eq!(config.source.remote.branch, "main");

        unsafe {
            std::env::remove_var("DIGI_TEST_OWNER");
        }
    }

    #[test]
    fn test_expand_env_vars_missing() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("DIGI_TEST_MISSING_REPO");
        }
        let mut config: Config =
            toml::from_str("[source.remote]\nrepo = \"${DIGI_TEST_MISSING_REPO}\"\n").unwrap();

        let err = config.expand_env_vars().unwrap_err();
        assert!(err.to_string().contains("source.remote.repo"));
    }

    #[test]
    fn test_validate_server() {
        let mut config = Config::default_with_base(Path::new("/t"));
        config.server.host = String::new();
        assert_validation_error(&config, &["server.host", "empty"]);

        let mut config = Config::default_with_base(Path::new("/t"));
        config.server.port = 0;
        assert_validation_error(&config, &["server.port"]);
    }

    #[test]
    fn test_validate_remote_only_in_remote_mode() {
        let mut config = Config::default_with_base(Path::new("/t"));
        config.source.remote.base_url = "ftp://example.com".to_owned();
        assert_validation_error(&config, &["base_url", "http"]);

        config.source.mode = SourceMode::Local;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_markdown_dir() {
        let mut config = Config::default_with_base(Path::new("/t"));
        config.source.markdown_dir = "/abs".to_owned();
        assert_validation_error(&config, &["markdown_dir", "relative"]);
    }

    #[test]
    fn test_validate_cache_capacity() {
        let mut config = Config::default_with_base(Path::new("/t"));
        config.cache.max_entries = 0;
        assert_validation_error(&config, &["cache.max_entries"]);

        config.cache.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout() {
        let mut config = Config::default_with_base(Path::new("/t"));
        config.source.remote.timeout_secs = 0;
        assert_validation_error(&config, &["timeout_secs"]);
    }
}
