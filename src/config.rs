//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::{DEFAULT_API_BASE, RISK_ENDPOINT};
use crate::session::SessionKeys;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionKeys,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Scoring service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// No timeout when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_endpoint() -> String {
    RISK_ENDPOINT.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Client storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("airhealth").to_string_lossy().to_string())
        .unwrap_or_else(|| "./airhealth_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Data directory with a leading `~/` expanded to the home directory
    pub fn data_path(&self) -> PathBuf {
        match (self.data_dir.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.data_dir),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let (config, skipped) = Self::load_first(&Self::default_paths());
        for e in skipped {
            tracing::warn!("Skipping config file: {}", e);
        }
        config
    }

    /// Candidate config files, in lookup order
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("airhealth").join("config.toml")),
            Some(PathBuf::from("./airhealth.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load the first existing file that parses, falling back to environment
    /// only. Files that exist but fail to load are returned alongside the
    /// config so the caller can report them once logging is up.
    pub fn load_first(paths: &[PathBuf]) -> (Self, Vec<ConfigError>) {
        let mut skipped = Vec::new();

        for path in paths {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path);
                        return (config, skipped);
                    }
                    Err(e) => skipped.push(e),
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        (Self::from_env(), skipped)
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(url) = var("AIRHEALTH_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = var("AIRHEALTH_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.api.request_timeout_secs = Some(secs);
            }
        }

        // Storage overrides
        if let Some(data_dir) = var("AIRHEALTH_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        // Logging overrides
        if let Some(level) = var("AIRHEALTH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("AIRHEALTH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# AirHealth Configuration
#
# Environment variables override these settings:
# - AIRHEALTH_API_URL
# - AIRHEALTH_REQUEST_TIMEOUT_SECS
# - AIRHEALTH_DATA_DIR
# - AIRHEALTH_LOG_LEVEL
# - AIRHEALTH_LOG_FORMAT

[api]
# Scoring service base URL
base_url = "http://localhost:5000"

# Scoring endpoint path
endpoint = "/health-risk"

# Request timeout in seconds (unset waits indefinitely)
# request_timeout_secs = 30

[session]
# Client storage key of the login marker
user_key = "airhealthUser"

# Client storage key of the JSON-encoded profile
profile_key = "airhealthProfile"

# Page to return to when signed out
entry_page = "index.html"

[storage]
# Directory holding client storage (storage.json)
data_dir = "~/.local/share/airhealth"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.api.endpoint, "/health-risk");
        assert_eq!(config.api.request_timeout(), None);
        assert_eq!(config.session, SessionKeys::default());
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.session.user_key, "airhealthUser");
        assert_eq!(config.storage.data_dir, "~/.local/share/airhealth");
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            [api]
            base_url = "https://risk.example.org"
            request_timeout_secs = 10

            [session]
            entry_page = "login.html"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.endpoint, "/health-risk");
        assert_eq!(config.api.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.session.entry_page, "login.html");
        assert_eq!(config.session.profile_key, "airhealthProfile");
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("AIRHEALTH_API_URL", "http://10.0.0.5:5000"),
            ("AIRHEALTH_REQUEST_TIMEOUT_SECS", "not-a-number"),
            ("AIRHEALTH_LOG_FORMAT", "json"),
        ]);

        let mut config = Config::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://10.0.0.5:5000");
        assert_eq!(config.api.request_timeout_secs, None);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_data_path_expands_home() {
        let storage = StorageConfig {
            data_dir: "~/.local/share/airhealth".to_string(),
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(storage.data_path(), home.join(".local/share/airhealth"));
        }

        let storage = StorageConfig {
            data_dir: "/var/lib/airhealth".to_string(),
        };
        assert_eq!(storage.data_path(), PathBuf::from("/var/lib/airhealth"));
    }

    #[test]
    fn test_load_first_reports_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&broken, "[api\nbase_url = ").unwrap();
        std::fs::write(&good, "[logging]\nformat = \"json\"\n").unwrap();

        let missing = dir.path().join("missing.toml");
        let (config, skipped) = Config::load_first(&[missing, broken.clone(), good]);
        assert_eq!(config.logging.format, "json");
        assert_eq!(skipped.len(), 1);
        assert!(matches!(&skipped[0], ConfigError::Parse { path, .. } if *path == broken));
    }

    #[test]
    fn test_load_first_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let (_, skipped) = Config::load_first(&[dir.path().join("absent.toml")]);
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/airhealth.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
