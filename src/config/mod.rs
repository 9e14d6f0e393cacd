//! Configuration management for ora
//!
//! The file lives at `<config_dir>/ora/config.toml`. The ask endpoint can be
//! overridden by the `--api-url` flag or the `ORA_API_URL` environment
//! variable; everything is resolved once at startup into a [`ClientConfig`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Environment variable naming the ask endpoint
pub const API_URL_ENV: &str = "ORA_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub tui: TuiConfig,
    pub notebook: NotebookConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Endpoint receiving `{"question": ...}` posts
    pub ask_url: String,
    /// Endpoint receiving multipart document uploads
    pub upload_url: String,
    /// Endpoint listing (GET) and removing (DELETE `<docs_url>/<name>`) documents
    pub docs_url: String,
    /// Request timeout; unset means requests may hang indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            ask_url: "http://localhost:8000/ask".to_string(),
            upload_url: "http://localhost:8000/upload".to_string(),
            docs_url: "http://localhost:8000/docs".to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Event poll interval in milliseconds
    pub tick_rate_ms: u64,
    /// Clear the question draft after it is submitted
    pub clear_draft_on_submit: bool,
    /// Number of entries in the recent questions panel
    pub recent_history: usize,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            clear_draft_on_submit: false,
            recent_history: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotebookConfig {
    pub export_path: PathBuf,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            export_path: PathBuf::from("notebook.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file used while the TUI owns the terminal
    pub file: Option<PathBuf>,
}

/// Errors raised while turning [`Config`] into a [`ClientConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL for {field}: {value} ({source})")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported scheme for {field}: {value} (expected http or https)")]
    UnsupportedScheme { field: &'static str, value: String },
}

/// Configuration handed to the root container, resolved once at startup
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub ask_url: Url,
    pub upload_url: Url,
    pub docs_url: Url,
    pub timeout: Option<Duration>,
    pub tick_rate: Duration,
    pub clear_draft_on_submit: bool,
    pub recent_history: usize,
    pub notebook_path: PathBuf,
}

fn parse_endpoint(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme {
            field,
            value: value.to_string(),
        }),
    }
}

impl Config {
    /// Load configuration from the default location or fall back to defaults
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    /// Load configuration from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Get the configuration file path
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "ora")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Default log file for the TUI
    pub fn default_log_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "ora")
            .map(|dirs| dirs.data_dir().join("ora.log"))
            .unwrap_or_else(|| PathBuf::from("ora.log"))
    }

    /// Log file to use while the TUI is running
    pub fn log_path(&self) -> PathBuf {
        self.logging
            .file
            .clone()
            .unwrap_or_else(Self::default_log_path)
    }

    /// Resolve against the `--api-url` flag and the process environment
    pub fn resolve(&self, api_url_override: Option<&str>) -> Result<ClientConfig, ConfigError> {
        self.resolve_with_env(api_url_override, std::env::var(API_URL_ENV).ok())
    }

    /// Resolve with an explicit environment value
    ///
    /// Precedence for the ask URL: flag, environment, config file.
    pub fn resolve_with_env(
        &self,
        api_url_override: Option<&str>,
        env_api_url: Option<String>,
    ) -> Result<ClientConfig, ConfigError> {
        let ask_url = api_url_override
            .map(str::to_string)
            .or(env_api_url.filter(|value| !value.trim().is_empty()))
            .unwrap_or_else(|| self.backend.ask_url.clone());

        Ok(ClientConfig {
            ask_url: parse_endpoint("ask_url", &ask_url)?,
            upload_url: parse_endpoint("upload_url", &self.backend.upload_url)?,
            docs_url: parse_endpoint("docs_url", &self.backend.docs_url)?,
            timeout: self.backend.timeout_secs.map(Duration::from_secs),
            tick_rate: Duration::from_millis(self.tui.tick_rate_ms.max(10)),
            clear_draft_on_submit: self.tui.clear_draft_on_submit,
            recent_history: self.tui.recent_history,
            notebook_path: self.notebook.export_path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_resolve() {
        let config = Config::default().resolve_with_env(None, None).unwrap();
        assert_eq!(config.ask_url.as_str(), "http://localhost:8000/ask");
        assert_eq!(config.upload_url.as_str(), "http://localhost:8000/upload");
        assert_eq!(config.timeout, None);
        assert!(!config.clear_draft_on_submit);
        assert_eq!(config.recent_history, 5);
    }

    #[test]
    fn test_ask_url_precedence() {
        let config = Config::default();

        let resolved = config
            .resolve_with_env(None, Some("http://env:9000/query".to_string()))
            .unwrap();
        assert_eq!(resolved.ask_url.as_str(), "http://env:9000/query");

        let resolved = config
            .resolve_with_env(
                Some("http://flag:7000/ask"),
                Some("http://env:9000/query".to_string()),
            )
            .unwrap();
        assert_eq!(resolved.ask_url.as_str(), "http://flag:7000/ask");
    }

    #[test]
    fn test_blank_env_value_ignored() {
        let resolved = Config::default()
            .resolve_with_env(None, Some("  ".to_string()))
            .unwrap();
        assert_eq!(resolved.ask_url.as_str(), "http://localhost:8000/ask");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = Config::default()
            .resolve_with_env(Some("not a url"), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { field: "ask_url", .. }));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let mut config = Config::default();
        config.backend.upload_url = "ftp://localhost/upload".to_string();
        let err = config.resolve_with_env(None, None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedScheme {
                field: "upload_url",
                ..
            }
        ));
    }

    #[test]
    fn test_load_partial_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[backend]
ask_url = "http://10.0.0.2:8000/query"
timeout_secs = 30

[tui]
clear_draft_on_submit = true
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.backend.ask_url, "http://10.0.0.2:8000/query");
        assert_eq!(config.backend.upload_url, "http://localhost:8000/upload");
        assert!(config.tui.clear_draft_on_submit);
        assert_eq!(config.tui.recent_history, 5);

        let resolved = config.resolve_with_env(None, None).unwrap();
        assert_eq!(resolved.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_load_missing_file_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_from(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.backend.ask_url, BackendConfig::default().ask_url);
    }

    #[test]
    fn test_load_malformed_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[backend\nask_url = ").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
