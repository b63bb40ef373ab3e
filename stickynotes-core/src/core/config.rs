//! Client settings persistence.
//!
//! Stores where the remote note store lives (and how long to wait for it) in
//! a JSON file at an OS-appropriate location.

use crate::{Result, StickyNotesError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the note store API.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";

/// Environment variable that overrides `apiBaseUrl` at load time.
pub const API_URL_ENV: &str = "STICKYNOTES_API_URL";

/// Persisted client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base URL of the versioned API, without the `/notes/` suffix.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Per-request timeout. `None` keeps the transport's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Reads settings from `path`, failing on a missing or malformed file.
    ///
    /// # Errors
    ///
    /// Returns [`StickyNotesError::Io`] if the file cannot be read,
    /// [`StickyNotesError::Json`] if it is not valid JSON, or
    /// [`StickyNotesError::Config`] if the base URL is not an http(s) URL.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validated()
    }

    /// Applies `STICKYNOTES_API_URL` if it is set and non-empty.
    #[must_use]
    pub fn with_env_override(self) -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) => self.with_api_base_url(&url),
            Err(_) => self,
        }
    }

    /// Blank values are ignored; non-http(s) values are logged and ignored.
    fn with_api_base_url(mut self, url: &str) -> Self {
        if url.trim().is_empty() {
            return self;
        }
        match normalize_api_url(url) {
            Ok(url) => self.api_base_url = url,
            Err(e) => log::warn!("Ignoring {API_URL_ENV}: {e}"),
        }
        self
    }

    fn validated(mut self) -> Result<Self> {
        self.api_base_url = normalize_api_url(&self.api_base_url)?;
        Ok(self)
    }
}

fn normalize_api_url(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.to_string())
    } else {
        Err(StickyNotesError::Config(format!(
            "apiBaseUrl must be an http(s) URL, got '{url}'"
        )))
    }
}

/// `<config dir>/stickynotes/config.json`, falling back to the working
/// directory when the platform has no config dir.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stickynotes")
        .join("config.json")
}

/// Loads settings from the default location; returns defaults if the file is
/// missing or corrupt. The environment override is applied either way.
pub fn load_config() -> ClientConfig {
    load_config_from(config_file_path())
}

/// Same as [`load_config`], reading from an explicit path.
pub fn load_config_from<P: AsRef<Path>>(path: P) -> ClientConfig {
    read_or_default(path.as_ref()).with_env_override()
}

fn read_or_default(path: &Path) -> ClientConfig {
    match ClientConfig::from_file(path) {
        Ok(config) => config,
        Err(StickyNotesError::Io(_)) => ClientConfig::default(),
        Err(e) => {
            log::warn!("Ignoring unusable settings at {}: {e}", path.display());
            ClientConfig::default()
        }
    }
}

/// Saves settings to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`StickyNotesError::Io`] on filesystem failure.
pub fn save_config<P: AsRef<Path>>(path: P, config: &ClientConfig) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_point_at_local_store() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000/api/v1");
        assert!(config.request_timeout_secs.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = ClientConfig {
            api_base_url: "https://notes.example.com/api/v1".to_string(),
            request_timeout_secs: Some(15),
        };
        save_config(&path, &config).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("apiBaseUrl"));
        assert!(raw.contains("requestTimeoutSecs"));

        assert_eq!(ClientConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_from_file_trims_trailing_slash() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"apiBaseUrl": "http://localhost:9000/api/v1/"}"#).unwrap();
        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:9000/api/v1");
    }

    #[test]
    fn test_from_file_rejects_non_http_url() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"apiBaseUrl": "ftp://example.com"}"#).unwrap();
        assert!(matches!(
            ClientConfig::from_file(&path),
            Err(StickyNotesError::Config(_))
        ));
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            ClientConfig::from_file(dir.path().join("absent.json")),
            Err(StickyNotesError::Io(_))
        ));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(ClientConfig::from_file(&path), Err(StickyNotesError::Json(_))));
        assert_eq!(read_or_default(&path), ClientConfig::default());
        assert_eq!(read_or_default(&dir.path().join("absent.json")), ClientConfig::default());
    }

    #[test]
    fn test_url_override_ignores_blank() {
        let config = ClientConfig::default().with_api_base_url("   ");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        let config = ClientConfig::default().with_api_base_url("http://other:1/api/");
        assert_eq!(config.api_base_url, "http://other:1/api");
    }

    #[test]
    fn test_url_override_must_be_http() {
        for bad in ["ftp://example.com", "localhost:8000/api/v1", "file:///etc/passwd"] {
            let config = ClientConfig::default().with_api_base_url(bad);
            assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL, "{bad}");
        }
        let config = ClientConfig::default().with_api_base_url(" https://notes.example.com/api/v1 ");
        assert_eq!(config.api_base_url, "https://notes.example.com/api/v1");
    }

    #[test]
    fn test_config_file_lives_under_app_dir() {
        let path = config_file_path();
        assert!(path.ends_with("stickynotes/config.json"), "{}", path.display());
    }
}
