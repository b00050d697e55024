use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use finder_engine::ApiSettings;
use finder_logging::finder_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

pub(crate) const CONFIG_FILENAME: &str = "finder.ron";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: Option<u64>,
    pub settings_path: PathBuf,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000/api".to_string(),
            api_token: None,
            connect_timeout_ms: 10_000,
            request_timeout_ms: None,
            settings_path: PathBuf::from("./.finder_settings.json"),
            log_destination: LogDestination::File,
        }
    }
}

impl AppConfig {
    /// Reads `finder.ron` from `dir` when present, then applies environment overrides.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config = Self::from_file(&dir.join(CONFIG_FILENAME))?;
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `FINDER_*` overrides; empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(url) = var("FINDER_API_URL") {
            self.api_url = url;
        }
        if let Some(token) = var("FINDER_API_TOKEN") {
            self.api_token = Some(token);
        }
        if let Some(path) = var("FINDER_SETTINGS_PATH") {
            self.settings_path = PathBuf::from(path);
        }
        self
    }

    pub fn api_settings(&self) -> ApiSettings {
        finder_info!(
            "API {} (token {}, request timeout {:?} ms)",
            self.api_url,
            if self.api_token.is_some() { "set" } else { "unset" },
            self.request_timeout_ms
        );
        ApiSettings {
            base_url: self.api_url.clone(),
            bearer_token: self.api_token.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::from_file(&temp.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"(api_url: "https://parts.example/api", request_timeout_ms: Some(30000), log_destination: Both)"#,
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.api_url, "https://parts.example/api");
        assert_eq!(config.request_timeout_ms, Some(30_000));
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.connect_timeout_ms, 10_000);

        let api = config.api_settings();
        assert_eq!(api.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "(api_url: ").unwrap();
        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn environment_overrides_file_values() {
        let config = AppConfig::default().with_overrides(|key| match key {
            "FINDER_API_URL" => Some("http://10.0.0.2/api".to_string()),
            "FINDER_API_TOKEN" => Some("abc".to_string()),
            "FINDER_SETTINGS_PATH" => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.api_url, "http://10.0.0.2/api");
        assert_eq!(config.api_token.as_deref(), Some("abc"));
        assert_eq!(config.settings_path, PathBuf::from("./.finder_settings.json"));
    }
}
