use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, TrackError};

pub const DEFAULT_API_URL: &str = "https://api.github.com/";
pub const API_URL_ENV: &str = "REPOTRACK_API_URL";

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    /// Tracked repository file; defaults to the platform data dir.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("repotrack").join("config.toml"))
}

impl Config {
    /// Load from `path` or the default location, then apply env overrides.
    /// A missing or invalid file yields the defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).or_else(config_path);
        let mut config = match path.as_deref().map(Self::from_file) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                tracing::debug!(error = %e, "using default config");
                Config::default()
            }
            None => Config::default(),
        };
        config.apply_env(std::env::var(API_URL_ENV).ok());
        config
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| TrackError::Config(e.to_string()))
    }

    fn apply_env(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.is_empty()) {
            self.api.base_url = url;
        }
    }

    pub fn store_path(&self) -> Option<PathBuf> {
        self.storage.path.clone().or_else(crate::store::default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_config() {
        let toml_str = r#"
[api]
base_url = "https://ghe.company.com/api/v3/"

[storage]
path = "/tmp/repos.json"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url, "https://ghe.company.com/api/v3/");
        assert_eq!(config.store_path(), Some(PathBuf::from("/tmp/repos.json")));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(config, Err(TrackError::Io(_))));
    }

    #[test]
    fn invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = 1").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(TrackError::Config(_))
        ));
    }

    #[test]
    fn env_overrides_base_url() {
        let mut config = Config::default();
        config.apply_env(Some("http://localhost:8080/".to_string()));
        assert_eq!(config.api.base_url, "http://localhost:8080/");

        config.apply_env(Some(String::new()));
        assert_eq!(config.api.base_url, "http://localhost:8080/");
    }
}
