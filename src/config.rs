//! Top-level application configuration.
//!
//! Configuration is stored in `<config dir>/config.yaml` and includes:
//! - The gateway API base URL
//! - Request timeout and list page size
//! - The default fiat currency for price lookups
//!
//! The config dir is `$GATEDESK_CONFIG_DIR` when set, otherwise the
//! platform config directory.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DeskError, Result};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "GATEDESK_CONFIG_DIR";
/// Environment variable overriding `api_url`.
pub const API_URL_ENV: &str = "GATEDESK_API_URL";

pub const DEFAULT_API_URL: &str = "https://api.gatedesk.io/v1";
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Keys accepted by `config get` / `config set`.
pub const CONFIG_KEYS: &[&str] = &["api_url", "request_timeout", "page_size", "default_fiat"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL that operation paths are joined onto
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Tickets revealed per "load more" step (default: 10)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Fiat currency used by `price` when none is given
    #[serde(default = "default_fiat")]
    pub default_fiat: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_fiat() -> String {
    "USD".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout: default_request_timeout(),
            page_size: default_page_size(),
            default_fiat: default_fiat(),
        }
    }
}

/// Directory holding `config.yaml` and `session.yaml`
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Ok(PathBuf::from(dir));
    }

    ProjectDirs::from("io", "gatedesk", "gatedesk")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| DeskError::Config("could not determine a config directory".to_string()))
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.yaml"))
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DeskError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        write_private_yaml(&path, &serde_yaml_ng::to_string(self)?)
    }

    fn validate(&self) -> Result<()> {
        Url::parse(&self.api_url)?;
        if self.page_size == 0 {
            return Err(DeskError::Config("page_size must be at least 1".to_string()));
        }
        Ok(())
    }

    /// API base URL, honouring `$GATEDESK_API_URL`
    pub fn api_url(&self) -> Result<Url> {
        if let Ok(url) = env::var(API_URL_ENV)
            && !url.is_empty()
        {
            return Ok(Url::parse(&url)?);
        }
        Ok(Url::parse(&self.api_url)?)
    }

    /// Get the request timeout duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Read a single key as a display string
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "api_url" => Ok(self.api_url.clone()),
            "request_timeout" => Ok(self.request_timeout.to_string()),
            "page_size" => Ok(self.page_size.to_string()),
            "default_fiat" => Ok(self.default_fiat.clone()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a single key from its string form
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_url" => {
                Url::parse(value)?;
                self.api_url = value.to_string();
            }
            "request_timeout" => {
                self.request_timeout = value.parse().map_err(|_| {
                    DeskError::Config(format!("request_timeout must be seconds, got '{value}'"))
                })?;
            }
            "page_size" => {
                let size: usize = value.parse().map_err(|_| {
                    DeskError::Config(format!("page_size must be a number, got '{value}'"))
                })?;
                if size == 0 {
                    return Err(DeskError::Config("page_size must be at least 1".to_string()));
                }
                self.page_size = size;
            }
            "default_fiat" => self.default_fiat = value.trim().to_uppercase(),
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> DeskError {
    DeskError::Config(format!(
        "unknown config key '{}', expected one of: {}",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

/// Write a YAML file readable only by the owner
pub(crate) fn write_private_yaml(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            DeskError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create directory {}: {}", parent.display(), e),
            ))
        })?;
    }

    fs::write(path, content).map_err(|e| {
        DeskError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to write {}: {}", path.display(), e),
        ))
    })?;

    // Set restrictive permissions on Unix (owner read/write only)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = fs::Permissions::from_mode(0o600);
        fs::set_permissions(path, permissions)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, 30);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.default_fiat, "USD");
    }

    #[test]
    fn test_config_partial_yaml_uses_defaults() {
        let yaml = "page_size: 25\n";
        let config: Config = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_set_and_get() {
        let mut config = Config::default();
        config.set("page_size", "5").unwrap();
        config.set("default_fiat", " eur ").unwrap();
        config.set("api_url", "http://localhost:8080/api").unwrap();

        assert_eq!(config.get("page_size").unwrap(), "5");
        assert_eq!(config.get("default_fiat").unwrap(), "EUR");
        assert_eq!(config.get("api_url").unwrap(), "http://localhost:8080/api");
    }

    #[test]
    fn test_config_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("page_size", "0").is_err());
        assert!(config.set("page_size", "ten").is_err());
        assert!(config.set("api_url", "not a url").is_err());
        assert!(config.set("theme", "dark").is_err());
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_config_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_config_load_rejects_zero_page_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "page_size: 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    #[serial]
    fn test_api_url_env_override() {
        let config = Config::default();
        unsafe { env::set_var(API_URL_ENV, "http://127.0.0.1:8080/api/") };
        let url = config.api_url();
        unsafe { env::remove_var(API_URL_ENV) };

        assert_eq!(url.unwrap().as_str(), "http://127.0.0.1:8080/api/");
        assert_eq!(config.api_url().unwrap().as_str(), DEFAULT_API_URL);
    }
}
