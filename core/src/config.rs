use crate::errors::{CompareError, CompareResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_API_PORT: &str = "5000";

/// Configuration for the comparison client
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClientConfig {
    /// Origin of the comparison backend, without the `/api` suffix
    pub api_url: Option<String>,
    /// Request timeout. When unset, the transport default applies.
    pub timeout_secs: Option<u64>,
    pub friendly_errors: Option<bool>,
    pub log_level: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: Some(DEFAULT_API_URL.to_string()),
            timeout_secs: None,
            friendly_errors: Some(true),
            log_level: Some("warn".to_string()),
        }
    }
}

impl ClientConfig {
    /// A config with every field unset, useful as a merge overlay
    pub fn empty() -> Self {
        Self {
            api_url: None,
            timeout_secs: None,
            friendly_errors: None,
            log_level: None,
        }
    }

    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> CompareResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                CompareError::ConfigError(format!("Failed to read config file: {}", e))
            })?;

            let config: Self = toml::from_str(&content).map_err(|e| {
                CompareError::ConfigError(format!("Failed to parse config file: {}", e))
            })?;

            Ok(Self::default().merge(&config))
        } else {
            Ok(Self::default())
        }
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> CompareResult<()> {
        let content = toml::to_string(self).map_err(|e| {
            CompareError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        // Ensure the directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CompareError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, content).map_err(|e| {
            CompareError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Reads `COMPARE_*` overrides from the environment (after `.env`).
    /// Unset or unparseable variables leave the field unset.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            api_url: env::var("COMPARE_API_URL").ok().filter(|v| !v.trim().is_empty()),
            timeout_secs: env::var("COMPARE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok()),
            friendly_errors: env::var("COMPARE_FRIENDLY_ERRORS")
                .ok()
                .map(|v| v.to_lowercase() != "false" && v != "0"),
            log_level: env::var("COMPARE_LOG_LEVEL").ok(),
        }
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_url: other.api_url.clone().or_else(|| self.api_url.clone()),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            friendly_errors: other.friendly_errors.or(self.friendly_errors),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
        }
    }

    /// Base URL every endpoint hangs off, e.g. `http://localhost:5000/api`
    pub fn api_base_url(&self) -> String {
        let origin = self.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
        format!("{}/api", origin.trim_end_matches('/'))
    }

    /// Port shown in the "cannot connect" hint. Falls back to 5000 when the
    /// URL names none.
    pub fn api_port(&self) -> String {
        self.api_url
            .as_deref()
            .and_then(|url| reqwest::Url::parse(url).ok())
            .and_then(|url| url.port_or_known_default())
            .map(|port| port.to_string())
            .unwrap_or_else(|| DEFAULT_API_PORT.to_string())
    }

    pub fn friendly_errors_enabled(&self) -> bool {
        self.friendly_errors.unwrap_or(true)
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> CompareResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        CompareError::ConfigError("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> CompareResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_and_port() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url(), "http://localhost:5000/api");
        assert_eq!(config.api_port(), "5000");

        let custom = ClientConfig {
            api_url: Some("http://demo.internal:8080/".to_string()),
            ..ClientConfig::empty()
        };
        assert_eq!(custom.api_base_url(), "http://demo.internal:8080/api");
        assert_eq!(custom.api_port(), "8080");

        let https = ClientConfig {
            api_url: Some("https://compare.example.com".to_string()),
            ..ClientConfig::empty()
        };
        assert_eq!(https.api_port(), "443");
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = ClientConfig::default();
        let overlay = ClientConfig {
            api_url: Some("http://10.0.0.5:5000".to_string()),
            friendly_errors: Some(false),
            ..ClientConfig::empty()
        };
        let merged = base.merge(&overlay);
        assert_eq!(merged.api_url.as_deref(), Some("http://10.0.0.5:5000"));
        assert!(!merged.friendly_errors_enabled());
        assert_eq!(merged.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = ClientConfig {
            api_url: Some("http://127.0.0.1:7000".to_string()),
            timeout_secs: Some(30),
            friendly_errors: Some(false),
            log_level: Some("debug".to_string()),
        };
        config.save_to_file(&path).unwrap();

        let loaded = ClientConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ClientConfig::load_from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, ClientConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = 12\n").unwrap();

        let loaded = ClientConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.timeout_secs, Some(12));
        assert_eq!(loaded.api_url.as_deref(), Some(DEFAULT_API_URL));
    }
}
