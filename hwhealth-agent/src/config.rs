//! Monitor configuration
//!
//! Handles:
//! - Repeat interval and CPU sampling window
//! - SMART tool selection and timeout
//! - Log filter and output format
//!
//! Loaded from `$HWHEALTH_CONFIG` or `<config dir>/hwhealth/config.toml`.
//! Every key is optional; a missing file means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const CONFIG_ENV_VAR: &str = "HWHEALTH_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not find config directory")]
    NoConfigDir,
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub interval_secs: u64,
    pub cpu_sample_millis: u64,
    pub log_level: String,
    pub output: OutputFormat,
    pub smart: SmartConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartConfig {
    pub enabled: bool,
    pub tool: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            cpu_sample_millis: 1000,
            log_level: "hwhealth_agent=info".to_string(),
            output: OutputFormat::Text,
            smart: SmartConfig::default(),
        }
    }
}

impl Default for SmartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tool: "smartctl".to_string(),
            timeout_secs: 5,
        }
    }
}

impl MonitorConfig {
    /// Load config from `$HWHEALTH_CONFIG` or the OS-specific location
    pub async fn load() -> Result<Self, ConfigError> {
        let path = Self::config_file_path()?;
        Self::load_from(&path).await
    }

    pub async fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the runner cannot schedule with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "interval_secs",
                reason: "must be at least 1 second".to_string(),
            });
        }
        if self.smart.enabled && self.smart.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "smart.timeout_secs",
                reason: "must be at least 1 second when SMART checks are enabled".to_string(),
            });
        }
        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Ok(PathBuf::from(path)),
            None => Self::default_config_path(),
        }
    }

    /// `<config dir>/hwhealth/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let mut path = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        path.push("hwhealth");
        path.push("config.toml");
        Ok(path)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn cpu_sample_window(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_millis)
    }

    pub fn smart_timeout(&self) -> Duration {
        Duration::from_secs(self.smart.timeout_secs)
    }

    /// SMART tool to invoke, `None` when checks are disabled
    pub fn smart_tool(&self) -> Option<String> {
        self.smart.enabled.then(|| self.smart.tool.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_config() {
        let config = MonitorConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(60));
        assert_eq!(config.cpu_sample_window(), Duration::from_secs(1));
        assert_eq!(config.smart_timeout(), Duration::from_secs(5));
        assert_eq!(config.smart_tool().as_deref(), Some("smartctl"));
        assert_eq!(config.output, OutputFormat::Text);
    }

    #[tokio::test]
    async fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = MonitorConfig::load_from(&dir.path().join("config.toml")).await.unwrap();
        assert_eq!(config, MonitorConfig::default());
    }

    #[tokio::test]
    async fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "interval_secs = 10\noutput = \"json\"\n\n[smart]\nenabled = false\n",
        )
        .unwrap();

        let config = MonitorConfig::load_from(&path).await.unwrap();
        assert_eq!(config.interval_secs, 10);
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.smart_tool(), None);
        assert_eq!(config.smart.timeout_secs, 5);
        assert_eq!(config.cpu_sample_millis, 1000);
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "interval_secs = \"soon\"").unwrap();

        let result = MonitorConfig::load_from(&path).await;
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_zero_interval_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "interval_secs = 0\n").unwrap();

        let result = MonitorConfig::load_from(&path).await;
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "interval_secs", .. })
        ));
    }

    #[test]
    fn test_zero_smart_timeout_only_matters_when_enabled() {
        let mut config = MonitorConfig::default();
        config.smart.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "smart.timeout_secs", .. })
        ));

        config.smart.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_path() {
        if let Ok(path) = MonitorConfig::default_config_path() {
            assert!(path.ends_with("hwhealth/config.toml"));
        }
    }
}
