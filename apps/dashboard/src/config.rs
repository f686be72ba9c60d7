//! Dashboard configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/growlab/dashboard.toml`
//! - Windows: `%APPDATA%/growlab/dashboard.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use growlab_protocol::constants::{
    API_BASE_URL, DEFAULT_DEVICE_URL, REGISTRATION, REGISTRATION_FETCH_INTERVAL,
    REGISTRATION_PATH, REQUEST_TIMEOUT, TELEMETRY, TELEMETRY_FETCH_INTERVAL, TELEMETRY_PATH,
};
use growlab_protocol::{DescriptorError, ResourceDescriptor, resolve_base_url};
use serde::{Deserialize, Serialize};

/// Dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address of the controller.
    #[serde(default = "default_device_url")]
    pub device_url: String,

    /// API prefix, relative to `device_url` or absolute.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Telemetry fetch interval in seconds.
    #[serde(default = "default_telemetry_interval")]
    pub telemetry_interval_secs: u64,

    /// Registration fetch interval in seconds.
    #[serde(default = "default_registration_interval")]
    pub registration_interval_secs: u64,

    /// Per-request timeout in seconds (0 = default).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_device_url() -> String {
    DEFAULT_DEVICE_URL.into()
}

fn default_api_base_url() -> String {
    API_BASE_URL.into()
}

fn default_telemetry_interval() -> u64 {
    TELEMETRY_FETCH_INTERVAL.as_secs()
}

fn default_registration_interval() -> u64 {
    REGISTRATION_FETCH_INTERVAL.as_secs()
}

fn default_request_timeout() -> u64 {
    REQUEST_TIMEOUT.as_secs()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_url: default_device_url(),
            api_base_url: default_api_base_url(),
            telemetry_interval_secs: default_telemetry_interval(),
            registration_interval_secs: default_registration_interval(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Base URL every resource path is appended to.
    pub fn base_url(&self) -> String {
        resolve_base_url(&self.device_url, &self.api_base_url)
    }

    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => REQUEST_TIMEOUT,
            secs => Duration::from_secs(secs),
        }
    }

    /// The resources to poll, in display order.
    pub fn descriptors(&self) -> Result<Vec<ResourceDescriptor>, DescriptorError> {
        Ok(vec![
            ResourceDescriptor::new(
                REGISTRATION,
                REGISTRATION_PATH,
                Duration::from_secs(self.registration_interval_secs),
            )?,
            ResourceDescriptor::new(
                TELEMETRY,
                TELEMETRY_PATH,
                Duration::from_secs(self.telemetry_interval_secs),
            )?,
        ])
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("growlab").join("dashboard.toml"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("growlab")
            .join("dashboard.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.device_url, "http://192.168.4.1");
        assert_eq!(config.api_base_url, "api/v1");
        assert_eq!(config.telemetry_interval_secs, 10);
        assert_eq!(config.registration_interval_secs, 60);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.base_url(), "http://192.168.4.1/api/v1");
    }

    #[test]
    fn config_partial_toml() {
        let toml_str = r#"device_url = "http://growlab.local""#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.device_url, "http://growlab.local");
        assert_eq!(config.api_base_url, "api/v1");
        assert_eq!(config.telemetry_interval_secs, 10);
        assert_eq!(config.base_url(), "http://growlab.local/api/v1");
    }

    #[test]
    fn descriptors_follow_config() {
        let config = Config {
            telemetry_interval_secs: 2,
            registration_interval_secs: 30,
            ..Config::default()
        };

        let descriptors = config.descriptors().unwrap();
        let names: Vec<&str> = descriptors.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["registration", "telemetry"]);
        assert_eq!(descriptors[0].interval(), Duration::from_secs(30));
        assert_eq!(descriptors[1].interval(), Duration::from_secs(2));
        assert_eq!(descriptors[1].path(), "/telemetry");
    }

    #[test]
    fn zero_interval_rejected() {
        let config = Config {
            telemetry_interval_secs: 0,
            ..Config::default()
        };
        assert_eq!(
            config.descriptors().unwrap_err(),
            DescriptorError::ZeroInterval("telemetry".into())
        );
    }

    #[test]
    fn zero_timeout_falls_back_to_default() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), REQUEST_TIMEOUT);
    }

    #[test]
    fn load_creates_default_when_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("growlab").join("dashboard.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.device_url, DEFAULT_DEVICE_URL);
        assert!(path.exists());
    }

    #[test]
    fn config_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("dashboard.toml");

        let config = Config {
            device_url: "http://10.0.0.42".into(),
            telemetry_interval_secs: 3,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.device_url, "http://10.0.0.42");
        assert_eq!(loaded.telemetry_interval_secs, 3);
        assert_eq!(loaded.registration_interval_secs, 60);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("dashboard.toml");
        std::fs::write(&path, "telemetry_interval_secs = \"soon\"").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn config_path_not_empty() {
        let path = config_path().unwrap();
        assert!(path.to_string_lossy().contains("growlab"));
    }
}
