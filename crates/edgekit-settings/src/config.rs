//! Device configuration for EdgeKit
//!
//! The device address is supplied out of band and injected into the
//! uploader and the monitoring session at construction; nothing reads
//! it from ambient mutable state. Supports JSON and TOML files stored
//! in the platform config directory, with an environment override for
//! the host.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the configured device host
pub const DEVICE_HOST_ENV: &str = "EDGEKIT_DEVICE_HOST";

/// Settings error type
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Config file could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The config file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Config file contents could not be parsed
    #[error("Failed to parse {path}: {reason}")]
    Parse {
        /// The config file path.
        path: PathBuf,
        /// The parse failure.
        reason: String,
    },

    /// Config values failed validation
    #[error("Invalid configuration: {reason}")]
    Invalid {
        /// What was wrong.
        reason: String,
    },
}

/// Connection settings for one edge device
///
/// Port A serves the file upload endpoint, port B the monitoring
/// channel. Both live on the same host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Device host name or IP address
    pub host: String,
    /// HTTP port for job-configuration upload
    pub upload_port: u16,
    /// WebSocket port for the monitoring channel
    pub monitor_port: u16,
    /// Bounded wait for channel establishment, in milliseconds
    pub connect_timeout_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            upload_port: 8081,
            monitor_port: 8080,
            connect_timeout_ms: 5000,
        }
    }
}

impl DeviceConfig {
    /// Create a config for the given host with default ports
    pub fn for_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Full URL of the upload endpoint
    pub fn upload_url(&self) -> String {
        format!("http://{}:{}/uploadfile", self.host, self.upload_port)
    }

    /// Full URL of the monitoring channel endpoint
    pub fn monitor_url(&self) -> String {
        format!("ws://{}:{}/", self.host, self.monitor_port)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.host.trim().is_empty() {
            return Err(SettingsError::Invalid {
                reason: "device host must not be empty".to_string(),
            });
        }
        if self.connect_timeout_ms == 0 {
            return Err(SettingsError::Invalid {
                reason: "connect timeout must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    /// Apply the `EDGEKIT_DEVICE_HOST` environment override, if set
    pub fn with_env_override(mut self) -> Self {
        if let Ok(host) = std::env::var(DEVICE_HOST_ENV) {
            if !host.trim().is_empty() {
                tracing::info!("Device host overridden from {}: {}", DEVICE_HOST_ENV, host);
                self.host = host;
            }
        }
        self
    }

    /// Load configuration from a JSON or TOML file
    ///
    /// The format is picked from the file extension; anything that is
    /// not `toml` is treated as JSON.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content).map_err(|e| SettingsError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| SettingsError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default config file location in the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("edgekit").join("device.json"))
    }

    /// Load from the default location, falling back to defaults
    ///
    /// A missing file is not an error; a present-but-broken file is
    /// logged and replaced by defaults so the operator can still type a
    /// host by hand.
    pub fn load_default() -> Self {
        let config = match Self::default_path() {
            Some(path) if path.exists() => match Self::load(&path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Ignoring unreadable config: {}", e);
                    Self::default()
                }
            },
            _ => Self::default(),
        };
        config.with_env_override()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls_from_host_and_ports() {
        let config = DeviceConfig::for_host("192.168.4.20");
        assert_eq!(config.upload_url(), "http://192.168.4.20:8081/uploadfile");
        assert_eq!(config.monitor_url(), "ws://192.168.4.20:8080/");
    }

    #[test]
    fn empty_host_fails_validation() {
        let config = DeviceConfig::for_host("  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device.json");
        let config = DeviceConfig::for_host("edge-01.local");
        config.save(&path).unwrap();
        assert_eq!(DeviceConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn toml_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device.toml");
        std::fs::write(
            &path,
            "host = \"edge-02.local\"\nupload_port = 9081\nmonitor_port = 9080\nconnect_timeout_ms = 2500\n",
        )
        .unwrap();
        let config = DeviceConfig::load(&path).unwrap();
        assert_eq!(config.host, "edge-02.local");
        assert_eq!(config.upload_port, 9081);
        assert_eq!(config.monitor_port, 9080);
        assert_eq!(config.connect_timeout_ms, 2500);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device.json");
        std::fs::write(&path, "{\"host\": \"edge-03.local\"}").unwrap();
        let config = DeviceConfig::load(&path).unwrap();
        assert_eq!(config.host, "edge-03.local");
        assert_eq!(config.upload_port, 8081);
    }
}
