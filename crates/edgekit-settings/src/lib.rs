//! # EdgeKit Settings
//!
//! Configuration management for EdgeKit.
//! Provides the injected device configuration (host, ports, timeouts)
//! consumed by the uploader and the monitoring session.

pub mod config;

pub use config::{DeviceConfig, SettingsError, DEVICE_HOST_ENV};
