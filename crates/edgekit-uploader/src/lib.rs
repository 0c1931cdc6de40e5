//! # EdgeKit Uploader
//!
//! Submits a job-configuration file to the edge device's upload
//! endpoint. Validation happens client-side before any network call;
//! a failed upload leaves nothing half-done, the operator simply
//! re-submits.

use edgekit_core::{Result, UploadError};
use edgekit_settings::DeviceConfig;
use serde::Deserialize;
use std::path::Path;

/// Multipart field name the device's upload service expects
const UPLOAD_FIELD: &str = "filename";

/// Structured acknowledgement returned by the upload endpoint
///
/// Any parseable acknowledgement counts as success; the message text is
/// informational only.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadAck {
    /// Human-readable acknowledgement from the device, if present
    #[serde(default)]
    pub message: Option<String>,
}

/// Validate a candidate job-configuration file by extension
///
/// Only `json` files are accepted; anything else fails with
/// [`UploadError::InvalidFileType`] before any I/O happens.
pub fn validate_file_type(path: &Path) -> std::result::Result<(), UploadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    if extension.eq_ignore_ascii_case("json") {
        Ok(())
    } else {
        Err(UploadError::InvalidFileType {
            extension: extension.to_string(),
        })
    }
}

/// Client for the device's job-configuration upload endpoint
pub struct JobUploader {
    endpoint: String,
    client: reqwest::Client,
}

impl JobUploader {
    /// Create an uploader for the configured device
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            endpoint: config.upload_url(),
            client: reqwest::Client::new(),
        }
    }

    /// The upload endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit a job-configuration file
    ///
    /// Validates the file type first, then POSTs the file as the single
    /// multipart field the device expects. Success is any response body
    /// parseable as an acknowledgement; on success the caller advances
    /// to monitoring. Every failure is recoverable by re-submitting.
    pub async fn upload(&self, path: &Path) -> Result<UploadAck> {
        validate_file_type(path)?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("job.json")
            .to_string();
        let bytes = tokio::fs::read(path).await?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str("application/json")
            .map_err(|e| UploadError::Failed {
                reason: e.to_string(),
            })?;
        let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD, part);

        tracing::info!("Uploading {} to {}", file_name, self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Failed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Rejected {
                status: status.as_u16(),
            }
            .into());
        }

        let ack: UploadAck = response.json().await.map_err(|e| UploadError::Failed {
            reason: format!("unreadable acknowledgement: {}", e),
        })?;
        tracing::info!(
            "Upload acknowledged: {}",
            ack.message.as_deref().unwrap_or("(no message)")
        );
        Ok(ack)
    }
}
