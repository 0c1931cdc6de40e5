//! Error handling for EdgeKit
//!
//! Provides error types for all layers of the application:
//! - Payload errors (status-message normalization and extraction)
//! - Channel errors (monitoring-channel lifecycle)
//! - Session errors (job-session state machine violations)
//! - Upload errors (job-configuration submission)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Payload error type
///
/// Represents failures while turning a raw device status message into a
/// canonical status record. These errors are contained at the monitoring
/// boundary: the view degrades, the session keeps running.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// Status message could not be normalized after the repair heuristics
    #[error("Malformed status payload: {reason}")]
    Malformed {
        /// Why the repaired text failed to parse.
        reason: String,
    },

    /// The normalized record carries no interpretable current check
    #[error("Expected exactly one current-check key, found {found}")]
    MissingCheckKey {
        /// How many keys the `message` section actually had.
        found: usize,
    },
}

/// Channel error type
///
/// Represents errors on the persistent monitoring channel to the device.
#[derive(Error, Debug, Clone)]
pub enum ChannelError {
    /// Operation attempted on a torn-down channel
    #[error("Channel closed")]
    Closed,

    /// Low-level connect to the device failed
    #[error("Failed to connect to {address}: {reason}")]
    ConnectFailed {
        /// The monitoring endpoint address.
        address: String,
        /// The reason the connect failed.
        reason: String,
    },

    /// Connect did not complete within the bounded wait
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectTimeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// WebSocket transport error
    #[error("WebSocket error: {reason}")]
    WebSocket {
        /// The reason for the transport error.
        reason: String,
    },

    /// A control frame could not be handed to the writer
    #[error("Failed to send '{event}' control event: {reason}")]
    Send {
        /// The control event name.
        event: String,
        /// The reason the send failed.
        reason: String,
    },
}

/// Session error type
///
/// Represents violations of the job-session state machine.
#[derive(Error, Debug, Clone)]
pub enum SessionError {
    /// A channel is already open for this session
    #[error("Session already connected")]
    AlreadyConnected,

    /// No channel is open for this session
    #[error("Session not connected")]
    NotConnected,

    /// The requested action is not valid in the current state
    #[error("Invalid transition: cannot {action} while {current}")]
    InvalidTransition {
        /// The current session state name.
        current: String,
        /// The action that was requested.
        action: String,
    },
}

/// Upload error type
///
/// Represents failures while submitting a job-configuration file.
/// All upload errors are recoverable: the uploader keeps its prior state
/// and the operator retries by re-submitting.
#[derive(Error, Debug)]
pub enum UploadError {
    /// File rejected client-side before any network call
    #[error("Invalid file type '{extension}': only json files are supported")]
    InvalidFileType {
        /// The offending file extension (empty if none).
        extension: String,
    },

    /// The device answered with a non-success status
    #[error("Upload rejected with status {status}")]
    Rejected {
        /// The HTTP status code.
        status: u16,
    },

    /// Network failure or unreadable acknowledgement
    #[error("Upload failed: {reason}")]
    Failed {
        /// The reason the upload failed.
        reason: String,
    },
}

/// Main error type for EdgeKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Payload error
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// Channel error
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// Session error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Upload error
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a connect timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Channel(ChannelError::ConnectTimeout { .. }))
    }

    /// Check if this is a channel error
    pub fn is_channel_error(&self) -> bool {
        matches!(self, Error::Channel(_))
    }

    /// Check if this is a payload error
    pub fn is_payload_error(&self) -> bool {
        matches!(self, Error::Payload(_))
    }

    /// Check if the operation hit a torn-down channel
    pub fn is_channel_closed(&self) -> bool {
        matches!(self, Error::Channel(ChannelError::Closed))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
