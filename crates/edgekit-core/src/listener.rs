//! Session listener interface
//!
//! Defines the listener trait for session events

use crate::session_state::SessionState;
use async_trait::async_trait;

/// Listener trait for session events
///
/// Implement this trait to receive notifications of session changes.
/// All methods default to no-ops so implementors pick what they need.
#[async_trait]
pub trait SessionListener: Send + Sync {
    /// Called when the session state changes
    async fn on_state_changed(&self, _new_state: SessionState) {}

    /// Called when a new status snapshot was applied
    async fn on_snapshot(&self, _check_key: &str, _job_continuing: bool) {}

    /// Called when a non-fatal error is surfaced to the operator
    async fn on_error(&self, _message: &str) {}
}
