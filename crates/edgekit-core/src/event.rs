//! Event system for job-session notifications
//!
//! Provides:
//! - Event types for session lifecycle and snapshot changes
//! - Event dispatcher for publishing events to subscribers

use crate::session_state::SessionState;
use tokio::sync::broadcast;

/// Session event types
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Channel established to the given monitoring endpoint
    Connected(String),
    /// Channel torn down
    Disconnected,
    /// Session state changed
    StateChanged(SessionState),
    /// A status message was applied; consumers read the new snapshot
    /// from the session. The summary here drives pass/fail visuals.
    SnapshotUpdated {
        /// The current-check key extracted from the message.
        check_key: String,
        /// Whether the check key is the job-continues sentinel.
        job_continuing: bool,
    },
    /// The latest status message could not be applied
    SnapshotRejected(String),
    /// Non-fatal error surfaced to the operator
    Error(String),
}

impl std::fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionEvent::Connected(endpoint) => write!(f, "Connected to {}", endpoint),
            SessionEvent::Disconnected => write!(f, "Disconnected"),
            SessionEvent::StateChanged(state) => write!(f, "State: {}", state),
            SessionEvent::SnapshotUpdated {
                check_key,
                job_continuing,
            } => write!(
                f,
                "Status: {} ({})",
                check_key,
                if *job_continuing { "pass" } else { "attention" }
            ),
            SessionEvent::SnapshotRejected(reason) => write!(f, "Status rejected: {}", reason),
            SessionEvent::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}

/// Event dispatcher for publishing session events to subscribers
#[derive(Clone)]
pub struct EventDispatcher {
    /// Broadcast sender channel for session events.
    tx: broadcast::Sender<SessionEvent>,
}

impl EventDispatcher {
    /// Create a new event dispatcher
    ///
    /// # Arguments
    /// * `buffer_size` - Size of the broadcast buffer (default 100)
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size);
        Self { tx }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to all subscribers
    ///
    /// Publishing with no subscribers is not an error; the session must
    /// keep running whether or not anything is watching.
    pub fn publish(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new(100)
    }
}
