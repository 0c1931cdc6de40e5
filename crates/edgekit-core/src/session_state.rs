//! Job-session lifecycle states
//!
//! The UI-visible lifecycle of one monitoring session. Transitions are
//! driven by the `JobSession` state machine in edgekit-communication.

use serde::{Deserialize, Serialize};

/// State of a job-monitoring session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No channel open; ready to connect
    Idle,
    /// Channel connect in progress
    Connecting,
    /// Receiving live status updates
    Monitoring,
    /// Operator asked to end the run; first confirmation pending
    ConfirmingEndRun,
    /// First confirmation given; deciding between end-job and a new run
    ConfirmingEndJob,
    /// Job ended; session finished
    Terminated,
}

impl SessionState {
    /// Whether a dialog asking for operator confirmation is open
    pub fn is_confirming(&self) -> bool {
        matches!(
            self,
            SessionState::ConfirmingEndRun | SessionState::ConfirmingEndJob
        )
    }

    /// Whether inbound status messages should update the snapshot
    ///
    /// Status keeps flowing while the confirm dialog is open; it is
    /// ignored before connect completes and after termination.
    pub fn accepts_status(&self) -> bool {
        matches!(self, SessionState::Monitoring) || self.is_confirming()
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Connecting => write!(f, "Connecting"),
            SessionState::Monitoring => write!(f, "Monitoring"),
            SessionState::ConfirmingEndRun => write!(f, "ConfirmingEndRun"),
            SessionState::ConfirmingEndJob => write!(f, "ConfirmingEndJob"),
            SessionState::Terminated => write!(f, "Terminated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_acceptance_per_state() {
        assert!(!SessionState::Idle.accepts_status());
        assert!(!SessionState::Connecting.accepts_status());
        assert!(SessionState::Monitoring.accepts_status());
        assert!(SessionState::ConfirmingEndRun.accepts_status());
        assert!(SessionState::ConfirmingEndJob.accepts_status());
        assert!(!SessionState::Terminated.accepts_status());
    }
}
