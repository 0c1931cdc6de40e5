//! Job-session state machine
//!
//! Sequences the UI-visible lifecycle of one monitoring session:
//! Idle → Connecting → Monitoring → ConfirmingEndRun → ConfirmingEndJob
//! → Terminated (end job) or back to Idle (start another run). Owns the
//! latest status snapshot and the channel handle, and publishes every
//! change on the event dispatcher.
//!
//! The two-step confirmation is modeled as explicit named states rather
//! than a dialog flag: the first confirmation re-frames the question
//! from "end this run?" to "end the whole job, or start another run?".

use crate::channel::{ControlChannel, MonitorChannel};
use crate::status::model::StatusSnapshot;
use crate::status::normalizer::normalize;
use edgekit_core::{
    EventDispatcher, Result, SessionError, SessionEvent, SessionListener, SessionState,
};
use edgekit_settings::DeviceConfig;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// One job-monitoring session against a configured device
///
/// Cheap to clone; clones share the same state, snapshot and channel.
#[derive(Clone)]
pub struct JobSession {
    config: DeviceConfig,
    state: Arc<RwLock<SessionState>>,
    snapshot: Arc<RwLock<Option<StatusSnapshot>>>,
    channel: Arc<RwLock<Option<Arc<dyn ControlChannel>>>>,
    events: EventDispatcher,
}

impl JobSession {
    /// Create a session for the given device; no channel is opened yet
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(SessionState::Idle)),
            snapshot: Arc::new(RwLock::new(None)),
            channel: Arc::new(RwLock::new(None)),
            events: EventDispatcher::default(),
        }
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    /// Latest status snapshot, if any message has been applied
    pub fn snapshot(&self) -> Option<StatusSnapshot> {
        self.snapshot.read().clone()
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Forward session events to a listener
    ///
    /// Spawns a task that relays events until the session (and every
    /// clone of it) is dropped. The returned handle can be aborted to
    /// detach the listener early.
    pub fn add_listener(&self, listener: Arc<dyn SessionListener>) -> tokio::task::JoinHandle<()> {
        let mut events = self.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(SessionEvent::StateChanged(state)) => listener.on_state_changed(state).await,
                    Ok(SessionEvent::SnapshotUpdated {
                        check_key,
                        job_continuing,
                    }) => listener.on_snapshot(&check_key, job_continuing).await,
                    Ok(SessionEvent::Error(message)) => listener.on_error(&message).await,
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("Listener lagged, {} events skipped", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    fn set_state(&self, new_state: SessionState) {
        *self.state.write() = new_state;
        self.events.publish(SessionEvent::StateChanged(new_state));
    }

    fn invalid(&self, action: &str) -> SessionError {
        SessionError::InvalidTransition {
            current: self.state().to_string(),
            action: action.to_string(),
        }
    }

    /// Open the monitoring channel to the configured device
    ///
    /// Only callable while no channel is open; a session holds at most
    /// one live handle, and the old one must be released first.
    pub async fn connect(&self) -> Result<()> {
        {
            let mut state = self.state.write();
            if !matches!(*state, SessionState::Idle | SessionState::Connecting) {
                return Err(SessionError::AlreadyConnected.into());
            }
            if self.channel.read().is_some() {
                return Err(SessionError::AlreadyConnected.into());
            }
            *state = SessionState::Connecting;
        }
        self.events
            .publish(SessionEvent::StateChanged(SessionState::Connecting));

        let url = self.config.monitor_url();
        let timeout = Duration::from_millis(self.config.connect_timeout_ms);
        let handler_session = self.clone();
        let channel =
            MonitorChannel::connect(&url, timeout, move |raw| handler_session.handle_status(&raw))
                .await;

        match channel {
            Ok(channel) => {
                self.attach_channel(Arc::new(channel))?;
                self.events.publish(SessionEvent::Connected(url));
                Ok(())
            }
            Err(e) => {
                // Surface to the operator, return to a reconnectable state.
                self.set_state(SessionState::Idle);
                self.events.publish(SessionEvent::Error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Attach an already-established channel and start monitoring
    ///
    /// Seam for transports other than the default WebSocket channel and
    /// for tests; `connect` uses it internally. The attached channel's
    /// status handler is expected to call [`JobSession::handle_status`].
    pub fn attach_channel(&self, channel: Arc<dyn ControlChannel>) -> Result<()> {
        {
            let mut slot = self.channel.write();
            if slot.is_some() {
                return Err(SessionError::AlreadyConnected.into());
            }
            *slot = Some(channel);
        }
        self.set_state(SessionState::Monitoring);
        Ok(())
    }

    /// Apply one inbound raw status message
    ///
    /// Replaces the snapshot while monitoring (dialog open included);
    /// accepted but ignored in every other state. Normalization and
    /// extraction failures degrade the display instead of aborting the
    /// session: a malformed payload leaves the snapshot unchanged, a
    /// record with no interpretable check clears it.
    pub fn handle_status(&self, raw: &str) {
        let state = self.state();
        if !state.accepts_status() {
            tracing::trace!("Ignoring status message while {}", state);
            return;
        }

        let record = match normalize(raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Discarding malformed status payload: {}", e);
                self.events
                    .publish(SessionEvent::SnapshotRejected(e.to_string()));
                return;
            }
        };

        match StatusSnapshot::from_record(record) {
            Ok(snapshot) => {
                self.events.publish(SessionEvent::SnapshotUpdated {
                    check_key: snapshot.check_key.clone(),
                    job_continuing: snapshot.job_continuing,
                });
                *self.snapshot.write() = Some(snapshot);
            }
            Err(e) => {
                tracing::warn!("Status record has no interpretable check: {}", e);
                *self.snapshot.write() = None;
                self.events
                    .publish(SessionEvent::SnapshotRejected(e.to_string()));
            }
        }
    }

    /// Operator opened the end dialog (framed as "end run")
    pub fn open_end_dialog(&self) -> Result<()> {
        let mut state = self.state.write();
        if *state != SessionState::Monitoring {
            drop(state);
            return Err(self.invalid("open the end dialog").into());
        }
        *state = SessionState::ConfirmingEndRun;
        drop(state);
        self.events
            .publish(SessionEvent::StateChanged(SessionState::ConfirmingEndRun));
        Ok(())
    }

    /// Operator dismissed the dialog; back to monitoring, no traffic
    pub fn cancel_end_dialog(&self) -> Result<()> {
        let mut state = self.state.write();
        if *state != SessionState::ConfirmingEndRun {
            drop(state);
            return Err(self.invalid("cancel the end dialog").into());
        }
        *state = SessionState::Monitoring;
        drop(state);
        self.events
            .publish(SessionEvent::StateChanged(SessionState::Monitoring));
        Ok(())
    }

    /// First confirmation; escalates to the end-job question
    pub fn confirm_end_run(&self) -> Result<()> {
        let mut state = self.state.write();
        if *state != SessionState::ConfirmingEndRun {
            drop(state);
            return Err(self.invalid("confirm ending the run").into());
        }
        *state = SessionState::ConfirmingEndJob;
        drop(state);
        self.events
            .publish(SessionEvent::StateChanged(SessionState::ConfirmingEndJob));
        Ok(())
    }

    /// Second confirmation: end the job
    ///
    /// Emits end-job with the latest snapshot, then disconnects; the
    /// session is finished. With no snapshot received yet there is
    /// nothing to report, so the terminal frame is skipped and only the
    /// disconnect goes out.
    pub async fn end_job(&self) -> Result<()> {
        if self.state() != SessionState::ConfirmingEndJob {
            return Err(self.invalid("end the job").into());
        }
        let channel = self.take_channel()?;

        let record = self.snapshot.read().as_ref().map(|s| s.record.clone());
        match record {
            Some(record) => channel.send_end_job(&record).await?,
            None => tracing::warn!("Ending job before any status arrived; no payload to send"),
        }
        channel.disconnect().await?;

        self.set_state(SessionState::Terminated);
        self.events.publish(SessionEvent::Disconnected);
        Ok(())
    }

    /// Second confirmation: keep the job, start another run
    ///
    /// Emits end-run, disconnects, clears the snapshot and returns to
    /// `Idle`, ready for a fresh upload and connect.
    pub async fn start_new_run(&self) -> Result<()> {
        if self.state() != SessionState::ConfirmingEndJob {
            return Err(self.invalid("start another run").into());
        }
        let channel = self.take_channel()?;

        channel.send_end_run().await?;
        channel.disconnect().await?;

        *self.snapshot.write() = None;
        self.set_state(SessionState::Idle);
        self.events.publish(SessionEvent::Disconnected);
        Ok(())
    }

    fn take_channel(&self) -> Result<Arc<dyn ControlChannel>> {
        self.channel
            .write()
            .take()
            .ok_or_else(|| SessionError::NotConnected.into())
    }
}
