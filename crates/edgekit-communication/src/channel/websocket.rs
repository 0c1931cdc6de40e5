//! WebSocket transport for the monitoring channel
//!
//! Holds the one live connection to the device's status service:
//! connects with a bounded wait, announces readiness, forwards inbound
//! status payloads to the caller's handler, and funnels all outbound
//! control events through a single ordered writer task.
//!
//! Reconnection is not automatic; if the channel drops, the caller
//! reconnects explicitly.

use crate::channel::protocol::{parse_frame, ControlEvent, DeviceEvent};
use crate::channel::ControlChannel;
use crate::status::record::StatusRecord;
use async_trait::async_trait;
use edgekit_core::{ChannelError, Result};
use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Handler invoked once per inbound status message
///
/// Receives the raw payload string; normalization is the caller's job.
pub type StatusHandler = dyn Fn(String) + Send + Sync;

/// The live channel to the device's status service
///
/// Owned exclusively by one job session; dropped (or disconnected)
/// before any new channel is created.
#[derive(Debug)]
pub struct MonitorChannel {
    endpoint: String,
    control_tx: mpsc::Sender<ControlEvent>,
    closed: Arc<AtomicBool>,
    writer_task: JoinHandle<()>,
    reader_task: JoinHandle<()>,
}

impl MonitorChannel {
    /// Establish the channel and announce readiness
    ///
    /// The connect is bounded by `timeout`; exceeding it fails with
    /// `ChannelError::ConnectTimeout` instead of spinning forever. On
    /// success the announce frame has already been written, so the
    /// device starts publishing immediately.
    pub async fn connect(
        url: &str,
        timeout: Duration,
        on_status: impl Fn(String) + Send + Sync + 'static,
    ) -> Result<Self> {
        let connect = connect_async(url);
        let (ws, _) = tokio::time::timeout(timeout, connect)
            .await
            .map_err(|_| ChannelError::ConnectTimeout {
                timeout_ms: timeout.as_millis() as u64,
            })?
            .map_err(|e| ChannelError::ConnectFailed {
                address: url.to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!("Monitoring channel connected to {}", url);

        let (mut sink, mut stream) = ws.split();

        // Announce before anything else so the device begins publishing.
        let announce = ControlEvent::Announce.to_frame()?;
        sink.send(Message::Text(announce))
            .await
            .map_err(|e| ChannelError::Send {
                event: ControlEvent::Announce.name().to_string(),
                reason: e.to_string(),
            })?;

        let closed = Arc::new(AtomicBool::new(false));

        // One writer consuming a FIFO queue: end-run/end-job enqueued
        // before a disconnect always reach the transport first.
        let (control_tx, mut control_rx) = mpsc::channel::<ControlEvent>(16);
        let writer_task = tokio::spawn(async move {
            while let Some(event) = control_rx.recv().await {
                let name = event.name();
                let teardown = matches!(event, ControlEvent::DisconnectRequest);
                match event.to_frame() {
                    Ok(frame) => {
                        if let Err(e) = sink.send(Message::Text(frame)).await {
                            tracing::warn!("Failed to send '{}': {}", name, e);
                            break;
                        }
                        tracing::debug!("Sent '{}' control event", name);
                    }
                    Err(e) => {
                        tracing::error!("Failed to serialize '{}': {}", name, e);
                    }
                }
                if teardown {
                    let _ = sink.close().await;
                    break;
                }
            }
        });

        let reader_closed = closed.clone();
        let reader_task = tokio::spawn(async move {
            while let Some(message) = stream.next().await {
                match message {
                    Ok(Message::Text(text)) => match parse_frame(&text) {
                        Ok(DeviceEvent::Status(raw)) => {
                            // A status frame racing a disconnect updates
                            // nothing; the session is being torn down.
                            if reader_closed.load(Ordering::SeqCst) {
                                tracing::debug!("Dropping status received after disconnect");
                                continue;
                            }
                            on_status(raw);
                        }
                        Ok(DeviceEvent::DisconnectAck) => {
                            tracing::debug!("Device acknowledged disconnect");
                            break;
                        }
                        Ok(DeviceEvent::Other(name)) => {
                            tracing::debug!("Ignoring '{}' event", name);
                        }
                        Err(e) => {
                            tracing::warn!("Unreadable frame from device: {}", e);
                        }
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {} // ping/pong/binary
                    Err(e) => {
                        tracing::warn!("Monitoring channel read error: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(Self {
            endpoint: url.to_string(),
            control_tx,
            closed,
            writer_task,
            reader_task,
        })
    }

    /// The endpoint this channel is connected to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send_control(&self, event: ControlEvent) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ChannelError::Closed.into());
        }
        let name = event.name();
        self.control_tx
            .send(event)
            .await
            .map_err(|_| ChannelError::Send {
                event: name.to_string(),
                reason: "writer task gone".to_string(),
            })?;
        Ok(())
    }
}

#[async_trait]
impl ControlChannel for MonitorChannel {
    async fn send_end_run(&self) -> Result<()> {
        self.send_control(ControlEvent::EndRun).await
    }

    async fn send_end_job(&self, record: &StatusRecord) -> Result<()> {
        self.send_control(ControlEvent::EndJob(record.clone()))
            .await
    }

    async fn disconnect(&self) -> Result<()> {
        // Close first so no further control events can queue behind the
        // disconnect; everything enqueued earlier still precedes it.
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(ChannelError::Closed.into());
        }
        self.control_tx
            .send(ControlEvent::DisconnectRequest)
            .await
            .map_err(|_| ChannelError::Send {
                event: ControlEvent::DisconnectRequest.name().to_string(),
                reason: "writer task gone".to_string(),
            })?;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Drop for MonitorChannel {
    fn drop(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
        self.reader_task.abort();
        // The writer is not aborted: it drains any queued control
        // events (including a pending disconnect request), then exits
        // once the sender side is dropped with the channel.
        let _ = &self.writer_task;
    }
}
