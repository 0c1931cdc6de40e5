//! Monitoring channel
//!
//! One persistent connection to the device-resident status service per
//! job. `protocol` defines the wire events, `websocket` the transport.
//! The [`ControlChannel`] trait is the seam the session drives, so
//! tests can substitute a recording double for the real socket.

pub mod protocol;
pub mod websocket;

use crate::status::record::StatusRecord;
use async_trait::async_trait;
use edgekit_core::Result;

pub use protocol::{
    parse_frame, ControlEvent, DeviceEvent, EVENT_ANNOUNCE, EVENT_DISCONNECT_ACK,
    EVENT_DISCONNECT_REQUEST, EVENT_END_JOB, EVENT_END_RUN, EVENT_STATUS,
};
pub use websocket::MonitorChannel;

/// Control side of a live channel to the device
///
/// Implementations guarantee that control events reach the transport in
/// call order, and that a pending end-run/end-job emission is never
/// overtaken by a disconnect. All operations fail with
/// `ChannelError::Closed` once the channel is torn down.
#[async_trait]
pub trait ControlChannel: Send + Sync {
    /// Emit the end-run control event (no payload)
    async fn send_end_run(&self) -> Result<()>;

    /// Emit the end-job control event carrying the last status record
    async fn send_end_job(&self, record: &StatusRecord) -> Result<()>;

    /// Emit a disconnect request and tear down the local channel.
    /// The handle is unusable afterwards.
    async fn disconnect(&self) -> Result<()>;

    /// Whether the channel has been torn down
    fn is_closed(&self) -> bool;
}
