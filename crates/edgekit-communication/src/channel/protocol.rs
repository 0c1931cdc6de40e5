//! Monitoring-channel wire protocol
//!
//! JSON event envelope `{"event": <name>, "data": <payload>}` carrying
//! the device service's named control/status events. Outbound frames
//! are built here; inbound frames are parsed here. The channel itself
//! never looks inside a status payload.

use crate::status::record::StatusRecord;
use edgekit_core::ChannelError;
use serde_json::json;

/// client→device: subscribe/announce, asks the device to start publishing
pub const EVENT_ANNOUNCE: &str = "publish_msg";
/// device→client: one status update carrying the raw payload string
pub const EVENT_STATUS: &str = "ipc_response";
/// client→device: stop the current run, keep the job
pub const EVENT_END_RUN: &str = "end_run";
/// client→device: terminate the job, carries the last status record
pub const EVENT_END_JOB: &str = "end_job";
/// client→device: ask the device to drop the connection
pub const EVENT_DISCONNECT_REQUEST: &str = "disconnect_request";
/// device→client: disconnect acknowledgement
pub const EVENT_DISCONNECT_ACK: &str = "disconnect";

/// A control event emitted by the client
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// Announce readiness; the device starts publishing status
    Announce,
    /// End the current run, prepare for the next run on the same job
    EndRun,
    /// End the job, carrying the last known status record
    EndJob(StatusRecord),
    /// Request channel teardown
    DisconnectRequest,
}

impl ControlEvent {
    /// Wire name of this event
    pub fn name(&self) -> &'static str {
        match self {
            ControlEvent::Announce => EVENT_ANNOUNCE,
            ControlEvent::EndRun => EVENT_END_RUN,
            ControlEvent::EndJob(_) => EVENT_END_JOB,
            ControlEvent::DisconnectRequest => EVENT_DISCONNECT_REQUEST,
        }
    }

    /// Serialize to a wire frame
    pub fn to_frame(&self) -> Result<String, ChannelError> {
        let frame = match self {
            // The announce payload is an empty data field, as the
            // device service expects.
            ControlEvent::Announce => json!({ "event": EVENT_ANNOUNCE, "data": { "data": "" } }),
            ControlEvent::EndRun => json!({ "event": EVENT_END_RUN }),
            ControlEvent::EndJob(record) => {
                let payload = serde_json::to_value(record).map_err(|e| ChannelError::Send {
                    event: EVENT_END_JOB.to_string(),
                    reason: e.to_string(),
                })?;
                json!({ "event": EVENT_END_JOB, "data": payload })
            }
            ControlEvent::DisconnectRequest => json!({ "event": EVENT_DISCONNECT_REQUEST }),
        };
        Ok(frame.to_string())
    }
}

/// An event received from the device
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// A status update; the raw payload string, uninterpreted
    Status(String),
    /// The device acknowledged a disconnect request
    DisconnectAck,
    /// Any other named event; ignored by the channel
    Other(String),
}

/// Parse an inbound wire frame
pub fn parse_frame(text: &str) -> Result<DeviceEvent, ChannelError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ChannelError::WebSocket {
            reason: format!("unreadable frame: {}", e),
        })?;

    let event = value
        .get("event")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ChannelError::WebSocket {
            reason: "frame has no event name".to_string(),
        })?;

    match event {
        EVENT_STATUS => {
            let raw = value
                .get("data")
                .and_then(|d| d.get("data"))
                .and_then(|d| d.as_str())
                .ok_or_else(|| ChannelError::WebSocket {
                    reason: "status frame has no payload".to_string(),
                })?;
            Ok(DeviceEvent::Status(raw.to_string()))
        }
        EVENT_DISCONNECT_ACK => Ok(DeviceEvent::DisconnectAck),
        other => Ok(DeviceEvent::Other(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::normalizer::normalize;

    #[test]
    fn announce_frame_has_empty_data() {
        let frame = ControlEvent::Announce.to_frame().unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["event"], "publish_msg");
        assert_eq!(value["data"]["data"], "");
    }

    #[test]
    fn end_run_frame_has_no_payload() {
        let frame = ControlEvent::EndRun.to_frame().unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["event"], "end_run");
        assert!(value.get("data").is_none());
    }

    #[test]
    fn end_job_frame_carries_record() {
        let record = normalize(
            "{'Operating Parameters': {'quality_control': 'Passed', \
             'tool_status': 'running', 'message': {'Job continues': \
             {'Site Environment': 'OK', 'Recommended Action': 'None'}}}, \
             'Sensor Data': {'power_curve': '350', 'lv_activepower': '250', \
             'wind_speed': '9', 'wind_direction': '210'}}",
        )
        .unwrap();

        let frame = ControlEvent::EndJob(record).to_frame().unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["event"], "end_job");
        assert_eq!(
            value["data"]["Operating Parameters"]["quality_control"],
            "Passed"
        );
    }

    #[test]
    fn parses_status_frame() {
        let frame = r#"{"event": "ipc_response", "data": {"data": "{'k': 'v'}"}}"#;
        assert_eq!(
            parse_frame(frame).unwrap(),
            DeviceEvent::Status("{'k': 'v'}".to_string())
        );
    }

    #[test]
    fn parses_disconnect_ack() {
        assert_eq!(
            parse_frame(r#"{"event": "disconnect"}"#).unwrap(),
            DeviceEvent::DisconnectAck
        );
    }

    #[test]
    fn unknown_events_pass_through_as_other() {
        assert_eq!(
            parse_frame(r#"{"event": "my_response", "data": {"data": "Connected"}}"#).unwrap(),
            DeviceEvent::Other("my_response".to_string())
        );
    }

    #[test]
    fn rejects_frames_without_event_name() {
        assert!(parse_frame(r#"{"data": 1}"#).is_err());
        assert!(parse_frame("not json").is_err());
    }
}
