//! # EdgeKit Communication
//!
//! Monitoring-channel protocol and job-session logic for EdgeKit.
//! Repairs and parses the device's status payloads, maintains the
//! persistent WebSocket channel, and runs the session state machine.

pub mod channel;
pub mod session;
pub mod status;

pub use channel::{ControlChannel, ControlEvent, DeviceEvent, MonitorChannel};
pub use session::JobSession;
pub use status::{
    current_check_key, is_job_continuing, normalize, repair_python_repr, CheckDetail,
    OperatingParameters, SensorData, StatusRecord, StatusSnapshot, JOB_CONTINUES_KEY,
};
