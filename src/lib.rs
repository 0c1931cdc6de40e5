//! # EdgeKit
//!
//! Operator console for edge-device inspection jobs: upload a run
//! configuration to a locally-networked device, then monitor the job's
//! live status (quality-control verdict, turbine health, sensor
//! telemetry) until the run or the job is explicitly ended.
//!
//! ## Architecture
//!
//! EdgeKit is organized as a workspace with multiple crates:
//!
//! 1. **edgekit-core** - Errors, session states, events, listeners
//! 2. **edgekit-settings** - Injected device configuration
//! 3. **edgekit-communication** - Status normalization, monitoring
//!    channel, job-session state machine
//! 4. **edgekit-uploader** - Job-configuration file submission
//! 5. **edgekit** - Main binary that integrates all crates

pub use edgekit_communication::{
    current_check_key, is_job_continuing, normalize, repair_python_repr, CheckDetail,
    ControlChannel, ControlEvent, DeviceEvent, JobSession, MonitorChannel, OperatingParameters,
    SensorData, StatusRecord, StatusSnapshot, JOB_CONTINUES_KEY,
};

pub use edgekit_core::{
    ChannelError, Error, EventDispatcher, PayloadError, Result, SessionError, SessionEvent,
    SessionListener, SessionState, UploadError,
};

pub use edgekit_settings::{DeviceConfig, SettingsError, DEVICE_HOST_ENV};

pub use edgekit_uploader::{validate_file_type, JobUploader, UploadAck};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr (stdout belongs to the status display)
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
