//! Canonical status record
//!
//! The typed shape every device status message is parsed into. The
//! record is replaced wholesale on each message and never mutated in
//! place; display code reads it through a `StatusSnapshot`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One parsed status message from the device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Device-local timestamp, passed through verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Quality-control verdict, turbine status and the current check
    #[serde(rename = "Operating Parameters")]
    pub operating_parameters: OperatingParameters,

    /// Live sensor telemetry
    #[serde(rename = "Sensor Data")]
    pub sensor_data: SensorData,
}

/// The `"Operating Parameters"` section of a status record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingParameters {
    /// Quality-control verdict (e.g. "Passed", "Action Needed")
    pub quality_control: String,

    /// Turbine status (e.g. "running", "stopped")
    pub tool_status: String,

    /// Exactly one entry: the current-check key mapped to its detail.
    /// A BTreeMap keeps iteration deterministic; the single-key
    /// invariant is enforced by the extractor, not here.
    pub message: BTreeMap<String, CheckDetail>,
}

/// Detail record behind the current-check key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckDetail {
    /// Site environment note for the active checkpoint
    #[serde(rename = "Site Environment")]
    pub site_environment: String,

    /// Recommended operator action ("None" when nothing is required)
    #[serde(rename = "Recommended Action")]
    pub recommended_action: String,
}

/// The `"Sensor Data"` section of a status record
///
/// The device publishes all readings as strings; they are rendered
/// verbatim, so no numeric conversion happens here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorData {
    /// Power curve reading (kWh)
    pub power_curve: String,

    /// LV active power reading (kW)
    pub lv_activepower: String,

    /// Wind speed reading (mph)
    pub wind_speed: String,

    /// Wind direction reading (degrees)
    pub wind_direction: String,
}
