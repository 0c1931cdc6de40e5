//! Status message handling
//!
//! Turns the device's loosely-serialized status payloads into a typed,
//! rendering-ready snapshot: `normalizer` repairs and parses the text,
//! `model` extracts the display facts, `record` holds the typed shape.

pub mod model;
pub mod normalizer;
pub mod record;

pub use model::{current_check_key, is_job_continuing, StatusSnapshot, JOB_CONTINUES_KEY};
pub use normalizer::{normalize, repair_python_repr};
pub use record::{CheckDetail, OperatingParameters, SensorData, StatusRecord};
