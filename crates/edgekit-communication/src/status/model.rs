//! Status model extraction
//!
//! Derives the display-ready facts from a canonical status record: the
//! current-check key, the pass/fail continuation flag, and a snapshot
//! the rendering layer can read without re-deriving anything.

use crate::status::record::{CheckDetail, StatusRecord};
use edgekit_core::PayloadError;

/// The sentinel check key meaning "job continues"
///
/// Drives all pass/fail visual semantics. Any other key means the
/// checkpoint needs operator attention.
pub const JOB_CONTINUES_KEY: &str = "Job continues";

/// Extract the single current-check key from a record
///
/// Fails with [`PayloadError::MissingCheckKey`] unless the `message`
/// section has exactly one key; zero or multiple keys are never guessed
/// at.
pub fn current_check_key(record: &StatusRecord) -> Result<&str, PayloadError> {
    let message = &record.operating_parameters.message;
    if message.len() != 1 {
        return Err(PayloadError::MissingCheckKey {
            found: message.len(),
        });
    }
    // len() == 1 guarantees the first key exists
    Ok(message
        .keys()
        .next()
        .map(String::as_str)
        .unwrap_or_default())
}

/// Whether the given check key is the job-continues sentinel
pub fn is_job_continuing(check_key: &str) -> bool {
    check_key == JOB_CONTINUES_KEY
}

/// One rendering-ready view of the latest status message
///
/// Built exactly once per inbound message; the check key and
/// continuation flag are computed here and nowhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    /// The canonical record this snapshot was derived from
    pub record: StatusRecord,
    /// The current-check key
    pub check_key: String,
    /// True when the check key is the job-continues sentinel
    pub job_continuing: bool,
}

impl StatusSnapshot {
    /// Derive a snapshot from a record, taking ownership
    pub fn from_record(record: StatusRecord) -> Result<Self, PayloadError> {
        let check_key = current_check_key(&record)?.to_string();
        let job_continuing = is_job_continuing(&check_key);
        Ok(Self {
            record,
            check_key,
            job_continuing,
        })
    }

    /// Quality-control verdict banner text
    pub fn quality_control(&self) -> &str {
        &self.record.operating_parameters.quality_control
    }

    /// Turbine status text
    pub fn tool_status(&self) -> &str {
        &self.record.operating_parameters.tool_status
    }

    /// Detail record behind the current check
    pub fn check_detail(&self) -> &CheckDetail {
        &self.record.operating_parameters.message[&self.check_key]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::record::{OperatingParameters, SensorData};
    use std::collections::BTreeMap;

    fn record_with_keys(keys: &[&str]) -> StatusRecord {
        let message: BTreeMap<String, CheckDetail> = keys
            .iter()
            .map(|key| {
                (
                    key.to_string(),
                    CheckDetail {
                        site_environment: "OK".to_string(),
                        recommended_action: "None".to_string(),
                    },
                )
            })
            .collect();

        StatusRecord {
            timestamp: None,
            operating_parameters: OperatingParameters {
                quality_control: "Passed".to_string(),
                tool_status: "running".to_string(),
                message,
            },
            sensor_data: SensorData {
                power_curve: "351".to_string(),
                lv_activepower: "240.80".to_string(),
                wind_speed: "10.22".to_string(),
                wind_direction: "198.4".to_string(),
            },
        }
    }

    #[test]
    fn extracts_single_key() {
        let record = record_with_keys(&["Job continues"]);
        assert_eq!(current_check_key(&record).unwrap(), "Job continues");
    }

    #[test]
    fn extraction_is_idempotent() {
        let record = record_with_keys(&["Restart the job"]);
        let first = current_check_key(&record).unwrap().to_string();
        let second = current_check_key(&record).unwrap().to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn zero_keys_fail_explicitly() {
        let record = record_with_keys(&[]);
        assert_eq!(
            current_check_key(&record).unwrap_err(),
            PayloadError::MissingCheckKey { found: 0 }
        );
    }

    #[test]
    fn multiple_keys_fail_explicitly() {
        let record = record_with_keys(&["Job continues", "Restart the job"]);
        assert_eq!(
            current_check_key(&record).unwrap_err(),
            PayloadError::MissingCheckKey { found: 2 }
        );
    }

    #[test]
    fn sentinel_key_means_continuing() {
        assert!(is_job_continuing("Job continues"));
        assert!(!is_job_continuing("Restart the job"));
        assert!(!is_job_continuing("job continues"));
    }

    #[test]
    fn snapshot_computes_flag_once() {
        let snapshot = StatusSnapshot::from_record(record_with_keys(&["Job continues"])).unwrap();
        assert!(snapshot.job_continuing);
        assert_eq!(snapshot.check_key, "Job continues");
        assert_eq!(snapshot.quality_control(), "Passed");
        assert_eq!(snapshot.check_detail().site_environment, "OK");

        let snapshot = StatusSnapshot::from_record(record_with_keys(&["Restart the job"])).unwrap();
        assert!(!snapshot.job_continuing);
    }
}
