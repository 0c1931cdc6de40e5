//! Status payload normalization
//!
//! The device publishes status messages as Python-repr text rather than
//! JSON: single-quoted strings, capitalized booleans, bare `None`
//! literals. This module repairs that text and parses it into the typed
//! [`StatusRecord`].
//!
//! The repairs are purely textual. If the device payload format ever
//! changes in a way that lets these substitutions corrupt legitimate
//! content, this is the one place to swap in a real structured protocol;
//! no caller sees anything but the typed record.

use crate::status::record::StatusRecord;
use edgekit_core::PayloadError;

/// Repair a Python-repr payload into JSON-compatible text
///
/// Applies, in order:
/// 1. single quotes become double quotes,
/// 2. `True`/`False` become lowercase boolean literals,
/// 3. bare `None` values become the quoted string `"None"`.
pub fn repair_python_repr(raw: &str) -> String {
    raw.replace('\'', "\"")
        .replace("True", "true")
        .replace("False", "false")
        .replace(": None", ": \"None\"")
}

/// Normalize a raw device status message into a canonical record
///
/// Fails with [`PayloadError::Malformed`] when the repaired text is not
/// valid JSON or does not match the expected record shape.
pub fn normalize(raw: &str) -> Result<StatusRecord, PayloadError> {
    let repaired = repair_python_repr(raw);
    serde_json::from_str(&repaired).map_err(|e| PayloadError::Malformed {
        reason: e.to_string(),
    })
}
