//! Snapshot payloads of the hub's JSON API (`getstatus`, `getcontrol`).

use serde::{Deserialize, Serialize};

use crate::control::DeviceControls;
use crate::error::PayloadError;
use crate::record::DeviceRecord;

/// Body of a `getstatus` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Version", default)]
    pub version: String,
    #[serde(rename = "Devices", default)]
    pub devices: Vec<DeviceRecord>,
}

/// `getcontrol` answers either with a bare list or wrapped in `Devices`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ControlResponse {
    List(Vec<DeviceControls>),
    Wrapped {
        #[serde(rename = "Devices")]
        devices: Vec<DeviceControls>,
    },
}

/// Parse a `getstatus` body.
///
/// # Errors
///
/// Returns [`PayloadError::Json`] when the body is not a valid status payload.
pub fn parse_status(json: &str) -> Result<StatusResponse, PayloadError> {
    serde_json::from_str(json).map_err(|source| PayloadError::Json {
        kind: "status",
        source,
    })
}

/// Parse a `getcontrol` body.
///
/// # Errors
///
/// Returns [`PayloadError::Json`] when the body is not a valid control payload.
pub fn parse_control(json: &str) -> Result<Vec<DeviceControls>, PayloadError> {
    let response: ControlResponse =
        serde_json::from_str(json).map_err(|source| PayloadError::Json {
            kind: "control",
            source,
        })?;
    Ok(match response {
        ControlResponse::List(devices) | ControlResponse::Wrapped { devices } => devices,
    })
}
