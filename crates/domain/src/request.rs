//! Control requests sent to the hub's JSON API.

use serde::Serialize;

use crate::id::DeviceRef;
use crate::record::DeviceValue;

/// HTTP method a request sender should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// The JSON API `request` verbs this library issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    ControlDeviceByValue,
}

/// Query parameters of a single control request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RequestParams {
    pub request: RequestKind,
    #[serde(rename = "ref")]
    pub device_ref: DeviceRef,
    pub value: DeviceValue,
}

impl RequestParams {
    /// `controldevicebyvalue` for `device_ref`.
    #[must_use]
    pub fn control_by_value(device_ref: DeviceRef, value: impl Into<DeviceValue>) -> Self {
        Self {
            request: RequestKind::ControlDeviceByValue,
            device_ref,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_as_hub_query_parameters() {
        let params = RequestParams::control_by_value(DeviceRef::new(12), 49);
        let json = serde_json::to_value(params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"request": "controldevicebyvalue", "ref": 12, "value": 49})
        );
    }

    #[test]
    fn should_keep_decimal_values() {
        let params = RequestParams::control_by_value(DeviceRef::new(12), 21.5);
        assert_eq!(params.value, DeviceValue::Float(21.5));
    }
}
