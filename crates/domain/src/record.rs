//! Raw device record — the hub's view of a single device.
//!
//! One record is delivered per device in a `getstatus` response and again
//! with every push update. Records are replaced wholesale, never patched.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::id::DeviceRef;
use crate::time::{Timestamp, parse_last_change};

/// Numeric device value, integral or decimal as the hub serialized it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceValue {
    Int(i64),
    Float(f64),
}

/// Largest magnitude at which every integer is exactly representable in an `f64`.
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

impl DeviceValue {
    /// Build a value from a computed number, keeping integral results integral.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < EXACT_INT_LIMIT {
            Self::Int(value as i64)
        } else {
            Self::Float(value)
        }
    }

    /// The value as a float, for arithmetic and comparisons.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    /// Whether the hub reported a decimal value.
    #[must_use]
    pub fn is_decimal(self) -> bool {
        matches!(self, Self::Float(_))
    }
}

impl Default for DeviceValue {
    fn default() -> Self {
        Self::Int(0)
    }
}

impl From<i64> for DeviceValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for DeviceValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for DeviceValue {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl PartialEq<f64> for DeviceValue {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &f64) -> bool {
        self.as_f64() == *other
    }
}

impl fmt::Display for DeviceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => v.fmt(f),
            Self::Float(v) => v.fmt(f),
        }
    }
}

/// How a device relates to the physical device it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Relationship {
    /// Composite parent; its associated devices are its children.
    Root,
    /// The only device representing its physical device.
    #[default]
    Standalone,
    /// Member of a composite; its associated device is the root.
    Child,
    /// Any code the hub may add later, kept verbatim.
    Other(i64),
}

impl From<i64> for Relationship {
    fn from(code: i64) -> Self {
        match code {
            2 => Self::Root,
            3 => Self::Standalone,
            4 => Self::Child,
            other => Self::Other(other),
        }
    }
}

impl From<Relationship> for i64 {
    fn from(relationship: Relationship) -> Self {
        match relationship {
            Relationship::Root => 2,
            Relationship::Standalone => 3,
            Relationship::Child => 4,
            Relationship::Other(code) => code,
        }
    }
}

/// Snapshot of a device as reported by the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(rename = "ref")]
    pub device_ref: DeviceRef,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub location2: String,
    pub value: DeviceValue,
    #[serde(default)]
    pub status: String,
    /// Hub device type label; `None` for virtual devices.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub device_type_string: Option<String>,
    #[serde(default)]
    pub last_change: String,
    #[serde(default)]
    pub relationship: Relationship,
    #[serde(default)]
    pub associated_devices: Vec<DeviceRef>,
    /// Interface (plug-in) providing the device; undocumented by the hub.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub interface_name: Option<String>,
}

impl DeviceRecord {
    /// Create a builder for constructing a [`DeviceRecord`].
    #[must_use]
    pub fn builder(device_ref: i64) -> DeviceRecordBuilder {
        DeviceRecordBuilder::new(DeviceRef::new(device_ref))
    }

    /// `last_change` parsed into a timestamp, when the hub text is recognised.
    #[must_use]
    pub fn last_change_at(&self) -> Option<Timestamp> {
        parse_last_change(&self.last_change)
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.is_empty()))
}

/// Step-by-step builder for [`DeviceRecord`].
#[derive(Debug)]
pub struct DeviceRecordBuilder {
    record: DeviceRecord,
}

impl DeviceRecordBuilder {
    fn new(device_ref: DeviceRef) -> Self {
        Self {
            record: DeviceRecord {
                device_ref,
                name: String::new(),
                location: String::new(),
                location2: String::new(),
                value: DeviceValue::default(),
                status: String::new(),
                device_type_string: None,
                last_change: String::new(),
                relationship: Relationship::Standalone,
                associated_devices: Vec::new(),
                interface_name: None,
            },
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.record.name = name.into();
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>, location2: impl Into<String>) -> Self {
        self.record.location = location.into();
        self.record.location2 = location2.into();
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<DeviceValue>) -> Self {
        self.record.value = value.into();
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.record.status = status.into();
        self
    }

    #[must_use]
    pub fn device_type(mut self, device_type: impl Into<String>) -> Self {
        self.record.device_type_string = Some(device_type.into());
        self
    }

    #[must_use]
    pub fn last_change(mut self, last_change: impl Into<String>) -> Self {
        self.record.last_change = last_change.into();
        self
    }

    #[must_use]
    pub fn relationship(mut self, relationship: Relationship) -> Self {
        self.record.relationship = relationship;
        self
    }

    #[must_use]
    pub fn associated(mut self, refs: impl IntoIterator<Item = DeviceRef>) -> Self {
        self.record.associated_devices = refs.into_iter().collect();
        self
    }

    #[must_use]
    pub fn interface(mut self, interface_name: impl Into<String>) -> Self {
        self.record.interface_name = Some(interface_name.into());
        self
    }

    #[must_use]
    pub fn build(self) -> DeviceRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_ENTRY: &str = r#"{
        "ref": 3412,
        "name": "Ceiling Light",
        "location": "Kitchen",
        "location2": "First Floor",
        "value": 99,
        "status": "On",
        "device_type_string": "Z-Wave Switch Multilevel",
        "last_change": "/Date(1590000000000)/",
        "relationship": 4,
        "hide_from_view": false,
        "associated_devices": [3411],
        "interface_name": "Z-Wave"
    }"#;

    #[test]
    fn should_deserialize_status_entry() {
        let record: DeviceRecord = serde_json::from_str(STATUS_ENTRY).unwrap();
        assert_eq!(record.device_ref, DeviceRef::new(3412));
        assert_eq!(record.name, "Ceiling Light");
        assert_eq!(record.location, "Kitchen");
        assert_eq!(record.location2, "First Floor");
        assert_eq!(record.value, DeviceValue::Int(99));
        assert_eq!(record.relationship, Relationship::Child);
        assert_eq!(record.associated_devices, vec![DeviceRef::new(3411)]);
        assert_eq!(record.interface_name.as_deref(), Some("Z-Wave"));
        assert!(record.last_change_at().is_some());
    }

    #[test]
    fn should_read_decimal_value_as_float() {
        let json = r#"{"ref": 1, "name": "Temp", "value": 21.5}"#;
        let record: DeviceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.value, DeviceValue::Float(21.5));
        assert!(record.value.is_decimal());
    }

    #[test]
    fn should_read_integral_value_as_int() {
        let json = r#"{"ref": 1, "name": "Switch", "value": 255}"#;
        let record: DeviceRecord = serde_json::from_str(json).unwrap();
        assert!(!record.value.is_decimal());
    }

    #[test]
    fn should_treat_empty_type_and_interface_as_absent() {
        let json = r#"{"ref": 1, "name": "Virtual", "value": 0,
            "device_type_string": "", "interface_name": ""}"#;
        let record: DeviceRecord = serde_json::from_str(json).unwrap();
        assert!(record.device_type_string.is_none());
        assert!(record.interface_name.is_none());
    }

    #[test]
    fn should_keep_unknown_relationship_code() {
        assert_eq!(Relationship::from(2), Relationship::Root);
        assert_eq!(Relationship::from(3), Relationship::Standalone);
        assert_eq!(Relationship::from(7), Relationship::Other(7));
        assert_eq!(i64::from(Relationship::Other(7)), 7);
    }

    #[test]
    fn should_normalize_integral_floats() {
        assert_eq!(DeviceValue::from_f64(49.0), DeviceValue::Int(49));
        assert_eq!(DeviceValue::from_f64(21.5), DeviceValue::Float(21.5));
        assert_eq!(DeviceValue::from_f64(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn should_compare_int_value_with_float() {
        assert_eq!(DeviceValue::Int(255), 255.0);
        assert_ne!(DeviceValue::Int(0), 255.0);
    }

    #[test]
    fn should_build_record_with_defaults() {
        let record = DeviceRecord::builder(5).name("Lamp").value(0).build();
        assert_eq!(record.device_ref.get(), 5);
        assert_eq!(record.relationship, Relationship::Standalone);
        assert!(record.associated_devices.is_empty());
        assert!(record.last_change_at().is_none());
    }
}
