//! Device — a hub device with its control shape resolved.
//!
//! A [`Device`] owns the latest [`DeviceRecord`], the control pairs it was
//! built from and its [`DeviceKind`]. The kind never changes after
//! construction; the record is replaced wholesale by every update.

pub mod factory;
mod kind;

pub use kind::{Cover, CoverMotion, DeviceKind, Dimmer, Fan, Lock, SetPoint, Switch, check_percent};

use crate::control::{ControlPair, ControlUse};
use crate::feature::resolve_value;
use crate::id::DeviceRef;
use crate::record::{DeviceRecord, DeviceValue, Relationship};
use crate::request::RequestParams;
use crate::time::Timestamp;

#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    record: DeviceRecord,
    control_pairs: Vec<ControlPair>,
    kind: DeviceKind,
}

impl Device {
    /// Assemble a device from an already-resolved kind.
    ///
    /// Most callers want [`factory::build`], which derives the kind from the
    /// control pairs.
    #[must_use]
    pub fn new(record: DeviceRecord, control_pairs: Vec<ControlPair>, kind: DeviceKind) -> Self {
        Self {
            record,
            control_pairs,
            kind,
        }
    }

    #[must_use]
    pub fn device_ref(&self) -> DeviceRef {
        self.record.device_ref
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.record.name
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.record.location
    }

    #[must_use]
    pub fn location2(&self) -> &str {
        &self.record.location2
    }

    #[must_use]
    pub fn value(&self) -> DeviceValue {
        self.record.value
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.record.status
    }

    #[must_use]
    pub fn device_type_string(&self) -> Option<&str> {
        self.record.device_type_string.as_deref()
    }

    #[must_use]
    pub fn last_change(&self) -> &str {
        &self.record.last_change
    }

    #[must_use]
    pub fn last_change_at(&self) -> Option<Timestamp> {
        self.record.last_change_at()
    }

    #[must_use]
    pub fn relationship(&self) -> Relationship {
        self.record.relationship
    }

    /// Children of a root device, or the root of a child device.
    #[must_use]
    pub fn associated_devices(&self) -> &[DeviceRef] {
        &self.record.associated_devices
    }

    #[must_use]
    pub fn interface_name(&self) -> Option<&str> {
        self.record.interface_name.as_deref()
    }

    #[must_use]
    pub fn record(&self) -> &DeviceRecord {
        &self.record
    }

    #[must_use]
    pub fn control_pairs(&self) -> &[ControlPair] {
        &self.control_pairs
    }

    #[must_use]
    pub fn kind(&self) -> &DeviceKind {
        &self.kind
    }

    /// Swap in a fresh record. No field of the previous record survives.
    pub fn replace_record(&mut self, record: DeviceRecord) {
        self.record = record;
    }

    /// Request writing `value` to this device.
    #[must_use]
    pub fn value_request(&self, value: impl Into<DeviceValue>) -> RequestParams {
        RequestParams::control_by_value(self.device_ref(), value)
    }

    /// Raw value declared for `control_use`, whatever the device kind.
    #[must_use]
    pub fn control_value(&self, control_use: ControlUse) -> Option<f64> {
        resolve_value(&self.control_pairs, control_use)
    }

    /// Whether the current value is the one declared for `control_use`.
    #[must_use]
    pub fn is_control_use(&self, control_use: ControlUse) -> bool {
        self.control_value(control_use)
            .is_some_and(|declared| self.value() == declared)
    }

    /// Request invoking `control_use`, or `None` if the device does not declare it.
    #[must_use]
    pub fn control_use_request(&self, control_use: ControlUse) -> Option<RequestParams> {
        self.control_value(control_use)
            .map(|declared| self.value_request(declared))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode_device(value: i32) -> Device {
        let record = DeviceRecord::builder(30)
            .name("Mode")
            .value(value)
            .device_type("Z-Wave Mode")
            .build();
        let pairs = vec![
            ControlPair::value(ControlUse::ThermModeOff, 0.0),
            ControlPair::value(ControlUse::ThermModeHeat, 1.0),
            ControlPair::value(ControlUse::ThermModeCool, 2.0),
        ];
        Device::new(record, pairs, DeviceKind::Status)
    }

    #[test]
    fn should_expose_record_fields() {
        let record = DeviceRecord::builder(12)
            .name("Porch")
            .location("Outside", "Ground")
            .value(255)
            .status("On")
            .relationship(Relationship::Child)
            .associated([DeviceRef::new(11)])
            .build();
        let device = Device::new(record, Vec::new(), DeviceKind::Status);
        assert_eq!(device.device_ref(), DeviceRef::new(12));
        assert_eq!(device.name(), "Porch");
        assert_eq!(device.location(), "Outside");
        assert_eq!(device.location2(), "Ground");
        assert_eq!(device.status(), "On");
        assert_eq!(device.relationship(), Relationship::Child);
        assert_eq!(device.associated_devices(), &[DeviceRef::new(11)]);
        assert!(device.device_type_string().is_none());
    }

    #[test]
    fn should_replace_whole_record() {
        let mut device = Device::new(
            DeviceRecord::builder(1).name("Old").value(1).status("On").build(),
            Vec::new(),
            DeviceKind::Status,
        );
        device.replace_record(DeviceRecord::builder(1).name("New").value(0).build());
        assert_eq!(device.name(), "New");
        assert_eq!(device.status(), "");
        assert_eq!(device.value(), DeviceValue::Int(0));
    }

    #[test]
    fn should_match_current_value_against_control_use() {
        let device = mode_device(1);
        assert!(device.is_control_use(ControlUse::ThermModeHeat));
        assert!(!device.is_control_use(ControlUse::ThermModeCool));
        assert!(!device.is_control_use(ControlUse::On));
    }

    #[test]
    fn should_build_request_for_declared_control_use() {
        let device = mode_device(0);
        let request = device.control_use_request(ControlUse::ThermModeCool).unwrap();
        assert_eq!(request.value, DeviceValue::Int(2));
        assert_eq!(request.device_ref, DeviceRef::new(30));
        assert!(device.control_use_request(ControlUse::Fan).is_none());
    }
}
