//! Control pairs — what a raw value means for a given device.
//!
//! A `getcontrol` response lists, per device, the values the hub accepts and
//! the semantic ([`ControlUse`]) each of them stands for.

use serde::{Deserialize, Serialize};

use crate::id::DeviceRef;

/// Semantic of a control pair, as encoded by the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ControlUse {
    On,
    Off,
    Dim,
    Stop,
    HeatSetpoint,
    CoolSetpoint,
    ThermModeOff,
    ThermModeHeat,
    ThermModeCool,
    Lock,
    Unlock,
    Fan,
    /// A code this library does not model.
    Other(i32),
}

impl From<i32> for ControlUse {
    fn from(code: i32) -> Self {
        match code {
            1 => Self::On,
            2 => Self::Off,
            3 => Self::Dim,
            7 => Self::Stop,
            12 => Self::HeatSetpoint,
            13 => Self::CoolSetpoint,
            14 => Self::ThermModeOff,
            15 => Self::ThermModeHeat,
            16 => Self::ThermModeCool,
            18 => Self::Lock,
            19 => Self::Unlock,
            23 => Self::Fan,
            other => Self::Other(other),
        }
    }
}

impl From<ControlUse> for i32 {
    fn from(control_use: ControlUse) -> Self {
        match control_use {
            ControlUse::On => 1,
            ControlUse::Off => 2,
            ControlUse::Dim => 3,
            ControlUse::Stop => 7,
            ControlUse::HeatSetpoint => 12,
            ControlUse::CoolSetpoint => 13,
            ControlUse::ThermModeOff => 14,
            ControlUse::ThermModeHeat => 15,
            ControlUse::ThermModeCool => 16,
            ControlUse::Lock => 18,
            ControlUse::Unlock => 19,
            ControlUse::Fan => 23,
            ControlUse::Other(code) => code,
        }
    }
}

/// Inclusive-start range of a continuous control.
///
/// `(0, 0)` is the "unsupported" marker, never a real zero-width range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlRange {
    #[serde(rename = "RangeStart")]
    pub start: f64,
    #[serde(rename = "RangeEnd")]
    pub end: f64,
}

impl ControlRange {
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Distance between start and end.
    #[must_use]
    pub fn span(self) -> f64 {
        self.end - self.start
    }

    /// Whether the range describes a usable control (start differs from end).
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_supported(self) -> bool {
        self.start != self.end
    }
}

/// One (semantic, raw value) declaration for a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPair {
    #[serde(rename = "Label", default)]
    pub label: Option<String>,
    #[serde(rename = "ControlUse")]
    pub control_use: ControlUse,
    #[serde(rename = "ControlValue", default)]
    pub control_value: Option<f64>,
    #[serde(rename = "Range", default)]
    pub range: Option<ControlRange>,
}

impl ControlPair {
    /// A discrete pair: `value` means `control_use`.
    #[must_use]
    pub fn value(control_use: ControlUse, value: f64) -> Self {
        Self {
            label: None,
            control_use,
            control_value: Some(value),
            range: None,
        }
    }

    /// A continuous pair covering `start..end`.
    #[must_use]
    pub fn range(control_use: ControlUse, start: f64, end: f64) -> Self {
        Self {
            label: None,
            control_use,
            control_value: None,
            range: Some(ControlRange::new(start, end)),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Control pairs declared for one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceControls {
    #[serde(rename = "ref")]
    pub device_ref: DeviceRef,
    /// `null` in the payload means the device declares no controls.
    #[serde(rename = "ControlPairs", default)]
    pub control_pairs: Option<Vec<ControlPair>>,
}

impl DeviceControls {
    #[must_use]
    pub fn new(device_ref: DeviceRef, pairs: Vec<ControlPair>) -> Self {
        Self {
            device_ref,
            control_pairs: Some(pairs),
        }
    }

    /// The declared pairs, empty when none were declared.
    #[must_use]
    pub fn pairs(&self) -> &[ControlPair] {
        self.control_pairs.as_deref().unwrap_or_default()
    }
}
