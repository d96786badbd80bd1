//! Device variants and the value algorithms behind their operations.
//!
//! Each variant holds only the control values it needs. Operations are pure
//! translations from an intent (percent, boolean, target) to the raw value
//! the hub expects; validation lives next to the variant that knows the
//! valid domain.

use crate::control::ControlRange;
use crate::error::ValidationError;
use crate::record::DeviceValue;

/// The capability shape a device was built with. Fixed for its lifetime.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceKind {
    Status,
    Switchable(Switch),
    Dimmable(Dimmer),
    Cover(Cover),
    Fan(Fan),
    Lockable(Lock),
    SetPoint(SetPoint),
}

impl DeviceKind {
    /// Short lowercase name of the variant, for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Switchable(_) => "switchable",
            Self::Dimmable(_) => "dimmable",
            Self::Cover(_) => "cover",
            Self::Fan(_) => "fan",
            Self::Lockable(_) => "lockable",
            Self::SetPoint(_) => "setpoint",
        }
    }
}

/// Reject percentages outside `0..=100` (NaN included).
///
/// # Errors
///
/// Returns [`ValidationError::PercentOutOfRange`] when `percent` is out of bounds.
pub fn check_percent(percent: f64) -> Result<f64, ValidationError> {
    if (0.0..=100.0).contains(&percent) {
        Ok(percent)
    } else {
        Err(ValidationError::PercentOutOfRange(percent))
    }
}

/// On/off control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Switch {
    on_value: f64,
    off_value: f64,
}

impl Switch {
    #[must_use]
    pub const fn new(on_value: f64, off_value: f64) -> Self {
        Self {
            on_value,
            off_value,
        }
    }

    #[must_use]
    pub fn on_value(&self) -> DeviceValue {
        DeviceValue::from_f64(self.on_value)
    }

    #[must_use]
    pub fn off_value(&self) -> DeviceValue {
        DeviceValue::from_f64(self.off_value)
    }

    /// Anything but the off value counts as on.
    #[must_use]
    pub fn is_on(&self, value: DeviceValue) -> bool {
        value != self.off_value
    }
}

/// On/off control with a dim range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimmer {
    switch: Switch,
    range: ControlRange,
}

impl Dimmer {
    #[must_use]
    pub const fn new(switch: Switch, range: ControlRange) -> Self {
        Self { switch, range }
    }

    #[must_use]
    pub fn switch(&self) -> &Switch {
        &self.switch
    }

    #[must_use]
    pub fn range(&self) -> ControlRange {
        self.range
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.range.is_supported()
    }

    /// Current dim level in percent. Not rounded.
    #[must_use]
    pub fn percent(&self, value: DeviceValue) -> f64 {
        if value == self.switch.on_value {
            return 100.0;
        }
        if value == self.switch.off_value || !self.is_supported() {
            return 0.0;
        }
        100.0 * (value.as_f64() - self.range.start) / self.range.span()
    }

    /// Raw value for `percent`, or `None` when dimming is unsupported.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::PercentOutOfRange`] when `percent` is not in `0..=100`.
    pub fn target(&self, percent: f64) -> Result<Option<DeviceValue>, ValidationError> {
        let percent = check_percent(percent)?;
        if !self.is_supported() {
            return Ok(None);
        }
        let raw = (percent * self.range.span() / 100.0).floor() + self.range.start;
        Ok(Some(DeviceValue::from_f64(raw)))
    }
}

/// Window covering or garage door: a dimmer that can also stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cover {
    dimmer: Dimmer,
    stop_value: f64,
}

impl Cover {
    #[must_use]
    pub const fn new(dimmer: Dimmer, stop_value: f64) -> Self {
        Self { dimmer, stop_value }
    }

    #[must_use]
    pub fn dimmer(&self) -> &Dimmer {
        &self.dimmer
    }

    #[must_use]
    pub fn stop_value(&self) -> DeviceValue {
        DeviceValue::from_f64(self.stop_value)
    }
}

/// Motion state a cover reports through its status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverMotion {
    Opening,
    Closing,
    Closed,
    Other,
}

impl CoverMotion {
    #[must_use]
    pub fn from_status(status: &str) -> Self {
        match status {
            "Opening" => Self::Opening,
            "Closing" => Self::Closing,
            "Closed" => Self::Closed,
            _ => Self::Other,
        }
    }
}

/// Fan whose speed scales linearly up to the on value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fan {
    switch: Switch,
}

impl Fan {
    #[must_use]
    pub const fn new(switch: Switch) -> Self {
        Self { switch }
    }

    #[must_use]
    pub fn switch(&self) -> &Switch {
        &self.switch
    }

    /// Current speed as a ratio of full speed (`value / on`).
    #[must_use]
    pub fn speed_percent(&self, value: DeviceValue) -> f64 {
        if self.switch.on_value == 0.0 {
            return 0.0;
        }
        value.as_f64() / self.switch.on_value
    }

    /// Raw value for `percent` of full speed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::PercentOutOfRange`] when `percent` is not in `0..=100`.
    pub fn target(&self, percent: f64) -> Result<DeviceValue, ValidationError> {
        let percent = check_percent(percent)?;
        Ok(DeviceValue::from_f64(
            (self.switch.on_value * percent / 100.0).floor(),
        ))
    }
}

/// Lock/unlock control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lock {
    lock_value: f64,
    unlock_value: f64,
}

impl Lock {
    #[must_use]
    pub const fn new(lock_value: f64, unlock_value: f64) -> Self {
        Self {
            lock_value,
            unlock_value,
        }
    }

    #[must_use]
    pub fn lock_value(&self) -> DeviceValue {
        DeviceValue::from_f64(self.lock_value)
    }

    #[must_use]
    pub fn unlock_value(&self) -> DeviceValue {
        DeviceValue::from_f64(self.unlock_value)
    }

    #[must_use]
    pub fn is_locked(&self, value: DeviceValue) -> bool {
        value == self.lock_value
    }
}

/// Bounded numeric target, e.g. a thermostat setpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetPoint {
    range: ControlRange,
}

impl SetPoint {
    #[must_use]
    pub const fn new(range: ControlRange) -> Self {
        Self { range }
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.range.start
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.range.end
    }

    /// `target` as a raw value when it lies within `min..=max`.
    #[must_use]
    pub fn target(&self, target: f64) -> Option<DeviceValue> {
        (self.min() <= target && target <= self.max()).then(|| DeviceValue::from_f64(target))
    }
}
