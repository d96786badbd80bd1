//! Capability classification.
//!
//! Inspects a device's control pairs and deduces which control semantics it
//! supports. Everything here is pure: the same pairs always give the same
//! mask, whatever their order.

use std::fmt;

use crate::control::{ControlPair, ControlRange, ControlUse};

bitflags::bitflags! {
    /// Control semantics supported by a device.
    ///
    /// The empty mask is [`FeatureMask::STATUS`]: the device only reports state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FeatureMask: u16 {
        const ON = 1;
        const OFF = 2;
        const LOCK = 4;
        const UNLOCK = 8;
        const DIM = 16;
        const FAN = 32;
        const STOP = 64;
        const SETPOINT = 128;
        const THERM_MODES = 512;
    }
}

impl FeatureMask {
    /// Status-only: no controllable semantic.
    pub const STATUS: Self = Self::empty();

    /// The flag a control use contributes, if it is one this library models.
    #[must_use]
    pub fn for_use(control_use: ControlUse) -> Option<Self> {
        let flag = match control_use {
            ControlUse::On => Self::ON,
            ControlUse::Off => Self::OFF,
            ControlUse::Dim => Self::DIM,
            ControlUse::Stop => Self::STOP,
            ControlUse::Lock => Self::LOCK,
            ControlUse::Unlock => Self::UNLOCK,
            ControlUse::Fan => Self::FAN,
            ControlUse::HeatSetpoint | ControlUse::CoolSetpoint => Self::SETPOINT,
            ControlUse::ThermModeOff | ControlUse::ThermModeHeat | ControlUse::ThermModeCool => {
                Self::THERM_MODES
            }
            ControlUse::Other(_) => return None,
        };
        Some(flag)
    }
}

impl fmt::Display for FeatureMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("STATUS");
        }
        bitflags::parser::to_writer(self, f)
    }
}

/// Compute the feature mask of a control-pair list.
///
/// Unknown control uses are ignored; an empty list is status-only.
#[must_use]
pub fn classify(pairs: &[ControlPair]) -> FeatureMask {
    pairs
        .iter()
        .filter_map(|pair| FeatureMask::for_use(pair.control_use))
        .fold(FeatureMask::STATUS, |mask, flag| mask | flag)
}

/// First pair declared for `control_use`.
#[must_use]
pub fn resolve_pair(pairs: &[ControlPair], control_use: ControlUse) -> Option<&ControlPair> {
    pairs.iter().find(|pair| pair.control_use == control_use)
}

/// Raw value that invokes `control_use`, if declared.
#[must_use]
pub fn resolve_value(pairs: &[ControlPair], control_use: ControlUse) -> Option<f64> {
    resolve_pair(pairs, control_use).and_then(|pair| pair.control_value)
}

/// Range declared for `control_use`; `(0, 0)` when absent.
#[must_use]
pub fn resolve_range(pairs: &[ControlPair], control_use: ControlUse) -> ControlRange {
    resolve_pair(pairs, control_use)
        .and_then(|pair| pair.range)
        .unwrap_or_default()
}
