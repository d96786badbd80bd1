//! Thermostat composites.
//!
//! A Z-Wave thermostat shows up on the hub as a root device whose children
//! each carry one aspect (mode, heater, setpoints, temperatures). The
//! children are recognized by their device-type label and, for
//! temperatures, by their name.

use crate::control::ControlUse;
use crate::device::{Device, DeviceKind};
use crate::id::DeviceRef;

pub const MODE_TYPE: &str = "Z-Wave Mode";
pub const HEATER_TYPE: &str = "Z-Wave Switch";
/// The hub emits this label with two spaces.
pub const HEATING_SETPOINT_TYPE: &str = "Z-Wave Heating  Setpoint";
/// The hub emits this label with two spaces.
pub const COOLING_SETPOINT_TYPE: &str = "Z-Wave Cooling  Setpoint";
pub const ENERGY_SAVE_SETPOINT_TYPE: &str = "Z-Wave Energy Save Heating Setpoint";
pub const TEMPERATURE_TYPE: &str = "Z-Wave Temperature";
pub const AIR_TEMPERATURE_NAME: &str = "Thermostat Air Temperature";
pub const FLOOR_TEMPERATURE_NAME: &str = "Floor Temperature";

/// Refs of the children making up one thermostat. Missing children are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThermostatLayout {
    pub root: DeviceRef,
    pub mode: Option<DeviceRef>,
    pub heater: Option<DeviceRef>,
    pub heating_setpoint: Option<DeviceRef>,
    pub cooling_setpoint: Option<DeviceRef>,
    pub energy_save_setpoint: Option<DeviceRef>,
    pub air_temp: Option<DeviceRef>,
    pub floor_temp: Option<DeviceRef>,
}

impl ThermostatLayout {
    fn empty(root: DeviceRef) -> Self {
        Self {
            root,
            mode: None,
            heater: None,
            heating_setpoint: None,
            cooling_setpoint: None,
            energy_save_setpoint: None,
            air_temp: None,
            floor_temp: None,
        }
    }

    /// Slot a child belongs to, if any.
    fn slot(&mut self, child: &Device) -> Option<&mut Option<DeviceRef>> {
        let slot = match child.device_type_string()? {
            MODE_TYPE => &mut self.mode,
            HEATER_TYPE => &mut self.heater,
            HEATING_SETPOINT_TYPE => &mut self.heating_setpoint,
            COOLING_SETPOINT_TYPE => &mut self.cooling_setpoint,
            ENERGY_SAVE_SETPOINT_TYPE => &mut self.energy_save_setpoint,
            TEMPERATURE_TYPE => match child.name() {
                AIR_TEMPERATURE_NAME => &mut self.air_temp,
                FLOOR_TEMPERATURE_NAME => &mut self.floor_temp,
                _ => return None,
            },
            _ => return None,
        };
        Some(slot)
    }
}

/// Match a root's associated devices against the thermostat child labels.
///
/// Only refs listed by the root are considered, in the order it lists them;
/// the first match for a slot wins. Refs that `lookup` cannot find are skipped.
pub fn resolve<'a, F>(root: &Device, lookup: F) -> ThermostatLayout
where
    F: Fn(DeviceRef) -> Option<&'a Device>,
{
    let mut layout = ThermostatLayout::empty(root.device_ref());
    for child in root
        .associated_devices()
        .iter()
        .filter_map(|child_ref| lookup(*child_ref))
    {
        if let Some(slot) = layout.slot(child)
            && slot.is_none()
        {
            *slot = Some(child.device_ref());
        }
    }
    layout
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HvacMode {
    Off,
    Heat,
    Cool,
}

impl HvacMode {
    /// Control use that selects this mode on the mode child.
    #[must_use]
    pub fn control_use(self) -> ControlUse {
        match self {
            Self::Off => ControlUse::ThermModeOff,
            Self::Heat => ControlUse::ThermModeHeat,
            Self::Cool => ControlUse::ThermModeCool,
        }
    }
}

impl std::str::FromStr for HvacMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "heat" => Ok(Self::Heat),
            "cool" => Ok(Self::Cool),
            other => Err(format!("unknown hvac mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HvacAction {
    Heating,
    Idle,
}

/// Mode currently selected on a mode child. Heat wins over Cool; anything
/// else reads as Off.
#[must_use]
pub fn hvac_mode(mode: &Device) -> HvacMode {
    if mode.is_control_use(ControlUse::ThermModeHeat) {
        HvacMode::Heat
    } else if mode.is_control_use(ControlUse::ThermModeCool) {
        HvacMode::Cool
    } else {
        HvacMode::Off
    }
}

/// Whether a heater child reports heating.
#[must_use]
pub fn hvac_action(heater: &Device) -> HvacAction {
    let on = match heater.kind() {
        DeviceKind::Switchable(switch) => switch.is_on(heater.value()),
        _ => heater.value() != 0.0,
    };
    if on {
        HvacAction::Heating
    } else {
        HvacAction::Idle
    }
}
