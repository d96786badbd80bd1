//! Thermostat composite — one climate view over a root device and its children.

use hslink_domain::error::HsLinkError;
use hslink_domain::id::DeviceRef;
use hslink_domain::thermostat::{self, HvacAction, HvacMode, ThermostatLayout};

use crate::device::{Control, ManagedDevice};
use crate::ports::RequestSender;
use crate::registry::DeviceTable;

/// Borrowed view of a thermostat. Readers return `None` and writers do
/// nothing when the child they need is missing.
pub struct Thermostat<'a, S> {
    table: &'a DeviceTable<S>,
    layout: ThermostatLayout,
}

impl<'a, S: RequestSender> Thermostat<'a, S> {
    pub(crate) fn new(table: &'a DeviceTable<S>, layout: ThermostatLayout) -> Self {
        Self { table, layout }
    }

    #[must_use]
    pub fn layout(&self) -> &ThermostatLayout {
        &self.layout
    }

    #[must_use]
    pub fn root(&self) -> Option<&'a ManagedDevice<S>> {
        self.table.get(self.layout.root)
    }

    fn child(&self, slot: Option<DeviceRef>) -> Option<&'a ManagedDevice<S>> {
        slot.and_then(|device_ref| self.table.get(device_ref))
    }

    fn child_value(&self, slot: Option<DeviceRef>) -> Option<f64> {
        self.child(slot)
            .map(|device| device.device().value().as_f64())
    }

    #[must_use]
    pub fn hvac_mode(&self) -> Option<HvacMode> {
        self.child(self.layout.mode)
            .map(|mode| thermostat::hvac_mode(mode.device()))
    }

    #[must_use]
    pub fn hvac_action(&self) -> Option<HvacAction> {
        self.child(self.layout.heater)
            .map(|heater| thermostat::hvac_action(heater.device()))
    }

    /// Air temperature.
    #[must_use]
    pub fn current_temperature(&self) -> Option<f64> {
        self.child_value(self.layout.air_temp)
    }

    #[must_use]
    pub fn floor_temperature(&self) -> Option<f64> {
        self.child_value(self.layout.floor_temp)
    }

    /// Cooling setpoint while cooling, heating setpoint otherwise.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        if self.hvac_mode() == Some(HvacMode::Cool) {
            self.child_value(self.layout.cooling_setpoint)
        } else {
            self.child_value(self.layout.heating_setpoint)
        }
    }

    #[must_use]
    pub fn energy_save_temperature(&self) -> Option<f64> {
        self.child_value(self.layout.energy_save_setpoint)
    }

    /// Select `mode` on the mode child.
    ///
    /// # Errors
    ///
    /// Returns whatever the request sender fails with.
    #[tracing::instrument(skip(self), fields(root = %self.layout.root))]
    pub async fn set_hvac_mode(&self, mode: HvacMode) -> Result<(), HsLinkError> {
        let Some(device) = self.child(self.layout.mode) else {
            tracing::debug!("thermostat has no mode child, ignoring");
            return Ok(());
        };
        device.set_control_use(mode.control_use()).await
    }

    /// Write the setpoint of the current mode. No-op while off, and when the
    /// setpoint child declares a range that `temperature` falls outside of.
    ///
    /// # Errors
    ///
    /// Returns whatever the request sender fails with.
    #[tracing::instrument(skip(self), fields(root = %self.layout.root))]
    pub async fn set_temperature(&self, temperature: f64) -> Result<(), HsLinkError> {
        let slot = match self.hvac_mode() {
            Some(HvacMode::Heat) => self.layout.heating_setpoint,
            Some(HvacMode::Cool) => self.layout.cooling_setpoint,
            Some(HvacMode::Off) | None => {
                tracing::debug!("thermostat is not heating or cooling, ignoring");
                return Ok(());
            }
        };
        let Some(device) = self.child(slot) else {
            tracing::debug!("thermostat has no setpoint child for this mode, ignoring");
            return Ok(());
        };
        match device.control() {
            Control::SetPoint(setpoint) => setpoint.set_setpoint(temperature).await,
            _ => device.set_value(temperature).await,
        }
    }
}
