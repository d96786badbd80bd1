//! Device table — every device of one hub, keyed by ref.
//!
//! Built once from a `getstatus`/`getcontrol` snapshot, then kept current by
//! push updates. Updates are applied one at a time, in arrival order, and
//! each observer runs before the next update is looked at.

use std::collections::BTreeMap;
use std::sync::Arc;

use hslink_domain::control::DeviceControls;
use hslink_domain::device::factory::{self, BuildOutcome, Diagnostic};
use hslink_domain::error::{HsLinkError, NotFoundError};
use hslink_domain::id::DeviceRef;
use hslink_domain::record::{DeviceRecord, Relationship};
use hslink_domain::thermostat;
use tokio::sync::mpsc;

use crate::device::ManagedDevice;
use crate::ports::RequestSender;
use crate::thermostat::Thermostat;
use crate::update::{PushUpdate, UpdateKind};

pub struct DeviceTable<S> {
    devices: BTreeMap<DeviceRef, ManagedDevice<S>>,
    diagnostics: Vec<Diagnostic>,
}

impl<S: RequestSender> DeviceTable<S> {
    /// Build every device of a snapshot.
    #[must_use]
    pub fn from_snapshot(
        sender: Arc<S>,
        records: impl IntoIterator<Item = DeviceRecord>,
        controls: &[DeviceControls],
    ) -> Self {
        Self::from_outcomes(sender, factory::build_snapshot(records, controls))
    }

    /// Collect already-built devices, keeping their diagnostics.
    #[must_use]
    pub fn from_outcomes(sender: Arc<S>, outcomes: impl IntoIterator<Item = BuildOutcome>) -> Self {
        let mut devices = BTreeMap::new();
        let mut diagnostics = Vec::new();
        for outcome in outcomes {
            let (device, diagnostic) = outcome.into_parts();
            if let Some(diagnostic) = diagnostic {
                tracing::debug!(
                    device_ref = %diagnostic.device_ref,
                    mask = %diagnostic.mask,
                    "{diagnostic}"
                );
                diagnostics.push(diagnostic);
            }
            tracing::trace!(
                device_ref = %device.device_ref(),
                name = device.name(),
                kind = device.kind().name(),
                "device built"
            );
            devices.insert(
                device.device_ref(),
                ManagedDevice::new(device, Arc::clone(&sender)),
            );
        }
        Self {
            devices,
            diagnostics,
        }
    }

    /// Thermostat composite rooted at `root`, if that device exists.
    #[must_use]
    pub fn thermostat(&self, root: DeviceRef) -> Option<Thermostat<'_, S>> {
        let root = self.devices.get(&root)?;
        let layout = thermostat::resolve(root.device(), |child| {
            self.devices.get(&child).map(ManagedDevice::device)
        });
        Some(Thermostat::new(self, layout))
    }

    /// Root devices that resolve to a thermostat with a mode child.
    #[must_use]
    pub fn thermostats(&self) -> Vec<Thermostat<'_, S>> {
        self.devices
            .values()
            .filter(|device| device.device().relationship() == Relationship::Root)
            .filter_map(|device| self.thermostat(device.device().device_ref()))
            .filter(|thermostat| thermostat.layout().mode.is_some())
            .collect()
    }
}

impl<S> DeviceTable<S> {
    #[must_use]
    pub fn get(&self, device_ref: DeviceRef) -> Option<&ManagedDevice<S>> {
        self.devices.get(&device_ref)
    }

    pub fn get_mut(&mut self, device_ref: DeviceRef) -> Option<&mut ManagedDevice<S>> {
        self.devices.get_mut(&device_ref)
    }

    /// Look up a device, failing with [`HsLinkError::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`HsLinkError::NotFound`] when no device has `device_ref`.
    pub fn require(&self, device_ref: DeviceRef) -> Result<&ManagedDevice<S>, HsLinkError> {
        self.get(device_ref).ok_or_else(|| {
            NotFoundError {
                entity: "Device",
                id: device_ref.to_string(),
            }
            .into()
        })
    }

    /// All devices, ordered by ref.
    pub fn devices(&self) -> impl Iterator<Item = &ManagedDevice<S>> {
        self.devices.values()
    }

    pub fn devices_mut(&mut self) -> impl Iterator<Item = &mut ManagedDevice<S>> {
        self.devices.values_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Devices built as status-only because their shape was not recognized.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Replace a device's record and notify its observer.
    ///
    /// Returns `false`, leaving the table untouched, when the ref is unknown
    /// or the record belongs to another device.
    pub fn apply_update(&mut self, update: PushUpdate) -> bool {
        let PushUpdate {
            device_ref,
            record,
            kind,
        } = update;
        if record.device_ref != device_ref {
            tracing::warn!(
                %device_ref,
                record_ref = %record.device_ref,
                "update record belongs to another device, skipping"
            );
            return false;
        }
        let Some(device) = self.devices.get_mut(&device_ref) else {
            tracing::warn!(%device_ref, "update for unknown device, skipping");
            return false;
        };
        tracing::trace!(%device_ref, value = %record.value, status = %record.status, "applying update");
        device.apply(record, kind);
        true
    }

    /// Tell every observer that the update listener connected or disconnected.
    pub fn notify_connection(&mut self) {
        tracing::debug!(devices = self.devices.len(), "notifying connection event");
        for device in self.devices.values_mut() {
            device.notify(UpdateKind::ConnectionEvent);
        }
    }

    /// Apply updates from `receiver` until the channel closes.
    ///
    /// Returns the number of updates applied.
    #[tracing::instrument(skip_all)]
    pub async fn run_updates(&mut self, mut receiver: mpsc::UnboundedReceiver<PushUpdate>) -> usize {
        let mut applied = 0;
        while let Some(update) = receiver.recv().await {
            if self.apply_update(update) {
                applied += 1;
            }
        }
        tracing::debug!(applied, "update channel closed");
        applied
    }
}
