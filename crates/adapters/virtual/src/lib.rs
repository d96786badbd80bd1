//! # hslink-adapter-virtual
//!
//! Virtual hub: an in-memory stand-in for a HomeSeer hub, used for demos and
//! end-to-end tests.
//!
//! ## Behaviour
//!
//! | Request | Effect |
//! |---------|--------|
//! | `controldevicebyvalue` | Stores the value, stamps `last_change`, derives the status text and pushes the new record as an update |
//! | unknown ref | Fails with a not-found error, nothing is pushed |
//!
//! ## Dependency rule
//!
//! Depends on `hslink-app` (port traits) and `hslink-domain` only.

pub mod demo;
mod error;

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Mutex;

use hslink_app::ports::RequestSender;
use hslink_app::update::PushUpdate;
use hslink_domain::control::{ControlPair, DeviceControls};
use hslink_domain::error::HsLinkError;
use hslink_domain::id::DeviceRef;
use hslink_domain::record::{DeviceRecord, DeviceValue};
use hslink_domain::request::{Method, RequestParams};
use hslink_domain::time::{format_last_change, now};
use tokio::sync::mpsc;

pub use error::VirtualHubError;

struct Entry {
    record: DeviceRecord,
    pairs: Vec<ControlPair>,
}

/// In-memory hub that applies control requests and echoes push updates.
pub struct VirtualHub {
    entries: Mutex<BTreeMap<DeviceRef, Entry>>,
    updates: mpsc::UnboundedSender<PushUpdate>,
}

impl VirtualHub {
    /// Seed a hub with a snapshot. The receiver yields one update per applied request.
    #[must_use]
    pub fn from_snapshot(
        records: impl IntoIterator<Item = DeviceRecord>,
        controls: &[DeviceControls],
    ) -> (Self, mpsc::UnboundedReceiver<PushUpdate>) {
        let entries = records
            .into_iter()
            .map(|record| {
                let pairs = controls
                    .iter()
                    .find(|entry| entry.device_ref == record.device_ref)
                    .map(|entry| entry.pairs().to_vec())
                    .unwrap_or_default();
                (record.device_ref, Entry { record, pairs })
            })
            .collect();
        let (updates, receiver) = mpsc::unbounded_channel();
        let hub = Self {
            entries: Mutex::new(entries),
            updates,
        };
        (hub, receiver)
    }

    /// Hub seeded with the [`demo`] device set.
    #[must_use]
    pub fn demo() -> (Self, mpsc::UnboundedReceiver<PushUpdate>) {
        let (records, controls) = demo::snapshot();
        Self::from_snapshot(records, &controls)
    }

    /// Current records, ordered by ref.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualHubError::Poisoned`] if a writer panicked.
    pub fn records(&self) -> Result<Vec<DeviceRecord>, VirtualHubError> {
        let entries = self.entries.lock().map_err(|_| VirtualHubError::Poisoned)?;
        Ok(entries.values().map(|entry| entry.record.clone()).collect())
    }

    /// Current control pairs, ordered by ref.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualHubError::Poisoned`] if a writer panicked.
    pub fn controls(&self) -> Result<Vec<DeviceControls>, VirtualHubError> {
        let entries = self.entries.lock().map_err(|_| VirtualHubError::Poisoned)?;
        Ok(entries
            .iter()
            .map(|(device_ref, entry)| DeviceControls::new(*device_ref, entry.pairs.clone()))
            .collect())
    }

    fn apply(&self, params: RequestParams) -> Result<(), VirtualHubError> {
        let record = {
            let mut entries = self.entries.lock().map_err(|_| VirtualHubError::Poisoned)?;
            let entry = entries
                .get_mut(&params.device_ref)
                .ok_or(VirtualHubError::UnknownDevice(params.device_ref))?;
            entry.record.value = params.value;
            entry.record.status = status_text(&entry.pairs, params.value);
            entry.record.last_change = format_last_change(now());
            entry.record.clone()
        };
        tracing::debug!(
            device_ref = %record.device_ref,
            value = %record.value,
            status = %record.status,
            "virtual hub applied request"
        );
        self.updates
            .send(PushUpdate::data(record))
            .map_err(|_| VirtualHubError::Closed)
    }
}

/// Label of the pair declaring `value`, else the value itself.
fn status_text(pairs: &[ControlPair], value: DeviceValue) -> String {
    pairs
        .iter()
        .find(|pair| pair.control_value.is_some_and(|declared| value == declared))
        .and_then(|pair| pair.label.clone())
        .unwrap_or_else(|| value.to_string())
}

impl RequestSender for VirtualHub {
    fn send(
        &self,
        method: Method,
        params: RequestParams,
    ) -> impl Future<Output = Result<(), HsLinkError>> + Send {
        tracing::trace!(?method, request = ?params.request, "virtual hub request");
        let result = self.apply(params).map_err(VirtualHubError::into_domain);
        async move { result }
    }
}
