//! Push updates and observer subscriptions.

use hslink_domain::id::DeviceRef;
use hslink_domain::record::DeviceRecord;

/// What triggered an observer notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// The device's record changed.
    DataUpdate,
    /// The update listener connected or disconnected.
    ConnectionEvent,
}

/// A fresh record pushed by the hub for one device.
#[derive(Debug, Clone, PartialEq)]
pub struct PushUpdate {
    pub device_ref: DeviceRef,
    pub record: DeviceRecord,
    pub kind: UpdateKind,
}

impl PushUpdate {
    /// A data update addressed to the record's own ref.
    #[must_use]
    pub fn data(record: DeviceRecord) -> Self {
        Self {
            device_ref: record.device_ref,
            record,
            kind: UpdateKind::DataUpdate,
        }
    }
}

/// Which notifications an observer wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delivery {
    #[default]
    AllEvents,
    /// Suppress notifications caused by connection events.
    DataOnly,
}

impl Delivery {
    #[must_use]
    pub fn accepts(self, kind: UpdateKind) -> bool {
        match self {
            Self::AllEvents => true,
            Self::DataOnly => kind == UpdateKind::DataUpdate,
        }
    }
}

/// Handle returned by `subscribe`, needed to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub(crate) device_ref: DeviceRef,
    pub(crate) id: u64,
}

impl Subscription {
    #[must_use]
    pub fn device_ref(&self) -> DeviceRef {
        self.device_ref
    }
}
