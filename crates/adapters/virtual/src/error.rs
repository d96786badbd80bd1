//! Virtual hub error types.

use hslink_domain::error::{HsLinkError, NotFoundError};
use hslink_domain::id::DeviceRef;

/// Errors specific to the virtual hub.
#[derive(Debug, thiserror::Error)]
pub enum VirtualHubError {
    /// A request addressed a ref the hub does not hold.
    #[error("no device with ref {0}")]
    UnknownDevice(DeviceRef),

    /// A previous writer panicked while holding the record store.
    #[error("record store poisoned")]
    Poisoned,

    /// Nobody listens for push updates anymore.
    #[error("update channel closed")]
    Closed,
}

impl VirtualHubError {
    /// Convert into an [`HsLinkError`] for propagation across port boundaries.
    pub fn into_domain(self) -> HsLinkError {
        match self {
            Self::UnknownDevice(device_ref) => NotFoundError {
                entity: "Device",
                id: device_ref.to_string(),
            }
            .into(),
            other => HsLinkError::Transport(Box::new(other)),
        }
    }
}

impl From<VirtualHubError> for HsLinkError {
    fn from(err: VirtualHubError) -> Self {
        err.into_domain()
    }
}
