//! Managed devices — a domain [`Device`] wired to a request sender and an observer.
//!
//! Mutators never touch cached state: they send a request and return once it
//! was sent. The cache only changes when the hub pushes the new record back.

use std::fmt;
use std::sync::Arc;

use hslink_domain::control::ControlUse;
use hslink_domain::device::{Cover, CoverMotion, Device, DeviceKind, Dimmer, Fan, Lock, SetPoint, Switch};
use hslink_domain::error::HsLinkError;
use hslink_domain::record::{DeviceRecord, DeviceValue};
use hslink_domain::request::{Method, RequestParams};

use crate::ports::RequestSender;
use crate::update::{Delivery, Subscription, UpdateKind};

/// Observer callback. Runs after the record is replaced and sees the fresh state.
pub type Callback = Box<dyn FnMut(&Device, UpdateKind) + Send>;

struct Observer {
    id: u64,
    delivery: Delivery,
    callback: Callback,
}

/// A device owned by the device table.
pub struct ManagedDevice<S> {
    device: Device,
    sender: Arc<S>,
    observer: Option<Observer>,
    next_subscription: u64,
}

impl<S> fmt::Debug for ManagedDevice<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedDevice")
            .field("device", &self.device)
            .field("subscribed", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: RequestSender> ManagedDevice<S> {
    #[must_use]
    pub fn new(device: Device, sender: Arc<S>) -> Self {
        Self {
            device,
            sender,
            observer: None,
            next_subscription: 0,
        }
    }

    /// Write a raw value to the device. Every other mutator ends up here.
    ///
    /// # Errors
    ///
    /// Returns whatever the request sender fails with.
    #[tracing::instrument(skip_all, fields(device_ref = %self.device.device_ref()))]
    pub async fn set_value(&self, value: impl Into<DeviceValue>) -> Result<(), HsLinkError> {
        self.send(self.device.value_request(value)).await
    }

    /// Write the value declared for `control_use`. No-op when the device has no such pair.
    ///
    /// # Errors
    ///
    /// Returns whatever the request sender fails with.
    #[tracing::instrument(skip(self), fields(device_ref = %self.device.device_ref()))]
    pub async fn set_control_use(&self, control_use: ControlUse) -> Result<(), HsLinkError> {
        match self.device.control_use_request(control_use) {
            Some(params) => self.send(params).await,
            None => {
                tracing::debug!("control use not declared, ignoring");
                Ok(())
            }
        }
    }

    async fn send(&self, params: RequestParams) -> Result<(), HsLinkError> {
        tracing::debug!(value = %params.value, "sending control request");
        self.sender.send(Method::Get, params).await
    }

    /// Typed handle exposing exactly the operations of this device's variant.
    #[must_use]
    pub fn control(&self) -> Control<'_, S> {
        match *self.device.kind() {
            DeviceKind::Status => Control::Status,
            DeviceKind::Switchable(switch) => Control::Switchable(SwitchControl {
                device: self,
                switch,
            }),
            DeviceKind::Dimmable(dimmer) => Control::Dimmable(DimmerControl {
                device: self,
                dimmer,
            }),
            DeviceKind::Cover(cover) => Control::Cover(CoverControl {
                device: self,
                cover,
            }),
            DeviceKind::Fan(fan) => Control::Fan(FanControl { device: self, fan }),
            DeviceKind::Lockable(lock) => Control::Lockable(LockControl { device: self, lock }),
            DeviceKind::SetPoint(setpoint) => Control::SetPoint(SetPointControl {
                device: self,
                setpoint,
            }),
        }
    }
}

impl<S> ManagedDevice<S> {
    /// Cached state of the device.
    #[must_use]
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Install `callback` as the device's observer, replacing any previous one.
    pub fn subscribe<F>(&mut self, delivery: Delivery, callback: F) -> Subscription
    where
        F: FnMut(&Device, UpdateKind) + Send + 'static,
    {
        self.next_subscription += 1;
        let id = self.next_subscription;
        self.observer = Some(Observer {
            id,
            delivery,
            callback: Box::new(callback),
        });
        Subscription {
            device_ref: self.device.device_ref(),
            id,
        }
    }

    /// Remove the observer if `subscription` is still the current one.
    ///
    /// Returns `false` when a later subscription already replaced it.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let current = self
            .observer
            .as_ref()
            .is_some_and(|observer| observer.id == subscription.id)
            && subscription.device_ref == self.device.device_ref();
        if current {
            self.observer = None;
        }
        current
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.observer.is_some()
    }

    pub(crate) fn apply(&mut self, record: DeviceRecord, kind: UpdateKind) {
        self.device.replace_record(record);
        self.notify(kind);
    }

    pub(crate) fn notify(&mut self, kind: UpdateKind) {
        if let Some(observer) = self.observer.as_mut()
            && observer.delivery.accepts(kind)
        {
            (observer.callback)(&self.device, kind);
        }
    }
}

/// Operations available on a device, by variant.
#[derive(Debug)]
pub enum Control<'a, S> {
    /// Only the common operations of [`ManagedDevice`].
    Status,
    Switchable(SwitchControl<'a, S>),
    Dimmable(DimmerControl<'a, S>),
    Cover(CoverControl<'a, S>),
    Fan(FanControl<'a, S>),
    Lockable(LockControl<'a, S>),
    SetPoint(SetPointControl<'a, S>),
}

#[derive(Debug)]
pub struct SwitchControl<'a, S> {
    device: &'a ManagedDevice<S>,
    switch: Switch,
}

impl<S: RequestSender> SwitchControl<'_, S> {
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.switch.is_on(self.device.device.value())
    }

    /// # Errors
    ///
    /// Returns whatever the request sender fails with.
    pub async fn on(&self) -> Result<(), HsLinkError> {
        self.device.set_value(self.switch.on_value()).await
    }

    /// # Errors
    ///
    /// Returns whatever the request sender fails with.
    pub async fn off(&self) -> Result<(), HsLinkError> {
        self.device.set_value(self.switch.off_value()).await
    }
}

#[derive(Debug)]
pub struct DimmerControl<'a, S> {
    device: &'a ManagedDevice<S>,
    dimmer: Dimmer,
}

impl<'a, S: RequestSender> DimmerControl<'a, S> {
    fn switch(&self) -> SwitchControl<'a, S> {
        SwitchControl {
            device: self.device,
            switch: *self.dimmer.switch(),
        }
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.switch().is_on()
    }

    /// # Errors
    ///
    /// Returns whatever the request sender fails with.
    pub async fn on(&self) -> Result<(), HsLinkError> {
        self.switch().on().await
    }

    /// # Errors
    ///
    /// Returns whatever the request sender fails with.
    pub async fn off(&self) -> Result<(), HsLinkError> {
        self.switch().off().await
    }

    #[must_use]
    pub fn dim_supported(&self) -> bool {
        self.dimmer.is_supported()
    }

    #[must_use]
    pub fn dim_percent(&self) -> f64 {
        self.dimmer.percent(self.device.device.value())
    }

    /// Dim to `percent`. No-op when the device has no dim range.
    ///
    /// # Errors
    ///
    /// Returns [`HsLinkError::Validation`] before sending anything when
    /// `percent` is outside `0..=100`, or whatever the request sender fails with.
    pub async fn dim(&self, percent: f64) -> Result<(), HsLinkError> {
        match self.dimmer.target(percent)? {
            Some(value) => self.device.set_value(value).await,
            None => {
                tracing::debug!(device_ref = %self.device.device.device_ref(), "dim not supported, ignoring");
                Ok(())
            }
        }
    }
}

#[derive(Debug)]
pub struct CoverControl<'a, S> {
    device: &'a ManagedDevice<S>,
    cover: Cover,
}

impl<'a, S: RequestSender> CoverControl<'a, S> {
    fn dimmer(&self) -> DimmerControl<'a, S> {
        DimmerControl {
            device: self.device,
            dimmer: *self.cover.dimmer(),
        }
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.dimmer().is_on()
    }

    /// # Errors
    ///
    /// Returns whatever the request sender fails with.
    pub async fn on(&self) -> Result<(), HsLinkError> {
        self.dimmer().on().await
    }

    /// # Errors
    ///
    /// Returns whatever the request sender fails with.
    pub async fn off(&self) -> Result<(), HsLinkError> {
        self.dimmer().off().await
    }

    #[must_use]
    pub fn dim_supported(&self) -> bool {
        self.dimmer().dim_supported()
    }

    #[must_use]
    pub fn dim_percent(&self) -> f64 {
        self.dimmer().dim_percent()
    }

    /// # Errors
    ///
    /// See [`DimmerControl::dim`].
    pub async fn dim(&self, percent: f64) -> Result<(), HsLinkError> {
        self.dimmer().dim(percent).await
    }

    /// # Errors
    ///
    /// Returns whatever the request sender fails with.
    pub async fn stop(&self) -> Result<(), HsLinkError> {
        self.device.set_value(self.cover.stop_value()).await
    }

    /// Open the cover (the hub's off value).
    ///
    /// # Errors
    ///
    /// Returns whatever the request sender fails with.
    pub async fn open(&self) -> Result<(), HsLinkError> {
        self.off().await
    }

    /// Close the cover (the hub's on value).
    ///
    /// # Errors
    ///
    /// Returns whatever the request sender fails with.
    pub async fn close(&self) -> Result<(), HsLinkError> {
        self.on().await
    }

    fn motion(&self) -> CoverMotion {
        CoverMotion::from_status(self.device.device.status())
    }

    #[must_use]
    pub fn is_opening(&self) -> bool {
        self.motion() == CoverMotion::Opening
    }

    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.motion() == CoverMotion::Closing
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.motion() == CoverMotion::Closed
    }
}

#[derive(Debug)]
pub struct FanControl<'a, S> {
    device: &'a ManagedDevice<S>,
    fan: Fan,
}

impl<S: RequestSender> FanControl<'_, S> {
    fn switch(&self) -> SwitchControl<'_, S> {
        SwitchControl {
            device: self.device,
            switch: *self.fan.switch(),
        }
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.switch().is_on()
    }

    /// # Errors
    ///
    /// Returns whatever the request sender fails with.
    pub async fn on(&self) -> Result<(), HsLinkError> {
        self.switch().on().await
    }

    /// # Errors
    ///
    /// Returns whatever the request sender fails with.
    pub async fn off(&self) -> Result<(), HsLinkError> {
        self.switch().off().await
    }

    /// Current speed as a `0..1` ratio of full speed.
    #[must_use]
    pub fn speed_percent(&self) -> f64 {
        self.fan.speed_percent(self.device.device.value())
    }

    /// # Errors
    ///
    /// Returns [`HsLinkError::Validation`] before sending anything when
    /// `percent` is outside `0..=100`, or whatever the request sender fails with.
    pub async fn speed(&self, percent: f64) -> Result<(), HsLinkError> {
        let value = self.fan.target(percent)?;
        self.device.set_value(value).await
    }
}

#[derive(Debug)]
pub struct LockControl<'a, S> {
    device: &'a ManagedDevice<S>,
    lock: Lock,
}

impl<S: RequestSender> LockControl<'_, S> {
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked(self.device.device.value())
    }

    /// # Errors
    ///
    /// Returns whatever the request sender fails with.
    pub async fn lock(&self) -> Result<(), HsLinkError> {
        self.device.set_value(self.lock.lock_value()).await
    }

    /// # Errors
    ///
    /// Returns whatever the request sender fails with.
    pub async fn unlock(&self) -> Result<(), HsLinkError> {
        self.device.set_value(self.lock.unlock_value()).await
    }
}

#[derive(Debug)]
pub struct SetPointControl<'a, S> {
    device: &'a ManagedDevice<S>,
    setpoint: SetPoint,
}

impl<S: RequestSender> SetPointControl<'_, S> {
    #[must_use]
    pub fn min(&self) -> f64 {
        self.setpoint.min()
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.setpoint.max()
    }

    /// Write `target`. No-op when it lies outside `min..=max`.
    ///
    /// # Errors
    ///
    /// Returns whatever the request sender fails with.
    pub async fn set_setpoint(&self, target: f64) -> Result<(), HsLinkError> {
        match self.setpoint.target(target) {
            Some(value) => self.device.set_value(value).await,
            None => {
                tracing::debug!(
                    device_ref = %self.device.device.device_ref(),
                    target,
                    min = self.min(),
                    max = self.max(),
                    "setpoint out of range, ignoring"
                );
                Ok(())
            }
        }
    }
}
