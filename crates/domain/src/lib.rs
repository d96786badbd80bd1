//! # hslink-domain
//!
//! Pure domain model for talking to a HomeSeer hub.
//!
//! ## Responsibilities
//! - Foundational types: device refs, error conventions, timestamps
//! - Decode hub payloads (**records**, **control pairs**, `getstatus`/`getcontrol` bodies)
//! - Classify control pairs into a **feature mask** and build the matching **device** variant
//! - Translate device intents (on, dim 50 %, lock, …) into **control requests**
//! - Resolve **thermostat** composites out of a root device and its children
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod control;
pub mod device;
pub mod feature;
pub mod payload;
pub mod record;
pub mod request;
pub mod thermostat;
