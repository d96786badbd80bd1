//! # hslink-app
//!
//! Application layer — the live device table and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** adapters must implement:
//!   - `RequestSender` — issue control requests to the hub
//! - Own the **device table** built from a snapshot, and keep it current from push updates
//! - Hand out **typed device handles** whose mutators go through the request sender
//! - Deliver **observer notifications** after each update
//! - Assemble **thermostat composites** from a root device and its children
//!
//! ## Dependency rule
//! Depends on `hslink-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod device;
pub mod ports;
pub mod registry;
pub mod thermostat;
pub mod update;

#[cfg(test)]
mod testing;
