//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`HsLinkError`]
//! via `#[from]` (or an `into_domain` helper for adapter errors).

/// Top-level error shared by the domain and application layers.
#[derive(Debug, thiserror::Error)]
pub enum HsLinkError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("payload error")]
    Payload(#[from] PayloadError),

    /// Failure raised by a request sender while talking to the hub.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A caller-supplied value is outside the domain the device accepts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("percent must be a number from 0 to 100, got {0}")]
    PercentOutOfRange(f64),
}

/// A referenced object does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A hub JSON payload could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("malformed {kind} payload")]
    Json {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
