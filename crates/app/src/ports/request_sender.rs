//! Request sender port — the only way the core talks back to the hub.

use std::future::Future;

use hslink_domain::error::HsLinkError;
use hslink_domain::request::{Method, RequestParams};

/// Issues control requests to the hub.
///
/// The core only awaits completion; it never inspects the response body.
/// A successful send means the command was sent, not that state changed:
/// the new state arrives later as a push update.
pub trait RequestSender: Send + Sync {
    fn send(
        &self,
        method: Method,
        params: RequestParams,
    ) -> impl Future<Output = Result<(), HsLinkError>> + Send;
}

impl<T: RequestSender> RequestSender for std::sync::Arc<T> {
    fn send(
        &self,
        method: Method,
        params: RequestParams,
    ) -> impl Future<Output = Result<(), HsLinkError>> + Send {
        (**self).send(method, params)
    }
}
