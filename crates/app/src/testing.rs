//! Test doubles shared by the app tests.

use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use hslink_domain::error::HsLinkError;
use hslink_domain::record::DeviceValue;
use hslink_domain::request::{Method, RequestParams};

use crate::ports::RequestSender;

/// Sender that records every request instead of talking to a hub.
#[derive(Default)]
pub(crate) struct RecordingSender {
    sent: Mutex<Vec<RequestParams>>,
    fail_next: AtomicBool,
}

impl RecordingSender {
    pub(crate) fn sent(&self) -> Vec<RequestParams> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn values(&self) -> Vec<DeviceValue> {
        self.sent().into_iter().map(|params| params.value).collect()
    }

    pub(crate) fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl RequestSender for RecordingSender {
    fn send(
        &self,
        _method: Method,
        params: RequestParams,
    ) -> impl Future<Output = Result<(), HsLinkError>> + Send {
        let result = if self.fail_next.swap(false, Ordering::SeqCst) {
            Err(HsLinkError::Transport(Box::new(std::io::Error::other(
                "hub unreachable",
            ))))
        } else {
            self.sent.lock().unwrap().push(params);
            Ok(())
        };
        async { result }
    }
}
