//! Recording executor for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::executor::{ApiRequest, ApiResponse, RequestBody, RequestExecutor};
use crate::{Error, Result};

type Responder = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync>;

/// Executor that records every request and answers from a closure.
pub(crate) struct MockExecutor {
    calls: AtomicUsize,
    requests: Mutex<Vec<ApiRequest>>,
    delay: Duration,
    responder: Responder,
}

impl MockExecutor {
    pub(crate) fn new(
        responder: impl Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
            responder: Box::new(responder),
        }
    }

    /// Always answer 200 with `body`.
    pub(crate) fn json(body: Value) -> Self {
        Self::new(move |_| Ok(ApiResponse::new(200, Some(body.clone()))))
    }

    /// Always fail with `status`.
    pub(crate) fn failing(status: u16) -> Self {
        Self::new(move |_| {
            Err(Error::from_api_response(
                status,
                serde_json::json!({ "error": "invalid_grant" }),
            ))
        })
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_form_value(&self, key: &str) -> Option<String> {
        let requests = self.requests();
        match requests.last().and_then(|r| r.body.clone()) {
            Some(RequestBody::Form(pairs)) => pairs
                .into_iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }
}

#[async_trait]
impl RequestExecutor for MockExecutor {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.responder)(&request)
    }
}
