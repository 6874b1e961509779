//! Scripted transport for tests.
//!
//! Responses are served in the order they were queued; every request is
//! recorded so tests can assert on what the store sent. A request can be held
//! mid-flight with [`MockTransport::hold_next`] to interleave operations.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};

#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and body.
    pub fn queue_response(&self, status: u16, body: impl Into<String>) {
        lock(&self.responses).push_back(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.into(),
        }));
    }

    /// Queue a response whose body is `value` serialized as JSON.
    pub fn queue_json(&self, status: u16, value: &serde_json::Value) {
        self.queue_response(status, value.to_string());
    }

    /// Queue a failure that never reached the server.
    pub fn queue_transport_error(&self, message: impl Into<String>) {
        lock(&self.responses).push_back(Err(ApiError::Transport(message.into())));
    }

    /// Hold the next request after it has claimed its response. It resumes
    /// once the returned `Notify` is notified.
    pub fn hold_next(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *lock(&self.gate) = Some(Arc::clone(&gate));
        gate
    }

    pub fn recorded_requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    pub fn pending(&self) -> usize {
        lock(&self.responses).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        lock(&self.requests).push(request);
        let response = lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no response queued".to_string())));

        let gate = lock(&self.gate).take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        response
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
