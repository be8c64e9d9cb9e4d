//! Shared test helpers: an in-memory transport that replays scripted
//! responses and records every request it is given.

#![allow(dead_code)]

use async_trait::async_trait;
use provision_licenses::error::TransportError;
use provision_licenses::execution::http::{HttpTransport, RawHttpResponse, TransportRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<RawHttpResponse>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Transport answering the given responses in order.
    pub fn replying(responses: impl IntoIterator<Item = RawHttpResponse>) -> Arc<Self> {
        let transport = Self::default();
        transport.responses.lock().unwrap().extend(responses);
        Arc::new(transport)
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: TransportRequest) -> Result<RawHttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::Other("no scripted response left".to_string()))
    }
}

pub fn json_response(status: u16, body: serde_json::Value) -> RawHttpResponse {
    RawHttpResponse::new(status)
        .with_header("Content-Type", "application/json")
        .with_body(body.to_string())
}
