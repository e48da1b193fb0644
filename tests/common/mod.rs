//! In-process transport fake shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use pulse_kraken::{
    AdapterConfig, Credentials, HttpCall, HttpResponse, HttpTransport, KrakenAdapter,
    TransportError,
};

// base64("test-secret")
pub const TEST_SECRET: &str = "dGVzdC1zZWNyZXQ=";

/// Replays queued responses in order and records every call it receives.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    calls: Mutex<Vec<HttpCall>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, response: Result<HttpResponse, TransportError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Queue a Kraken envelope with the given result and errors.
    pub fn push_envelope(&self, result: Value, errors: &[&str]) {
        let body = json!({"error": errors, "result": result}).to_string();
        self.push(Ok(HttpResponse::ok(body)));
    }

    pub fn calls(&self) -> Vec<HttpCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> HttpCall {
        self.calls().pop().expect("no calls recorded")
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, call: HttpCall) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(call);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::ok(r#"{"error":[],"result":{}}"#)))
    }
}

pub fn adapter_with(credentials: Credentials, transport: &Arc<MockTransport>) -> KrakenAdapter {
    KrakenAdapter::with_transport(credentials, AdapterConfig::default(), transport.clone())
}

/// Adapter with test credentials, already marked connected.
pub async fn connected_adapter(transport: &Arc<MockTransport>) -> KrakenAdapter {
    use pulse_kraken::ExchangeAdapter;

    let mut adapter = adapter_with(Credentials::new("test-key", TEST_SECRET), transport);
    transport.push_envelope(json!({"unixtime": 1700000000, "rfc1123": "Tue, 14 Nov 23 22:13:20 +0000"}), &[]);
    adapter.connect().await.expect("connect");
    adapter
}
