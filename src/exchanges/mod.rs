// Exchange adapter trait and Kraken implementation
pub mod kraken;
pub mod transport;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, instrument};

use crate::error::AdapterResult;
use crate::message::PulseMessage;

/// Exchange-native request produced by an adapter's translator.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeRequest {
    pub method: Method,
    pub endpoint: String,
    /// Parameters in the order they must be encoded
    pub params: Map<String, Value>,
    pub signed: bool,
}

impl NativeRequest {
    pub fn get(endpoint: &str, params: Map<String, Value>) -> Self {
        Self {
            method: Method::GET,
            endpoint: endpoint.to_string(),
            params,
            signed: false,
        }
    }

    pub fn post(endpoint: &str, params: Map<String, Value>) -> Self {
        Self {
            method: Method::POST,
            endpoint: endpoint.to_string(),
            params,
            signed: false,
        }
    }

    pub fn signed_post(endpoint: &str, params: Map<String, Value>) -> Self {
        Self {
            signed: true,
            ..Self::post(endpoint, params)
        }
    }
}

/// Contract shared by every exchange adapter: translate a PULSE message into
/// a native request, execute it, and wrap the result back up.
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    fn name(&self) -> &str;

    fn base_url(&self) -> &str;

    fn is_connected(&self) -> bool;

    /// Open the session and verify the exchange is reachable.
    async fn connect(&mut self) -> AdapterResult<()>;

    /// Close the session. Safe to call repeatedly or without a session.
    async fn disconnect(&mut self);

    fn to_native(&self, message: &PulseMessage) -> AdapterResult<NativeRequest>;

    async fn call_api(&self, request: NativeRequest) -> AdapterResult<Value>;

    fn from_native(&self, response: Value) -> PulseMessage {
        PulseMessage::response(response)
    }

    fn supported_actions(&self) -> Vec<&'static str>;

    fn supports(&self, action: &str) -> bool {
        self.supported_actions().iter().any(|a| *a == action)
    }

    /// Counter of requests issued through [`ExchangeAdapter::send`].
    fn request_counter(&self) -> &AtomicU64;

    fn request_count(&self) -> u64 {
        self.request_counter().load(Ordering::Relaxed)
    }

    /// Full pipeline: translate, call, wrap.
    #[instrument(skip(self, message), fields(action = %message.action()))]
    async fn send(&self, message: &PulseMessage) -> AdapterResult<PulseMessage> {
        let native = self.to_native(message)?;
        self.request_counter().fetch_add(1, Ordering::Relaxed);
        debug!(
            adapter = self.name(),
            action = message.action(),
            sender = message.sender().unwrap_or("-"),
            endpoint = %native.endpoint,
            "Sending request"
        );

        let raw = self.call_api(native).await?;

        Ok(self
            .from_native(raw)
            .with_sender(format!("adapter:{}", self.name())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_post() {
        let req = NativeRequest::signed_post("/0/private/Balance", Map::new());
        assert_eq!(req.method, Method::POST);
        assert!(req.signed);
        assert!(!NativeRequest::post("/0/private/Balance", Map::new()).signed);
        assert!(!NativeRequest::get("/0/public/Time", Map::new()).signed);
    }
}
