//! Kraken REST adapter
//!
//! Translates PULSE actions to Kraken's REST API:
//! - Public market data (ticker, OHLC, order book) over GET
//! - Private account and order endpoints over signed POST
//!
//! Kraken wraps every response as `{"error": [...], "result": ...}`; a
//! non-empty error list always wins over the result.

pub mod sign;
pub mod translate;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

use super::transport::{HttpCall, HttpTransport, ReqwestTransport};
use super::{ExchangeAdapter, NativeRequest};
use crate::config::{AdapterConfig, Credentials};
use crate::error::{AdapterError, AdapterResult};
use crate::message::PulseMessage;
use crate::utils::nonce::NonceGenerator;
use crate::utils::request_log::{RequestLog, RequestRecord};

const EXCHANGE_NAME: &str = "kraken";
const REQUEST_LOG_SIZE: usize = 64;

/// Kraken REST API paths
pub mod endpoints {
    pub const TICKER: &str = "/0/public/Ticker";
    pub const OHLC: &str = "/0/public/OHLC";
    pub const DEPTH: &str = "/0/public/Depth";
    pub const SERVER_TIME: &str = "/0/public/Time";
    pub const BALANCE: &str = "/0/private/Balance";
    pub const ADD_ORDER: &str = "/0/private/AddOrder";
    pub const CANCEL_ORDER: &str = "/0/private/CancelOrder";
    pub const OPEN_ORDERS: &str = "/0/private/OpenOrders";
    pub const QUERY_ORDERS: &str = "/0/private/QueryOrders";
}

impl From<sign::SignError> for AdapterError {
    fn from(err: sign::SignError) -> Self {
        AdapterError::failure("cannot sign request", err)
    }
}

pub struct KrakenAdapter {
    config: AdapterConfig,
    credentials: Credentials,
    transport: Arc<dyn HttpTransport>,
    connected: bool,
    nonces: NonceGenerator,
    request_count: AtomicU64,
    request_log: Mutex<RequestLog<REQUEST_LOG_SIZE>>,
}

impl KrakenAdapter {
    /// Adapter talking to Kraken over `reqwest`.
    pub fn new(credentials: Credentials, config: AdapterConfig) -> Self {
        let transport = Arc::new(ReqwestTransport::new(config.timeout));
        Self::with_transport(credentials, config, transport)
    }

    pub fn with_transport(
        credentials: Credentials,
        config: AdapterConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            config,
            credentials,
            transport,
            connected: false,
            nonces: NonceGenerator::new(),
            request_count: AtomicU64::new(0),
            request_log: Mutex::new(RequestLog::new(EXCHANGE_NAME.to_string())),
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Most recent calls, oldest first.
    pub fn recent_requests(&self) -> Vec<RequestRecord> {
        self.lock_log().records()
    }

    pub fn request_log_json(&self) -> Result<String, serde_json::Error> {
        self.lock_log().serialize_to_json()
    }

    fn lock_log(&self) -> std::sync::MutexGuard<'_, RequestLog<REQUEST_LOG_SIZE>> {
        self.request_log.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url, endpoint)
    }

    /// Encode (and for private endpoints, sign) a native request.
    fn build_call(&self, request: NativeRequest) -> AdapterResult<HttpCall> {
        let NativeRequest {
            method,
            endpoint,
            mut params,
            signed,
        } = request;
        let url = self.url(&endpoint);

        match method {
            Method::GET => Ok(HttpCall::get(url, sign::encode_params(&params)?)),
            Method::POST if signed => {
                let (api_key, api_secret) = self
                    .credentials
                    .pair()
                    .ok_or(AdapterError::MissingCredentials)?;

                let nonce = self.nonces.next();
                params.insert("nonce".to_string(), Value::String(nonce.clone()));

                let (body, headers) =
                    sign::sign_request(&endpoint, &nonce, &params, api_key, api_secret)?;
                let [api_key_header, api_sign_header] = headers.into_pairs();

                Ok(HttpCall::post(url, body)
                    .header(api_key_header.0, api_key_header.1)
                    .header(api_sign_header.0, api_sign_header.1))
            }
            Method::POST => Ok(HttpCall::post(url, sign::encode_params(&params)?)),
            other => Err(AdapterError::UnsupportedMethod(other.to_string())),
        }
    }

    async fn execute(&self, request: NativeRequest) -> AdapterResult<Value> {
        let call = self.build_call(request)?;
        let response = self.transport.execute(call).await?;

        let envelope: Value = serde_json::from_str(&response.body).map_err(|e| {
            AdapterError::failure(format!("invalid JSON response (HTTP {})", response.status), e)
        })?;

        unwrap_envelope(envelope)
    }
}

/// Error strings from an envelope's `error` field.
pub fn envelope_errors(envelope: &Value) -> Vec<String> {
    match envelope.get("error") {
        Some(Value::Array(errors)) => errors
            .iter()
            .map(|e| match e {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(error)) if !error.is_empty() => vec![error.clone()],
        _ => Vec::new(),
    }
}

/// Extract the payload from a Kraken envelope.
///
/// Returns `result` when present, otherwise the envelope itself.
pub fn unwrap_envelope(envelope: Value) -> AdapterResult<Value> {
    let errors = envelope_errors(&envelope);
    if !errors.is_empty() {
        return Err(AdapterError::RemoteError(errors.join("; ")));
    }

    match envelope {
        Value::Object(mut map) => match map.remove("result") {
            Some(result) => Ok(result),
            None => Ok(Value::Object(map)),
        },
        other => Err(AdapterError::failure(
            "unexpected response shape",
            format!("expected a JSON object, got: {}", other),
        )),
    }
}

#[async_trait]
impl ExchangeAdapter for KrakenAdapter {
    fn name(&self) -> &str {
        EXCHANGE_NAME
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    #[instrument(skip(self))]
    async fn connect(&mut self) -> AdapterResult<()> {
        let call = HttpCall::get(self.url(endpoints::SERVER_TIME), String::new());
        let response = self
            .transport
            .execute(call)
            .await
            .map_err(|e| AdapterError::ConnectionFailure(e.to_string()))?;

        if !response.is_success() {
            warn!(status = response.status, "Server time check failed");
            return Err(AdapterError::ConnectionFailure(format!(
                "Kraken API error: HTTP {}",
                response.status
            )));
        }

        let envelope: Value = serde_json::from_str(&response.body)
            .map_err(|e| AdapterError::failure("invalid server time response", e))?;

        let errors = envelope_errors(&envelope);
        if !errors.is_empty() {
            return Err(AdapterError::ConnectionFailure(format!(
                "Kraken API error: {}",
                errors.join("; ")
            )));
        }

        self.connected = true;
        info!(
            base_url = %self.config.base_url,
            server_time = ?envelope.pointer("/result/unixtime"),
            "Connected to Kraken"
        );
        Ok(())
    }

    async fn disconnect(&mut self) {
        if self.connected {
            debug!("Disconnecting from Kraken");
        }
        self.connected = false;
    }

    fn to_native(&self, message: &PulseMessage) -> AdapterResult<NativeRequest> {
        translate::to_native(message.action(), message.parameters())
    }

    #[instrument(skip(self, request), fields(endpoint = %request.endpoint, signed = request.signed))]
    async fn call_api(&self, request: NativeRequest) -> AdapterResult<Value> {
        let endpoint = request.endpoint.clone();
        let signed = request.signed;

        let result = self.execute(request).await;

        match &result {
            Ok(_) => debug!("Kraken call succeeded"),
            Err(e) => warn!(error = %e, "Kraken call failed"),
        }
        self.lock_log()
            .add_record(RequestRecord::now(&endpoint, signed, result.is_ok()));

        result
    }

    fn supported_actions(&self) -> Vec<&'static str> {
        translate::supported_actions()
    }

    fn request_counter(&self) -> &AtomicU64 {
        &self.request_count
    }
}

impl fmt::Debug for KrakenAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KrakenAdapter")
            .field("connected", &self.connected)
            .finish()
    }
}
