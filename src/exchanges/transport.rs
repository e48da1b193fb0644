//! HTTP transport seam.
//!
//! Adapters build a fully encoded [`HttpCall`] and hand it to an
//! [`HttpTransport`]. The default implementation is backed by `reqwest`;
//! tests substitute an in-process fake.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use std::time::Duration;
use thiserror::Error;

use crate::error::AdapterError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A request ready to go on the wire. Query and body are already encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpCall {
    pub method: Method,
    pub url: String,
    pub query: Option<String>,
    pub body: Option<String>,
    pub headers: Vec<(&'static str, String)>,
}

impl HttpCall {
    pub fn get(url: String, query: String) -> Self {
        Self {
            method: Method::GET,
            url,
            query: Some(query).filter(|q| !q.is_empty()),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn post(url: String, body: String) -> Self {
        Self {
            method: Method::POST,
            url,
            query: None,
            body: Some(body),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// URL including the query string.
    pub fn full_url(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.url, query),
            None => self.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failures, before any response body was read.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, TLS handshake failure
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    /// Anything else the HTTP client reported
    #[error("HTTP request failed: {0}")]
    Request(String),
}

impl From<TransportError> for AdapterError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connect(_) | TransportError::Timeout(_) => {
                AdapterError::ConnectionFailure(err.to_string())
            }
            TransportError::Request(_) => AdapterError::failure("transport error", err),
        }
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, call: HttpCall) -> Result<HttpResponse, TransportError>;
}

/// `reqwest`-backed transport with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, call: HttpCall) -> Result<HttpResponse, TransportError> {
        let url = call.full_url();
        let mut builder = self
            .client
            .request(call.method, &url)
            .timeout(self.timeout);

        for (name, value) in call.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = call.body {
            builder = builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE).body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify)?;

        Ok(HttpResponse { status, body })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() || err.is_request() || connection_dropped(&err) {
        // `is_request` covers a peer that accepted the socket and then went
        // away before answering.
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

/// Whether any cause in the chain is an I/O error for a lost connection.
fn connection_dropped(err: &(dyn std::error::Error + 'static)) -> bool {
    use std::io::ErrorKind;

    let mut cause = Some(err);
    while let Some(current) = cause {
        if let Some(io) = current.downcast_ref::<std::io::Error>() {
            if matches!(
                io.kind(),
                ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::BrokenPipe
                    | ErrorKind::UnexpectedEof
            ) {
                return true;
            }
        }
        cause = current.source();
    }
    false
}
