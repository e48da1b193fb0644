//! PULSE protocol adapter for the Kraken REST API.
//!
//! Converts PULSE messages (`ACT.QUERY.DATA`, `ACT.TRANSACT.REQUEST`, ...)
//! into Kraken REST calls, signs private requests, and wraps Kraken's
//! `{"error", "result"}` envelope back into an `ACT.RESPOND` message.
//!
//! ```ignore
//! let mut adapter = KrakenAdapter::new(Credentials::from_env(), AdapterConfig::default());
//! adapter.connect().await?;
//! let msg = PulseMessage::from_json("ACT.QUERY.DATA", json!({"symbol": "XBTUSD"}));
//! let response = adapter.send(&msg).await?;
//! ```

pub mod config;
pub mod error;
pub mod exchanges;
pub mod message;
pub mod utils;

pub use config::{AdapterConfig, ConfigError, Credentials};
pub use error::{AdapterError, AdapterResult};
pub use exchanges::kraken::KrakenAdapter;
pub use exchanges::transport::{HttpCall, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use exchanges::{ExchangeAdapter, NativeRequest};
pub use message::{Action, MessageKind, PulseMessage, ACT_RESPOND};
