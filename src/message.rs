//! PULSE protocol messages
//!
//! Only the part of the envelope this adapter reads or writes: the action,
//! its parameter bag, and the sender.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Action carried by every response an adapter produces.
pub const ACT_RESPOND: &str = "ACT.RESPOND";

/// Semantic actions an exchange adapter can be asked to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Market data: ticker, OHLC or order book
    QueryData,
    /// Status of a single order
    QueryStatus,
    /// Place an order
    TransactRequest,
    /// Cancel an order
    Cancel,
    /// List open orders
    QueryList,
    /// Account balance
    QueryBalance,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::QueryData,
        Action::QueryStatus,
        Action::TransactRequest,
        Action::Cancel,
        Action::QueryList,
        Action::QueryBalance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::QueryData => "ACT.QUERY.DATA",
            Action::QueryStatus => "ACT.QUERY.STATUS",
            Action::TransactRequest => "ACT.TRANSACT.REQUEST",
            Action::Cancel => "ACT.CANCEL",
            Action::QueryList => "ACT.QUERY.LIST",
            Action::QueryBalance => "ACT.QUERY.BALANCE",
        }
    }

    /// Look up an action by its wire identifier.
    pub fn parse(action: &str) -> Option<Action> {
        Action::ALL.into_iter().find(|a| a.as_str() == action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageKind {
    Request,
    Response,
}

/// A protocol message. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseMessage {
    action: String,
    #[serde(default)]
    parameters: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sender: Option<String>,
    #[serde(rename = "type")]
    kind: MessageKind,
}

impl PulseMessage {
    /// Build a request message.
    pub fn new(action: impl Into<String>, parameters: Map<String, Value>) -> Self {
        Self {
            action: action.into(),
            parameters,
            sender: None,
            kind: MessageKind::Request,
        }
    }

    /// Build a request from a JSON value; anything but an object yields an empty parameter bag.
    pub fn from_json(action: impl Into<String>, parameters: Value) -> Self {
        let parameters = match parameters {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(action, parameters)
    }

    /// Build a response wrapping `result` under `parameters.result`.
    pub fn response(result: Value) -> Self {
        let mut parameters = Map::new();
        parameters.insert("result".to_string(), result);
        Self {
            action: ACT_RESPOND.to_string(),
            parameters,
            sender: None,
            kind: MessageKind::Response,
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn parameters(&self) -> &Map<String, Value> {
        &self.parameters
    }

    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// `parameters.result` of a response message.
    pub fn result(&self) -> Option<&Value> {
        self.parameters.get("result")
    }
}
