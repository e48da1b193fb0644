//! PULSE action -> Kraken request mapping.

use serde_json::{json, Map, Value};

use super::endpoints;
use crate::error::{AdapterError, AdapterResult};
use crate::exchanges::NativeRequest;
use crate::message::Action;

const QUERY_TYPES: &str = "price, 24h, klines, depth";
const DEFAULT_INTERVAL: u64 = 60;
const DEFAULT_DEPTH: u64 = 20;

pub fn supported_actions() -> Vec<&'static str> {
    Action::ALL.iter().map(Action::as_str).collect()
}

/// Build the Kraken request for `action`.
pub fn to_native(action: &str, params: &Map<String, Value>) -> AdapterResult<NativeRequest> {
    let action = Action::parse(action).ok_or_else(|| AdapterError::UnsupportedAction {
        action: action.to_string(),
        supported: supported_actions(),
    })?;

    match action {
        Action::QueryData => build_query_request(params),
        Action::TransactRequest => build_order_request(params),
        Action::Cancel => build_cancel_request(params),
        Action::QueryStatus => build_status_request(params),
        Action::QueryList => Ok(NativeRequest::signed_post(endpoints::OPEN_ORDERS, Map::new())),
        Action::QueryBalance => Ok(NativeRequest::signed_post(endpoints::BALANCE, Map::new())),
    }
}

fn build_query_request(params: &Map<String, Value>) -> AdapterResult<NativeRequest> {
    let symbol = optional_str(params, "symbol")?;
    let query_type = str_or_default(params, "type", "price")?;

    match query_type {
        "price" | "24h" => {
            let mut req_params = Map::new();
            if let Some(symbol) = symbol {
                req_params.insert("pair".into(), symbol.to_uppercase().into());
            }
            Ok(NativeRequest::get(endpoints::TICKER, req_params))
        }
        "klines" => {
            let symbol = symbol.ok_or(AdapterError::MissingParameter {
                field: "symbol",
                operation: "klines query",
            })?;
            let mut req_params = Map::new();
            req_params.insert("pair".into(), symbol.to_uppercase().into());
            req_params.insert("interval".into(), passthrough(params, "interval", DEFAULT_INTERVAL));
            Ok(NativeRequest::get(endpoints::OHLC, req_params))
        }
        "depth" => {
            let symbol = symbol.ok_or(AdapterError::MissingParameter {
                field: "symbol",
                operation: "depth query",
            })?;
            let mut req_params = Map::new();
            req_params.insert("pair".into(), symbol.to_uppercase().into());
            req_params.insert("count".into(), passthrough(params, "limit", DEFAULT_DEPTH));
            Ok(NativeRequest::get(endpoints::DEPTH, req_params))
        }
        other => Err(AdapterError::InvalidParameters(format!(
            "Unknown query type '{}'. Use: {}.",
            other, QUERY_TYPES
        ))),
    }
}

fn build_order_request(params: &Map<String, Value>) -> AdapterResult<NativeRequest> {
    const OPERATION: &str = "order placement";

    for field in ["symbol", "side", "quantity"] {
        if !is_present(params, field) {
            return Err(AdapterError::MissingParameter {
                field,
                operation: OPERATION,
            });
        }
    }

    let symbol = require_str(params, "symbol", OPERATION)?;
    let side = require_str(params, "side", OPERATION)?;
    let order_type = str_or_default(params, "order_type", "market")?.to_lowercase();
    let volume = require_scalar(params, "quantity", OPERATION)?;

    let mut order_params = Map::new();
    order_params.insert("pair".into(), symbol.to_uppercase().into());
    order_params.insert("type".into(), side.to_lowercase().into());
    order_params.insert("ordertype".into(), order_type.clone().into());
    order_params.insert("volume".into(), volume.into());

    if order_type == "limit" {
        let price = require_scalar(params, "price", "limit order")?;
        order_params.insert("price".into(), price.into());
    }

    Ok(NativeRequest::signed_post(endpoints::ADD_ORDER, order_params))
}

fn build_cancel_request(params: &Map<String, Value>) -> AdapterResult<NativeRequest> {
    let txid = require_scalar(params, "order_id", "order cancellation")?;
    Ok(NativeRequest::signed_post(
        endpoints::CANCEL_ORDER,
        txid_params(txid),
    ))
}

fn build_status_request(params: &Map<String, Value>) -> AdapterResult<NativeRequest> {
    let txid = require_scalar(params, "order_id", "order status query")?;
    Ok(NativeRequest::signed_post(
        endpoints::QUERY_ORDERS,
        txid_params(txid),
    ))
}

fn txid_params(txid: String) -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("txid".into(), txid.into());
    params
}

// =============================================================================
// Parameter access
// =============================================================================

/// Wire form of a parameter value. Kraken expects decimal strings, so numbers
/// are rendered once here and strings pass through unchanged.
///
/// Floats use serde_json's shortest form, which goes to exponent notation
/// below 1e-5 (`1e-7`). Callers needing exact decimals should send strings.
pub(crate) fn to_wire_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Null and empty strings count as absent.
fn is_present(params: &Map<String, Value>, field: &str) -> bool {
    match params.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn optional_str<'a>(params: &'a Map<String, Value>, field: &str) -> AdapterResult<Option<&'a str>> {
    if !is_present(params, field) {
        return Ok(None);
    }
    match params.get(field) {
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        _ => Err(AdapterError::InvalidParameters(format!(
            "'{}' must be a string",
            field
        ))),
    }
}

/// `default` applies only when the key is absent. An explicit `null` or `""`
/// is rejected rather than silently replaced.
fn str_or_default<'a>(
    params: &'a Map<String, Value>,
    field: &str,
    default: &'static str,
) -> AdapterResult<&'a str> {
    match params.get(field) {
        None => Ok(default),
        Some(Value::String(s)) if !s.is_empty() => Ok(s.as_str()),
        Some(other) => Err(AdapterError::InvalidParameters(format!(
            "'{}' must be a non-empty string, got {}",
            field, other
        ))),
    }
}

fn require_str<'a>(
    params: &'a Map<String, Value>,
    field: &'static str,
    operation: &'static str,
) -> AdapterResult<&'a str> {
    optional_str(params, field)?.ok_or(AdapterError::MissingParameter { field, operation })
}

/// A string or number, rendered in wire form.
fn require_scalar(
    params: &Map<String, Value>,
    field: &'static str,
    operation: &'static str,
) -> AdapterResult<String> {
    if !is_present(params, field) {
        return Err(AdapterError::MissingParameter { field, operation });
    }
    match params.get(field) {
        Some(value @ (Value::String(_) | Value::Number(_))) => Ok(to_wire_string(value)),
        _ => Err(AdapterError::InvalidParameters(format!(
            "'{}' must be a string or number",
            field
        ))),
    }
}

fn passthrough(params: &Map<String, Value>, field: &str, default: u64) -> Value {
    match params.get(field) {
        Some(value) if !value.is_null() => value.clone(),
        _ => json!(default),
    }
}
