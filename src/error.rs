//! Adapter error types.

use thiserror::Error;

/// Boxed cause carried by [`AdapterError::AdapterFailure`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Errors raised while translating, signing or executing a request.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Action is not in the dispatch table
    #[error("Unsupported action '{action}'. Supported: {}", .supported.join(", "))]
    UnsupportedAction {
        action: String,
        supported: Vec<&'static str>,
    },

    /// A required parameter was not supplied
    #[error("Missing required field '{field}' for {operation}")]
    MissingParameter {
        field: &'static str,
        operation: &'static str,
    },

    /// Parameters were supplied but are not usable
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Signed call attempted without both key and secret
    #[error("API key and secret required for signed requests")]
    MissingCredentials,

    /// Native request carries an HTTP method the exchange is not called with
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Remote host unreachable or the request timed out
    #[error("Cannot reach exchange: {0}")]
    ConnectionFailure(String),

    /// The exchange reported one or more errors in its envelope
    #[error("Exchange error: {0}")]
    RemoteError(String),

    /// Anything else, with the original cause attached
    #[error("Exchange request failed: {message}")]
    AdapterFailure {
        message: String,
        #[source]
        source: BoxError,
    },
}

impl AdapterError {
    pub(crate) fn failure(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::AdapterFailure {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Only network-level failures are worth retrying without changing the request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionFailure(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_unsupported_action_lists_known_set() {
        let err = AdapterError::UnsupportedAction {
            action: "ACT.CREATE.TEXT".to_string(),
            supported: vec!["ACT.QUERY.DATA", "ACT.CANCEL"],
        };
        let msg = err.to_string();
        assert!(msg.contains("ACT.CREATE.TEXT"));
        assert!(msg.contains("ACT.QUERY.DATA, ACT.CANCEL"));
    }

    #[test]
    fn test_missing_parameter_names_field() {
        let err = AdapterError::MissingParameter {
            field: "quantity",
            operation: "order placement",
        };
        assert_eq!(
            err.to_string(),
            "Missing required field 'quantity' for order placement"
        );
    }

    #[test]
    fn test_adapter_failure_keeps_source() {
        let cause = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = AdapterError::failure("invalid JSON", cause);
        assert!(err.source().is_some());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_only_connection_failure_is_retryable() {
        assert!(AdapterError::ConnectionFailure("timed out".into()).is_retryable());
        assert!(!AdapterError::RemoteError("EGeneral:Invalid arguments".into()).is_retryable());
        assert!(!AdapterError::MissingCredentials.is_retryable());
    }

    #[test]
    fn test_messages_do_not_name_an_exchange() {
        let errors = [
            AdapterError::ConnectionFailure("refused".into()),
            AdapterError::RemoteError("EGeneral:Invalid arguments".into()),
            AdapterError::failure("transport error", "channel closed"),
        ];
        for err in errors {
            assert!(!err.to_string().contains("Kraken"), "{}", err);
        }
        assert_eq!(
            AdapterError::RemoteError("EOrder:Unknown order".into()).to_string(),
            "Exchange error: EOrder:Unknown order"
        );
    }
}
