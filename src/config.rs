//! Adapter configuration and credentials.
//!
//! Both can be built directly or loaded from environment variables:
//!
//! - `KRAKEN_BASE_URL`: API base URL (default: https://api.kraken.com)
//! - `KRAKEN_TIMEOUT_MS`: per-request timeout (default: 10000)
//! - `KRAKEN_API_KEY` / `KRAKEN_API_SECRET`: credentials for private endpoints

use serde_json::{Map, Value};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::utils::api_key_man;

/// Kraken REST API base URL
pub const KRAKEN_API_URL: &str = "https://api.kraken.com";

/// Request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {name}: {value}")]
    InvalidVar { name: &'static str, value: String },

    #[error("Cannot read credentials file {}: {source}", .path.display())]
    CredentialsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Connection settings for an adapter.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Caller-supplied settings, carried along untouched
    pub options: Map<String, Value>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            base_url: KRAKEN_API_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            options: Map::new(),
        }
    }
}

impl AdapterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = get("KRAKEN_BASE_URL").filter(|u| !u.is_empty()) {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = get("KRAKEN_TIMEOUT_MS") {
            let millis = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidVar {
                    name: "KRAKEN_TIMEOUT_MS",
                    value: raw.clone(),
                })?;
            config.timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

/// API key and base64-encoded secret. Either may be absent; only signed
/// calls need both.
#[derive(Clone, Default)]
pub struct Credentials {
    api_key: Option<String>,
    api_secret: Option<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self::from_parts(Some(api_key.into()), Some(api_secret.into()))
    }

    /// Empty strings are treated as missing.
    pub fn from_parts(api_key: Option<String>, api_secret: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            api_secret: api_secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_parts(
            env::var("KRAKEN_API_KEY").ok(),
            env::var("KRAKEN_API_SECRET").ok(),
        )
    }

    /// Read `api_key:` / `api_sec:` lines from a credentials file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let (api_key, api_sec) = api_key_man::read_api_credentials_from_file(path).map_err(
            |source| ConfigError::CredentialsFile {
                path: path.to_path_buf(),
                source,
            },
        )?;
        Ok(Self::from_parts(Some(api_key), Some(api_sec)))
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn api_secret(&self) -> Option<&str> {
        self.api_secret.as_deref()
    }

    /// Both halves, if both are configured.
    pub fn pair(&self) -> Option<(&str, &str)> {
        Some((self.api_key()?, self.api_secret()?))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AdapterConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config.base_url, "https://api.kraken.com");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.options.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = AdapterConfig::from_vars(vars(&[
            ("KRAKEN_BASE_URL", "http://127.0.0.1:8080/"),
            ("KRAKEN_TIMEOUT_MS", "2500"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = AdapterConfig::from_vars(vars(&[("KRAKEN_TIMEOUT_MS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("KRAKEN_TIMEOUT_MS"));

        assert!(AdapterConfig::from_vars(vars(&[("KRAKEN_TIMEOUT_MS", "0")])).is_err());
    }

    #[test]
    fn test_credentials_empty_strings_are_missing() {
        let creds = Credentials::new("key", "");
        assert_eq!(creds.api_key(), Some("key"));
        assert_eq!(creds.api_secret(), None);
        assert!(creds.pair().is_none());

        assert!(Credentials::default().pair().is_none());
        assert_eq!(Credentials::new("k", "s").pair(), Some(("k", "s")));
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("test-key", "dGVzdC1zZWNyZXQ=");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("test-key"));
        assert!(!debug.contains("dGVzdC1zZWNyZXQ="));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_credentials_from_missing_file() {
        let err = Credentials::from_file("/nonexistent/kraken_api_key").unwrap_err();
        assert!(matches!(err, ConfigError::CredentialsFile { .. }));
    }
}
