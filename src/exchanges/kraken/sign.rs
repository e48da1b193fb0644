//! Kraken private-endpoint authentication.
//!
//! `API-Sign` = base64(HMAC-SHA512(base64_decode(secret), path + SHA256(nonce + body)))
//!
//! The nonce must already be in `params` when the body is encoded: it is part
//! of the signed payload. The digest between the two hashing steps is raw
//! bytes, not hex.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256, Sha512};
use thiserror::Error;

use super::translate::to_wire_string;

type HmacSha512 = Hmac<Sha512>;

pub const API_KEY_HEADER: &str = "API-Key";
pub const API_SIGN_HEADER: &str = "API-Sign";

#[derive(Debug, Error)]
pub enum SignError {
    #[error("API secret is not valid base64: {0}")]
    InvalidSecret(#[from] base64::DecodeError),

    #[error("Cannot encode parameters: {0}")]
    Encoding(#[from] serde_urlencoded::ser::Error),
}

/// Header pair attached to a signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub api_key: String,
    pub api_sign: String,
}

impl SignedHeaders {
    pub fn into_pairs(self) -> [(&'static str, String); 2] {
        [(API_KEY_HEADER, self.api_key), (API_SIGN_HEADER, self.api_sign)]
    }
}

/// Form-encode `params` in insertion order.
pub fn encode_params(params: &Map<String, Value>) -> Result<String, SignError> {
    let pairs: Vec<(&str, String)> = params
        .iter()
        .map(|(k, v)| (k.as_str(), to_wire_string(v)))
        .collect();
    Ok(serde_urlencoded::to_string(pairs)?)
}

/// Base64 `API-Sign` value for an already encoded body.
pub fn signature(
    url_path: &str,
    nonce: &str,
    encoded_body: &str,
    api_secret: &str,
) -> Result<String, SignError> {
    let hash_digest = Sha256::digest(format!("{}{}", nonce, encoded_body).as_bytes());
    let private_key = STANDARD.decode(api_secret)?;

    // HMAC accepts keys of any length
    let mut mac =
        HmacSha512::new_from_slice(&private_key).expect("HMAC can take key of any size");

    let mut hmac_data = url_path.as_bytes().to_vec();
    hmac_data.extend_from_slice(&hash_digest);
    mac.update(&hmac_data);

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Encode `params` and sign them. Returns the exact body that was signed
/// together with the headers to send alongside it.
pub fn sign_request(
    url_path: &str,
    nonce: &str,
    params: &Map<String, Value>,
    api_key: &str,
    api_secret: &str,
) -> Result<(String, SignedHeaders), SignError> {
    let encoded_body = encode_params(params)?;
    let api_sign = signature(url_path, nonce, &encoded_body, api_secret)?;

    Ok((
        encoded_body,
        SignedHeaders {
            api_key: api_key.to_string(),
            api_sign,
        },
    ))
}
