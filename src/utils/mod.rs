pub(crate) mod api_key_man;
pub mod nonce;
pub mod request_log;
