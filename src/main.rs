//! Send a single PULSE message to Kraken.
//!
//! ```bash
//! pulse-kraken ACT.QUERY.DATA '{"symbol": "XBTUSD"}'
//! KRAKEN_CREDENTIALS_FILE=config/kraken_api_key pulse-kraken ACT.QUERY.BALANCE
//! ```
//!
//! Credentials come from `KRAKEN_CREDENTIALS_FILE` when set, otherwise from
//! `KRAKEN_API_KEY` / `KRAKEN_API_SECRET`.

use anyhow::{bail, Context};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pulse_kraken::{AdapterConfig, Credentials, ExchangeAdapter, KrakenAdapter, PulseMessage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("pulse_kraken=info".parse()?))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(action) = args.next() else {
        bail!("usage: pulse-kraken <ACTION> [PARAMETERS_JSON]");
    };
    let parameters: Value = match args.next() {
        Some(raw) => serde_json::from_str(&raw).context("parameters must be a JSON object")?,
        None => Value::Object(Default::default()),
    };
    if !parameters.is_object() {
        bail!("parameters must be a JSON object");
    }

    let config = AdapterConfig::from_env()?;
    let credentials = match std::env::var("KRAKEN_CREDENTIALS_FILE") {
        Ok(path) => Credentials::from_file(path)?,
        Err(_) => Credentials::from_env(),
    };

    let mut adapter = KrakenAdapter::new(credentials, config);
    adapter.connect().await?;
    info!(action = %action, "Sending message");

    let message = PulseMessage::from_json(action, parameters).with_sender("pulse-kraken-cli");
    let result = adapter.send(&message).await;
    adapter.disconnect().await;

    let response = result?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
