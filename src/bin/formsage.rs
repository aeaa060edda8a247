//! FormSage Gateway binary.
//!
//! Serves the dashboard API: pass-through query proxies and the fail-soft
//! metrics views, fronting the external document backend.

use formsage::server::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Local development keeps the backend URL in a .env file
    dotenvy::dotenv().ok();

    let config = GatewayConfig::load()?;

    formsage::server::start_server(config).await?;

    Ok(())
}
