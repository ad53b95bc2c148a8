//! coinpulse server
//!
//! Serves CoinGecko market data shaped for the dashboard front-end

use anyhow::{Context, Result};
use coinpulse::utils::logging::init_logging;
use coinpulse::{create_router, version_info, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Missing base URL or API key is fatal here, before anything is served
    let settings = Settings::new().context("Failed to load server settings")?;

    init_logging(&settings.logging);
    info!("{}", version_info());

    let addr = settings.listen_addr();
    let app = create_router(settings)
        .await
        .context("Failed to create router")?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🚀 coinpulse server started!");
    info!("📝 Health check: http://{}/health", addr);
    info!("📈 Overview endpoint: http://{}/api/coins/bitcoin/overview", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    Ok(())
}
