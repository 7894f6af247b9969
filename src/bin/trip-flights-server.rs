//! Standalone flight search proxy server
//!
//! # Configuration
//!
//! - `SERPAPI_API_KEY` - fallback credential for requests without `api_key`
//! - `SERPAPI_ENDPOINT` - upstream search URL (default: SerpAPI)
//! - `PORT` - HTTP port (default: 3001)
//! - `RUST_LOG`, `LOG_FORMAT`, `LOG_DIR` - logging

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use trip_flights::logging::{init_logging, LoggingConfig};
use trip_flights::{server, FlightClient, FlightProxy, ProxyConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(&LoggingConfig::from_env()).context("failed to initialize logging")?;

    let config = ProxyConfig::from_env();
    if !config.has_fallback_api_key() {
        warn!("SERPAPI_API_KEY is not set; requests must carry api_key");
    }

    let client = FlightClient::with_endpoint(&config.endpoint)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(addr = %addr, endpoint = %client.endpoint(), "Starting flight proxy");

    let proxy = Arc::new(FlightProxy::new(client, config.fallback_api_key.clone()));

    server::serve(proxy, addr).await?;
    Ok(())
}
