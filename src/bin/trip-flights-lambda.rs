//! Serverless entry point for the flight search proxy.
//!
//! The function answers API-gateway style events; see `trip_flights::lambda`.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use std::sync::Arc;
use tracing::info;

use trip_flights::lambda::{GatewayEvent, GatewayResponse};
use trip_flights::logging::{init_logging, LoggingConfig};
use trip_flights::{FlightClient, FlightProxy, ProxyConfig};

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging(&LoggingConfig::from_env())?;

    // Configuration is read once per cold start and shared by every invocation.
    let config = ProxyConfig::from_env();
    let client = FlightClient::with_endpoint(&config.endpoint)?;
    info!(endpoint = %client.endpoint(), "Flight proxy function initialized");

    let proxy = Arc::new(FlightProxy::new(client, config.fallback_api_key.clone()));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<GatewayEvent>| {
        let proxy = Arc::clone(&proxy);
        async move { handler(&proxy, event).await }
    }))
    .await
}

async fn handler(
    proxy: &FlightProxy<FlightClient>,
    event: LambdaEvent<GatewayEvent>,
) -> Result<GatewayResponse, Error> {
    info!(request_id = %event.context.request_id, "Handling function invocation");
    Ok(proxy.serve(event.payload).await)
}
