//! HTTP client for the SerpAPI Google Flights engine

use crate::normalize::normalize;
use crate::{FlightError, FlightSearchRequest, FlightSearchResult};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

/// Default upstream search endpoint
pub const SERPAPI_ENDPOINT: &str = "https://serpapi.com/search.json";

const ENGINE: &str = "google_flights";
const CURRENCY: &str = "USD";
const LANGUAGE: &str = "en";
/// Upstream trip type for one-way searches
const ONE_WAY_TYPE: &str = "2";

/// Anything that can run a flight search.
///
/// The proxy handler only depends on this trait, so tests can swap the
/// network client for an in-memory double.
#[async_trait]
pub trait FlightSearch: Send + Sync {
    async fn search(&self, request: &FlightSearchRequest) -> Result<FlightSearchResult, FlightError>;
}

/// Main flight client for making requests to SerpAPI
#[derive(Debug, Clone)]
pub struct FlightClient {
    http_client: Client,
    endpoint: Url,
}

impl FlightClient {
    /// Create a client for the public SerpAPI endpoint
    pub fn new() -> Result<Self, FlightError> {
        Self::with_endpoint(SERPAPI_ENDPOINT)
    }

    /// Create a client for a custom endpoint (e.g. a local stub)
    pub fn with_endpoint(endpoint: &str) -> Result<Self, FlightError> {
        debug!(endpoint, "Creating new flight client");
        let endpoint = Url::parse(endpoint)
            .map_err(|e| FlightError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        let http_client = Client::builder()
            .user_agent(concat!("trip-flights/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build the upstream query URL. Every value is percent-encoded.
    pub fn search_url(&self, request: &FlightSearchRequest) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("engine", ENGINE)
                .append_pair("departure_id", &request.origin_code)
                .append_pair("arrival_id", &request.destination_code)
                .append_pair("outbound_date", &request.outbound_date);

            match &request.return_date {
                Some(return_date) => {
                    query.append_pair("return_date", return_date);
                }
                None => {
                    query.append_pair("type", ONE_WAY_TYPE);
                }
            }

            query
                .append_pair("currency", CURRENCY)
                .append_pair("hl", LANGUAGE)
                .append_pair("api_key", &request.api_key);
        }
        url
    }
}

#[async_trait]
impl FlightSearch for FlightClient {
    #[instrument(
        level = "info",
        skip(self, request),
        fields(
            from = %request.origin_code,
            to = %request.destination_code,
            outbound = %request.outbound_date,
        )
    )]
    async fn search(&self, request: &FlightSearchRequest) -> Result<FlightSearchResult, FlightError> {
        let url = self.search_url(request);
        info!(endpoint = %self.endpoint, one_way = request.is_one_way(), "Making HTTP request to SerpAPI");

        let start_time = std::time::Instant::now();
        let response = self.http_client.get(url).send().await?;
        let status = response.status();

        info!(
            status = %status,
            duration_ms = start_time.elapsed().as_millis(),
            "HTTP request completed"
        );

        if !status.is_success() {
            error!(status = %status, "SerpAPI request failed");
            return Err(FlightError::UpstreamHttp {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!(body_length = body.len(), "Received response body");

        let raw: Value = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "SerpAPI response is not JSON");
            FlightError::UpstreamFormat(e)
        })?;

        if let Some(message) = upstream_error(&raw) {
            error!(message = %message, "SerpAPI reported an error");
            return Err(FlightError::UpstreamApi(message));
        }

        let result = normalize(&raw);
        info!(flights_found = result.best_options.len(), "Flight search completed");
        Ok(result)
    }
}

/// Top-level `error` field of an upstream body, if any
fn upstream_error(raw: &Value) -> Option<String> {
    match raw.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}
