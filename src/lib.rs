//! # Trip Flights
//!
//! Flight search proxy for a travel-planning frontend. Trip parameters are
//! forwarded to the SerpAPI Google Flights engine and the vendor JSON is
//! normalized into a stable [`FlightSearchResult`].
//!
//! The same [`FlightProxy`] serves every host environment: the standalone
//! axum server in [`server`], the serverless adapter in [`lambda`], and
//! direct library calls through [`get_flights`].

pub mod airports;
pub mod client;
pub mod config;
pub mod handler;
pub mod lambda;
pub mod logging;
pub mod normalize;
pub mod server;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// Re-export main types for convenience
pub use airports::resolve_airport_code;
pub use client::{FlightClient, FlightSearch, SERPAPI_ENDPOINT};
pub use config::ProxyConfig;
pub use handler::{FlightProxy, ProxyExchange, ProxyParams, ProxyResponse};
pub use normalize::normalize;

/// Error types for the flights library
#[derive(Error, Debug)]
pub enum FlightError {
    #[error("API key is required")]
    MissingCredential,

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// Query string that could not be read, carrying the extractor's message
    #[error("{0}")]
    InvalidQuery(String),

    #[error("SerpAPI Error: {status}")]
    UpstreamHttp { status: u16 },

    #[error("Upstream response is not valid JSON: {0}")]
    UpstreamFormat(#[source] serde_json::Error),

    #[error("{0}")]
    UpstreamApi(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid upstream endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),
}

impl FlightError {
    /// HTTP status reported to the caller for this error.
    ///
    /// Only caller mistakes are distinguished; every upstream, transport
    /// and parse failure collapses to `500`.
    pub fn status_code(&self) -> StatusCode {
        match self {
            FlightError::MissingCredential
            | FlightError::MissingParameter(_)
            | FlightError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Validated search parameters for a single upstream call
#[derive(Clone, PartialEq, Eq)]
pub struct FlightSearchRequest {
    pub origin_code: String,
    pub destination_code: String,
    pub outbound_date: String,      // YYYY-MM-DD
    pub return_date: Option<String>, // None => one-way
    pub api_key: String,
}

impl FlightSearchRequest {
    pub fn new(
        origin_code: impl Into<String>,
        destination_code: impl Into<String>,
        outbound_date: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            origin_code: origin_code.into(),
            destination_code: destination_code.into(),
            outbound_date: outbound_date.into(),
            return_date: None,
            api_key: api_key.into(),
        }
    }

    pub fn with_return_date(mut self, return_date: impl Into<String>) -> Self {
        self.return_date = Some(return_date.into());
        self
    }

    pub fn is_one_way(&self) -> bool {
        self.return_date.is_none()
    }
}

// The credential must never reach logs through `{:?}`.
impl fmt::Debug for FlightSearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlightSearchRequest")
            .field("origin_code", &self.origin_code)
            .field("destination_code", &self.destination_code)
            .field("outbound_date", &self.outbound_date)
            .field("return_date", &self.return_date)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Normalized flight search result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightSearchResult {
    /// Options in upstream ranking order
    #[serde(rename = "best_flights")]
    pub best_options: Vec<FlightOption>,
}

/// One bookable itinerary made of one or more legs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOption {
    #[serde(rename = "flights")]
    pub legs: Vec<FlightLeg>,
    pub layovers: Vec<Layover>,
    #[serde(rename = "total_duration")]
    pub total_duration_minutes: i64,
    pub carbon_emissions: CarbonEmissions,
    /// Upstream number, kept as sent (USD)
    pub price: serde_json::Number,
    #[serde(rename = "type")]
    pub trip_type: String,
    pub airline_logo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_token: Option<String>,
}

impl FlightOption {
    pub fn price_usd(&self) -> f64 {
        self.price.as_f64().unwrap_or(0.0)
    }

    /// Google Flights deep link for this option, or `None` without legs.
    pub fn booking_url(&self) -> Option<String> {
        let first = self.legs.first()?;
        let last = self.legs.last()?;
        let date = first
            .departure_airport
            .local_time
            .split(' ')
            .next()
            .unwrap_or_default();

        Some(format!(
            "https://www.google.com/flights?hl=en#flt={}.{}.{}",
            first.departure_airport.airport_code, last.arrival_airport.airport_code, date
        ))
    }
}

/// A single non-stop segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightLeg {
    pub departure_airport: AirportEvent,
    pub arrival_airport: AirportEvent,
    #[serde(rename = "duration")]
    pub duration_minutes: i64,
    #[serde(rename = "airplane")]
    pub aircraft_model: String,
    #[serde(rename = "airline")]
    pub airline_name: String,
    pub airline_logo: String,
    pub travel_class: String,
    pub flight_number: String,
    #[serde(rename = "legroom")]
    pub legroom_description: String,
    #[serde(rename = "extensions")]
    pub notes: Vec<String>,
    #[serde(default, rename = "overnight", skip_serializing_if = "Option::is_none")]
    pub is_overnight: Option<bool>,
}

/// Departure or arrival at an airport
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportEvent {
    #[serde(rename = "name")]
    pub airport_name: String,
    #[serde(rename = "id")]
    pub airport_code: String,
    /// Upstream local datetime, e.g. "2025-07-01 06:10"
    #[serde(rename = "time")]
    pub local_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layover {
    #[serde(rename = "duration")]
    pub duration_minutes: i64,
    #[serde(rename = "name")]
    pub airport_name: String,
    #[serde(rename = "id")]
    pub airport_code: String,
}

/// Emissions in grams, compared against the typical flight for the route
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarbonEmissions {
    #[serde(rename = "this_flight")]
    pub this_flight_grams: i64,
    #[serde(rename = "typical_for_this_route")]
    pub typical_for_route_grams: i64,
    pub difference_percent: i64,
}

impl CarbonEmissions {
    /// Signed percentage label, e.g. "+12%" or "-5%"
    pub fn difference_label(&self) -> String {
        if self.difference_percent > 0 {
            format!("+{}%", self.difference_percent)
        } else {
            format!("{}%", self.difference_percent)
        }
    }
}

/// Render minutes as "{h}h {m}m"
pub fn format_duration(minutes: i64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Main public API function: one upstream call against the default endpoint
pub async fn get_flights(request: FlightSearchRequest) -> Result<FlightSearchResult, FlightError> {
    let client = FlightClient::new()?;
    client.search(&request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(from: &str, to: &str, departs: &str) -> FlightLeg {
        FlightLeg {
            departure_airport: AirportEvent {
                airport_code: from.to_string(),
                local_time: departs.to_string(),
                ..Default::default()
            },
            arrival_airport: AirportEvent {
                airport_code: to.to_string(),
                ..Default::default()
            },
            duration_minutes: 0,
            aircraft_model: String::new(),
            airline_name: String::new(),
            airline_logo: String::new(),
            travel_class: "Economy".to_string(),
            flight_number: String::new(),
            legroom_description: String::new(),
            notes: Vec::new(),
            is_overnight: None,
        }
    }

    fn option(legs: Vec<FlightLeg>) -> FlightOption {
        FlightOption {
            legs,
            layovers: Vec::new(),
            total_duration_minutes: 0,
            carbon_emissions: CarbonEmissions::default(),
            price: serde_json::Number::from(455),
            trip_type: "One way".to_string(),
            airline_logo: String::new(),
            booking_token: None,
        }
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(FlightError::MissingCredential.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            FlightError::MissingParameter("arrival_id").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            FlightError::InvalidQuery("duplicate field `api_key`".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            FlightError::UpstreamHttp { status: 503 }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            FlightError::UpstreamApi("Invalid API key.".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_api_error_is_verbatim() {
        let err = FlightError::UpstreamApi("Invalid API key. Your API key should be here".to_string());
        assert_eq!(err.to_string(), "Invalid API key. Your API key should be here");
    }

    #[test]
    fn test_request_debug_redacts_api_key() {
        let request = FlightSearchRequest::new("BOM", "DPS", "2025-07-01", "secret-key");
        let debug = format!("{:?}", request);
        assert!(debug.contains("BOM"));
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn test_request_one_way() {
        let request = FlightSearchRequest::new("BOM", "DPS", "2025-07-01", "k");
        assert!(request.is_one_way());
        assert!(!request.with_return_date("2025-07-10").is_one_way());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0h 0m");
        assert_eq!(format_duration(75), "1h 15m");
        assert_eq!(format_duration(905), "15h 5m");
    }

    #[test]
    fn test_difference_label() {
        let mut emissions = CarbonEmissions::default();
        assert_eq!(emissions.difference_label(), "0%");
        emissions.difference_percent = 12;
        assert_eq!(emissions.difference_label(), "+12%");
        emissions.difference_percent = -5;
        assert_eq!(emissions.difference_label(), "-5%");
    }

    #[test]
    fn test_booking_url_spans_first_and_last_leg() {
        let option = option(vec![
            leg("BOM", "SGN", "2025-07-01 06:10"),
            leg("SGN", "DPS", "2025-07-01 15:00"),
        ]);
        assert_eq!(
            option.booking_url().as_deref(),
            Some("https://www.google.com/flights?hl=en#flt=BOM.DPS.2025-07-01")
        );
    }

    #[test]
    fn test_booking_url_without_legs() {
        assert!(option(Vec::new()).booking_url().is_none());
    }

    #[test]
    fn test_integral_price_serializes_as_integer() {
        let json = serde_json::to_value(option(Vec::new())).unwrap();
        assert_eq!(json["price"], serde_json::json!(455));
        assert_eq!(json["type"], "One way");
        assert!(json.get("booking_token").is_none());
    }
}
