//! Environment-agnostic flight search proxy
//!
//! [`FlightProxy`] holds the whole request flow: preflight short-circuit,
//! credential resolution, parameter validation, the upstream search and
//! mapping of the outcome to a status code and JSON body. Host environments
//! only implement [`ProxyExchange`] to read parameters and write the reply.

use crate::client::FlightSearch;
use crate::{FlightError, FlightSearchRequest, FlightSearchResult};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, warn};

/// Cross-origin headers attached to every response
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

const JSON_CONTENT_TYPE: (&str, &str) = ("Content-Type", "application/json");

/// Inbound query parameters
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyParams {
    pub departure_id: Option<String>,
    pub arrival_id: Option<String>,
    pub outbound_date: Option<String>,
    pub return_date: Option<String>,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ProxyParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyParams")
            .field("departure_id", &self.departure_id)
            .field("arrival_id", &self.arrival_id)
            .field("outbound_date", &self.outbound_date)
            .field("return_date", &self.return_date)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Status, headers and optional JSON body, independent of any server framework
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: Option<Value>,
}

impl ProxyResponse {
    pub fn json(status: StatusCode, body: Value) -> Self {
        let mut headers = CORS_HEADERS.to_vec();
        headers.push(JSON_CONTENT_TYPE);
        Self {
            status,
            headers,
            body: Some(body),
        }
    }

    /// `200` with no body, answering a cross-origin preflight
    pub fn preflight() -> Self {
        Self {
            status: StatusCode::OK,
            headers: CORS_HEADERS.to_vec(),
            body: None,
        }
    }

    pub fn from_result(result: &FlightSearchResult) -> Self {
        match serde_json::to_value(result) {
            Ok(body) => Self::json(StatusCode::OK, body),
            Err(e) => Self::from_error(&FlightError::Encode(e)),
        }
    }

    pub fn from_error(err: &FlightError) -> Self {
        Self::json(err.status_code(), json!({ "error": err.to_string() }))
    }

    #[cfg(test)]
    pub(crate) fn header(&self, name: &str) -> Option<&'static str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }

    /// Serialized body; empty for preflight responses.
    pub fn body_string(&self) -> String {
        self.body.as_ref().map(Value::to_string).unwrap_or_default()
    }
}

/// Boundary between [`FlightProxy`] and a host environment
pub trait ProxyExchange {
    type Output;

    /// True for a cross-origin preflight (`OPTIONS`) request
    fn is_preflight(&self) -> bool;

    fn params(&self) -> ProxyParams;

    fn send_json(self, response: ProxyResponse) -> Self::Output;
}

/// The flight search proxy.
///
/// Stateless across requests; the fallback credential is injected once at
/// construction.
pub struct FlightProxy<C> {
    client: C,
    fallback_api_key: Option<String>,
}

impl<C: FlightSearch> FlightProxy<C> {
    pub fn new(client: C, fallback_api_key: Option<String>) -> Self {
        Self {
            client,
            fallback_api_key: fallback_api_key
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Answer one request through a host adapter
    pub async fn serve<E: ProxyExchange>(&self, exchange: E) -> E::Output {
        let response = if exchange.is_preflight() {
            ProxyResponse::preflight()
        } else {
            self.handle(exchange.params()).await
        };
        exchange.send_json(response)
    }

    /// Run a (non-preflight) search request to completion
    pub async fn handle(&self, params: ProxyParams) -> ProxyResponse {
        info!(
            departure_id = params.departure_id.as_deref(),
            arrival_id = params.arrival_id.as_deref(),
            outbound_date = params.outbound_date.as_deref(),
            return_date = params.return_date.as_deref(),
            "Flight search request received"
        );

        match self.search(params).await {
            Ok(result) => {
                info!(options = result.best_options.len(), "Flight search succeeded");
                ProxyResponse::from_result(&result)
            }
            Err(
                e @ (FlightError::MissingCredential
                | FlightError::MissingParameter(_)
                | FlightError::InvalidQuery(_)),
            ) => {
                warn!(error = %e, "Rejected flight search request");
                ProxyResponse::from_error(&e)
            }
            Err(e) => {
                error!(error = %e, "Flight search failed");
                ProxyResponse::from_error(&e)
            }
        }
    }

    async fn search(&self, params: ProxyParams) -> Result<FlightSearchResult, FlightError> {
        let request = self.build_request(params)?;
        self.client.search(&request).await
    }

    /// Inbound credential if usable, else the configured fallback. Surrounding
    /// whitespace is stripped.
    pub fn resolve_api_key<'a>(&'a self, inbound: Option<&'a str>) -> Option<&'a str> {
        inbound
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .or(self.fallback_api_key.as_deref())
    }

    /// Credential is checked before anything else.
    pub fn build_request(&self, params: ProxyParams) -> Result<FlightSearchRequest, FlightError> {
        let api_key = self
            .resolve_api_key(params.api_key.as_deref())
            .ok_or(FlightError::MissingCredential)?
            .to_string();

        let origin = required(params.departure_id, "departure_id")?;
        let destination = required(params.arrival_id, "arrival_id")?;
        let outbound_date = required(params.outbound_date, "outbound_date")?;

        let request = FlightSearchRequest::new(origin, destination, outbound_date, api_key);
        Ok(match params.return_date.filter(|d| !d.trim().is_empty()) {
            Some(return_date) => request.with_return_date(return_date),
            None => request,
        })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, FlightError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(FlightError::MissingParameter(name))
}
