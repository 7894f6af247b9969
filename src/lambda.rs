//! Serverless function adapter
//!
//! Accepts the API-gateway style event used by Netlify and AWS functions
//! (`httpMethod` + `queryStringParameters`) and produces the matching
//! `{ statusCode, headers, body }` reply. The runtime glue lives in the
//! `trip-flights-lambda` binary.

use crate::handler::{ProxyExchange, ProxyParams, ProxyResponse};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Inbound function event
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    #[serde(default)]
    pub http_method: Option<String>,
    /// `null` when the request has no query string
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

impl GatewayEvent {
    fn param(&self, name: &str) -> Option<String> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(name))
            .cloned()
    }
}

impl ProxyExchange for GatewayEvent {
    type Output = GatewayResponse;

    fn is_preflight(&self) -> bool {
        self.http_method
            .as_deref()
            .is_some_and(|method| method.eq_ignore_ascii_case("OPTIONS"))
    }

    fn params(&self) -> ProxyParams {
        ProxyParams {
            departure_id: self.param("departure_id"),
            arrival_id: self.param("arrival_id"),
            outbound_date: self.param("outbound_date"),
            return_date: self.param("return_date"),
            api_key: self.param("api_key"),
        }
    }

    fn send_json(self, response: ProxyResponse) -> GatewayResponse {
        GatewayResponse::from(response)
    }
}

/// Function reply; `body` is serialized JSON, empty for preflight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl From<ProxyResponse> for GatewayResponse {
    fn from(response: ProxyResponse) -> Self {
        Self {
            status_code: response.status.as_u16(),
            headers: response
                .headers
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            body: response.body_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::FlightProxy;
    use crate::{FlightError, FlightSearch, FlightSearchRequest, FlightSearchResult};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct Unreachable;

    #[async_trait]
    impl FlightSearch for Unreachable {
        async fn search(
            &self,
            _request: &FlightSearchRequest,
        ) -> Result<FlightSearchResult, FlightError> {
            Err(FlightError::UpstreamHttp { status: 502 })
        }
    }

    fn event(value: Value) -> GatewayEvent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_event_parsing() {
        let event = event(json!({
            "httpMethod": "GET",
            "path": "/.netlify/functions/flights",
            "queryStringParameters": {
                "departure_id": "BOM",
                "arrival_id": "DPS",
                "outbound_date": "2025-07-01",
                "api_key": "XYZ"
            }
        }));

        assert!(!event.is_preflight());
        let params = event.params();
        assert_eq!(params.departure_id.as_deref(), Some("BOM"));
        assert_eq!(params.api_key.as_deref(), Some("XYZ"));
        assert_eq!(params.return_date, None);
    }

    #[test]
    fn test_null_query_parameters() {
        let event = event(json!({ "httpMethod": "GET", "queryStringParameters": null }));
        assert_eq!(event.params(), ProxyParams::default());
    }

    #[test]
    fn test_options_is_preflight() {
        assert!(event(json!({ "httpMethod": "OPTIONS" })).is_preflight());
        assert!(event(json!({ "httpMethod": "options" })).is_preflight());
        assert!(!event(json!({})).is_preflight());
    }

    #[tokio::test]
    async fn test_preflight_response() {
        let proxy = FlightProxy::new(Unreachable, None);
        let response = proxy.serve(event(json!({ "httpMethod": "OPTIONS" }))).await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "");
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
        assert!(!response.headers.contains_key("Content-Type"));
    }

    #[tokio::test]
    async fn test_missing_credential_response() {
        let proxy = FlightProxy::new(Unreachable, None);
        let response = proxy.serve(event(json!({ "httpMethod": "GET" }))).await;

        assert_eq!(response.status_code, 400);
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body, json!({ "error": "API key is required" }));
    }

    #[tokio::test]
    async fn test_upstream_failure_response() {
        let proxy = FlightProxy::new(Unreachable, Some("FALLBACK".to_string()));
        let response = proxy
            .serve(event(json!({
                "httpMethod": "GET",
                "queryStringParameters": {
                    "departure_id": "BOM",
                    "arrival_id": "DPS",
                    "outbound_date": "2025-07-01"
                }
            })))
            .await;

        assert_eq!(response.status_code, 500);
        assert_eq!(response.headers["Content-Type"], "application/json");
        assert!(response.body.contains("502"));
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let response = GatewayResponse::from(ProxyResponse::preflight());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["body"], "");
    }
}
