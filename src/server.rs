//! Standalone HTTP server for the flight proxy
//!
//! # Endpoints
//!
//! - `GET|OPTIONS /api/flights` - flight search
//! - `GET|OPTIONS /.netlify/functions/flights` - same, on the legacy function path
//! - `GET /health/live` - liveness probe

use crate::client::FlightSearch;
use crate::handler::{FlightProxy, ProxyExchange, ProxyParams, ProxyResponse};
use crate::FlightError;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{HeaderName, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub const FLIGHTS_PATH: &str = "/api/flights";
pub const LEGACY_FLIGHTS_PATH: &str = "/.netlify/functions/flights";
pub const HEALTH_PATH: &str = "/health/live";

/// One axum request, seen through [`ProxyExchange`]
pub struct AxumExchange {
    method: Method,
    params: ProxyParams,
}

impl ProxyExchange for AxumExchange {
    type Output = Response;

    fn is_preflight(&self) -> bool {
        self.method == Method::OPTIONS
    }

    fn params(&self) -> ProxyParams {
        self.params.clone()
    }

    fn send_json(self, response: ProxyResponse) -> Response {
        into_axum_response(response)
    }
}

/// Convert a framework-neutral response into an axum one
pub fn into_axum_response(response: ProxyResponse) -> Response {
    let mut res = match response.body {
        Some(body) => Json(body).into_response(),
        None => ().into_response(),
    };
    *res.status_mut() = response.status;

    for (name, value) in response.headers {
        if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
            res.headers_mut().insert(name, HeaderValue::from_static(value));
        }
    }
    res
}

/// Build the router; the proxy is shared by all connections.
pub fn router<C>(proxy: Arc<FlightProxy<C>>) -> Router
where
    C: FlightSearch + 'static,
{
    Router::new()
        .route(FLIGHTS_PATH, get(flights::<C>).options(flights::<C>))
        .route(LEGACY_FLIGHTS_PATH, get(flights::<C>).options(flights::<C>))
        .route(HEALTH_PATH, get(health_live))
        .layer(TraceLayer::new_for_http())
        .with_state(proxy)
}

/// Bind and serve until the process is stopped
pub async fn serve<C>(proxy: Arc<FlightProxy<C>>, addr: SocketAddr) -> std::io::Result<()>
where
    C: FlightSearch + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Flight proxy listening");
    axum::serve(listener, router(proxy)).await
}

async fn flights<C>(
    State(proxy): State<Arc<FlightProxy<C>>>,
    method: Method,
    query: Result<Query<ProxyParams>, QueryRejection>,
) -> Response
where
    C: FlightSearch + 'static,
{
    let params = match query {
        Ok(Query(params)) => params,
        // Preflight never reads parameters.
        Err(_) if method == Method::OPTIONS => ProxyParams::default(),
        Err(e) => {
            warn!(error = %e, "Unreadable query string");
            let err = FlightError::InvalidQuery(e.body_text());
            return into_axum_response(ProxyResponse::from_error(&err));
        }
    };

    proxy.serve(AxumExchange { method, params }).await
}

async fn health_live() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FlightError, FlightSearchRequest, FlightSearchResult};
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum_test::TestServer;

    struct EmptySearch;

    #[async_trait]
    impl FlightSearch for EmptySearch {
        async fn search(
            &self,
            _request: &FlightSearchRequest,
        ) -> Result<FlightSearchResult, FlightError> {
            Ok(FlightSearchResult::default())
        }
    }

    fn test_server(fallback: Option<&str>) -> TestServer {
        let proxy = FlightProxy::new(EmptySearch, fallback.map(str::to_string));
        TestServer::new(router(Arc::new(proxy))).unwrap()
    }

    #[tokio::test]
    async fn test_preflight_returns_cors_headers() {
        let server = test_server(None);
        let response = server.method(Method::OPTIONS, FLIGHTS_PATH).await;

        response.assert_status_ok();
        assert_eq!(response.text(), "");
        assert_eq!(response.header("access-control-allow-origin"), "*");
        assert_eq!(response.header("access-control-allow-methods"), "GET, OPTIONS");
        assert_eq!(response.header("access-control-allow-headers"), "Content-Type");
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let server = test_server(None);
        let response = server
            .get(FLIGHTS_PATH)
            .add_query_param("departure_id", "BOM")
            .add_query_param("arrival_id", "DPS")
            .add_query_param("outbound_date", "2025-07-01")
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": "API key is required" })
        );
        assert_eq!(response.header("access-control-allow-origin"), "*");
    }

    #[tokio::test]
    async fn test_legacy_path_uses_fallback_credential() {
        let server = test_server(Some("FALLBACK"));
        let response = server
            .get(LEGACY_FLIGHTS_PATH)
            .add_query_param("departure_id", "BOM")
            .add_query_param("arrival_id", "DPS")
            .add_query_param("outbound_date", "2025-07-01")
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({ "best_flights": [] }));
        assert_eq!(response.header("content-type"), "application/json");
    }

    #[tokio::test]
    async fn test_duplicated_query_key_is_rejected() {
        let server = test_server(None);
        let response = server
            .get(FLIGHTS_PATH)
            .add_query_param("departure_id", "BOM")
            .add_query_param("departure_id", "BOM")
            .add_query_param("arrival_id", "DPS")
            .add_query_param("outbound_date", "2025-07-01")
            .add_query_param("api_key", "XYZ")
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let message = response.json::<Value>()["error"].as_str().unwrap().to_string();
        assert_ne!(message, "API key is required");
        assert!(message.contains("departure_id"));
        assert_eq!(response.header("access-control-allow-origin"), "*");
    }

    #[tokio::test]
    async fn test_preflight_ignores_unreadable_query() {
        let server = test_server(None);
        let response = server
            .method(Method::OPTIONS, FLIGHTS_PATH)
            .add_query_param("api_key", "a")
            .add_query_param("api_key", "b")
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), "");
    }

    #[tokio::test]
    async fn test_health_live() {
        let server = test_server(None);
        let response = server.get(HEALTH_PATH).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "ok");
    }

    #[test]
    fn test_preflight_conversion_has_empty_body() {
        let response = into_axum_response(ProxyResponse::preflight());
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("content-type").is_none());
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
