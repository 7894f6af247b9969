//! Process configuration, read once at startup
//!
//! # Environment Variables
//!
//! - `SERPAPI_API_KEY`: fallback credential used when a request carries no
//!   `api_key` (the legacy `VITE_SERPAPI_API_KEY` is also honoured)
//! - `SERPAPI_ENDPOINT`: upstream search URL (default: SerpAPI)
//! - `PORT`: listen port for the standalone server (default: 3001)

use crate::client::SERPAPI_ENDPOINT;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 3001;

/// Configuration shared by every proxy entry point
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Credential used when the caller supplies none
    #[serde(skip_serializing)]
    pub fallback_api_key: Option<String>,
    pub endpoint: String,
    pub port: u16,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            fallback_api_key: None,
            endpoint: SERPAPI_ENDPOINT.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ProxyConfig {
    /// Create configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let fallback_api_key = get("SERPAPI_API_KEY").or_else(|| get("VITE_SERPAPI_API_KEY"));
        let endpoint = get("SERPAPI_ENDPOINT").unwrap_or_else(|| SERPAPI_ENDPOINT.to_string());
        let port = get("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            fallback_api_key,
            endpoint,
            port,
        }
    }

    pub fn with_fallback_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.fallback_api_key = Some(api_key.into());
        self
    }

    pub fn has_fallback_api_key(&self) -> bool {
        self.fallback_api_key.is_some()
    }
}

impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("fallback_api_key", &self.fallback_api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("port", &self.port)
            .finish()
    }
}
