//! Where the external services live.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Base URL, application id and credentials for the external auth,
/// directory and room endpoints.
///
/// One `EndpointConfig` is shared by every HTTP client in the process.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Root of every endpoint, without a trailing slash.
    pub base_url: String,

    /// Application id every request is scoped to.
    pub app_id: String,

    /// Privileged credential for directory state updates and room
    /// destruction. Distinct from the anonymous player token; only the
    /// room side needs it.
    pub developer_token: Option<String>,

    /// Upper bound on any single HTTP request, in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.hathora.dev".to_string(),
            app_id: String::new(),
            developer_token: None,
            request_timeout_ms: 10_000,
        }
    }
}

impl EndpointConfig {
    /// Creates a config for `app_id` with default endpoints.
    pub fn for_app(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            ..Self::default()
        }
    }

    /// Joins `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Builds the shared HTTP client with the configured request timeout.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout())
            .build()
    }
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .field(
                "developer_token",
                &self.developer_token.as_ref().map(|_| "***"),
            )
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}
