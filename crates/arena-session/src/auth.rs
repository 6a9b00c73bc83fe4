//! Anonymous login against the external auth endpoint.
//!
//! Arena doesn't issue player identities itself; the directory's auth
//! service does. [`AnonymousLogin`] is the seam: production code uses
//! [`HttpAuthClient`], tests plug in a counter or a failing stub.

use std::future::Future;

use serde::Deserialize;

use crate::{EndpointConfig, SessionError, SessionToken};

/// Obtains an anonymous session token for an application.
///
/// # Example
///
/// ```rust
/// use arena_session::{AnonymousLogin, SessionError, SessionToken};
///
/// /// Hands out a fixed token. Only for local development.
/// struct FixedLogin;
///
/// impl AnonymousLogin for FixedLogin {
///     async fn login_anonymous(
///         &self,
///         app_id: &str,
///     ) -> Result<SessionToken, SessionError> {
///         Ok(SessionToken::new(format!("dev-{app_id}")))
///     }
/// }
/// ```
pub trait AnonymousLogin: Send + Sync + 'static {
    /// Performs one login round trip.
    ///
    /// # Errors
    /// - [`SessionError::AuthFailed`] — the endpoint rejected the request
    /// - [`SessionError::Http`] — no usable response
    fn login_anonymous(
        &self,
        app_id: &str,
    ) -> impl Future<Output = Result<SessionToken, SessionError>> + Send;
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

/// [`AnonymousLogin`] over HTTP: `POST /auth/v1/{appId}/login/anonymous`.
#[derive(Debug, Clone)]
pub struct HttpAuthClient {
    http: reqwest::Client,
    endpoint: EndpointConfig,
}

impl HttpAuthClient {
    /// Builds a client with its own connection pool.
    pub fn new(endpoint: EndpointConfig) -> Result<Self, SessionError> {
        let http = endpoint.http_client()?;
        Ok(Self { http, endpoint })
    }

    /// Builds a client that shares an existing connection pool.
    pub fn with_client(http: reqwest::Client, endpoint: EndpointConfig) -> Self {
        Self { http, endpoint }
    }
}

impl AnonymousLogin for HttpAuthClient {
    #[tracing::instrument(skip(self))]
    async fn login_anonymous(&self, app_id: &str) -> Result<SessionToken, SessionError> {
        let url = self
            .endpoint
            .url(&format!("auth/v1/{app_id}/login/anonymous"));
        let resp = self.http.post(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SessionError::AuthFailed(format!("{}: {body}", status.as_u16())));
        }

        let data: LoginResponse = resp
            .json()
            .await
            .map_err(|e| SessionError::AuthFailed(format!("malformed login response: {e}")))?;
        if data.token.is_empty() {
            return Err(SessionError::AuthFailed("empty token".into()));
        }

        tracing::debug!("anonymous login succeeded");
        Ok(SessionToken::new(data.token))
    }
}
