//! Error types for the session layer.

/// Errors that can occur while obtaining a player credential.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The auth endpoint refused to issue a token, or answered with
    /// something that is not a token.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The request never got a usable response (DNS, TLS, timeout).
    #[error("auth request failed: {0}")]
    Http(#[from] reqwest::Error),
}
