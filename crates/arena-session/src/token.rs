//! The opaque player credential.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An anonymous session token issued by the auth endpoint.
///
/// The value is a bearer credential, so `Debug` never prints it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building request headers.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let token = SessionToken::new("eyJhbGciOi.secret");
        let printed = format!("{token:?}");
        assert!(!printed.contains("secret"));
        assert_eq!(token.expose(), "eyJhbGciOi.secret");
    }
}
