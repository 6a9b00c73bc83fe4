//! The token cache: one login per process, shared by every caller.
//!
//! # Concurrency note
//!
//! The slot is a [`tokio::sync::OnceCell`]. While one caller is inside
//! the login round trip, every other caller that finds the slot empty
//! waits on the same initialisation instead of starting its own login.
//! If the login fails the slot stays empty and the next caller retries.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::OnceCell;

use crate::{AnonymousLogin, SessionError, SessionToken};

/// Lazily acquires and caches the anonymous session token.
///
/// Share it with `Arc`; it has no other mutable state. There is no
/// refresh or expiry: a token lives as long as the cache.
pub struct SessionTokenCache<A: AnonymousLogin> {
    auth: A,
    app_id: String,
    slot: OnceCell<SessionToken>,
    /// Login round trips issued so far (successful or not).
    logins: AtomicU64,
}

impl<A: AnonymousLogin> SessionTokenCache<A> {
    /// Creates an empty cache. No request is made until [`acquire`](Self::acquire).
    pub fn new(auth: A, app_id: impl Into<String>) -> Self {
        Self {
            auth,
            app_id: app_id.into(),
            slot: OnceCell::new(),
            logins: AtomicU64::new(0),
        }
    }

    /// Returns the cached token, logging in first if the slot is empty.
    ///
    /// # Errors
    /// Propagates the login failure. Nothing is cached in that case.
    pub async fn acquire(&self) -> Result<SessionToken, SessionError> {
        if let Some(token) = self.slot.get() {
            return Ok(token.clone());
        }

        let token = self
            .slot
            .get_or_try_init(|| async {
                self.logins.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(app_id = %self.app_id, "acquiring session token");
                let result = self.auth.login_anonymous(&self.app_id).await;
                match &result {
                    Ok(_) => tracing::info!(app_id = %self.app_id, "session token acquired"),
                    Err(e) => tracing::warn!(app_id = %self.app_id, error = %e, "session token login failed"),
                }
                result
            })
            .await?;
        Ok(token.clone())
    }

    /// Returns the token if one has been acquired, without waiting.
    pub fn peek(&self) -> Option<SessionToken> {
        self.slot.get().cloned()
    }

    /// Whether a token has been acquired.
    pub fn is_acquired(&self) -> bool {
        self.slot.initialized()
    }

    /// Number of login round trips issued so far.
    pub fn login_count(&self) -> u64 {
        self.logins.load(Ordering::Relaxed)
    }

    /// The application id tokens are requested for.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }
}
