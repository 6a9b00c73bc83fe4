//! Player credentials for Arena.
//!
//! Before a player can create a lobby, the directory wants an anonymous
//! session token. This crate obtains that token and keeps it:
//!
//! 1. **Login** — the [`AnonymousLogin`] trait, with [`HttpAuthClient`]
//!    as the real implementation.
//! 2. **Caching** — [`SessionTokenCache`] fetches the token on first use
//!    and hands the same value to every later caller. Concurrent first
//!    callers share one login request.
//! 3. **Endpoints** — [`EndpointConfig`], shared with the lobby layer,
//!    describes where the external services live.
//!
//! # How it fits in the stack
//!
//! ```text
//! Lobby Layer (above)    ← needs a token to create directory entries
//!     ↕
//! Session Layer (this crate)  ← acquires and caches the token
//!     ↕
//! Auth endpoint (external)
//! ```

mod auth;
mod cache;
mod config;
mod error;
mod token;

pub use auth::{AnonymousLogin, HttpAuthClient};
pub use cache::SessionTokenCache;
pub use config::EndpointConfig;
pub use error::SessionError;
pub use token::SessionToken;
