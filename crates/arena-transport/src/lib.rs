//! Outbound transport layer for Arena.
//!
//! Region selection only needs to know *whether* a connection to a region
//! opens, and to close it again afterwards, so the [`Connector`] and
//! [`Connection`] traits stay small. Gameplay traffic never goes through
//! this crate.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket connections via `tokio-tungstenite`

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketConnector};

use std::fmt;
use std::future::Future;

/// Opaque identifier for an outbound connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Opens outbound connections.
///
/// The returned futures are `Send` so many probes can race inside one
/// spawned task.
pub trait Connector: Send + Sync + 'static {
    type Connection: Connection;

    /// Opens a connection to `url`. Resolves once the handshake completes.
    fn connect(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Self::Connection, TransportError>> + Send;
}

/// An open outbound connection.
///
/// Dropping a connection releases it; [`close`](Connection::close) does so
/// gracefully and tells the peer.
pub trait Connection: Send + Sync + 'static {
    fn close(&self) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn id(&self) -> ConnectionId;
}
