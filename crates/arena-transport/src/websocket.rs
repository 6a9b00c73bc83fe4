//! Outbound WebSocket connections using `tokio-tungstenite`.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::{Connection, ConnectionId, Connector, TransportError};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// A [`Connector`] that opens `ws://` / `wss://` connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

impl Connector for WebSocketConnector {
    type Connection = WebSocketConnection;

    async fn connect(&self, url: &str) -> Result<Self::Connection, TransportError> {
        let (ws, _response) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| TransportError::ConnectFailed {
                url: url.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e),
            })?;

        let id = ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        tracing::trace!(%id, url, "websocket opened");

        Ok(WebSocketConnection {
            id,
            ws: Mutex::new(ws),
        })
    }
}

/// A single outbound WebSocket connection.
///
/// Dropping it without calling [`Connection::close`] still releases the
/// socket, just without a close frame.
pub struct WebSocketConnection {
    id: ConnectionId,
    ws: Mutex<WsStream>,
}

impl Connection for WebSocketConnection {
    async fn close(&self) -> Result<(), TransportError> {
        match self.ws.lock().await.close(None).await {
            // Already closing, or the peer beat us to it.
            Ok(()) | Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => {
                tracing::trace!(id = %self.id, "websocket closed");
                Ok(())
            }
            Err(e) => Err(TransportError::CloseFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))),
        }
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
