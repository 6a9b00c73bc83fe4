//! Integration tests for outbound WebSocket connections.
//!
//! Each test binds a real WebSocket server on an OS-assigned port and
//! points the connector at it.

#[cfg(feature = "websocket")]
mod websocket {
    use arena_transport::{Connection, Connector, TransportError, WebSocketConnector};
    use futures_util::StreamExt;
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;

    /// Binds a listener on a random port and returns it with its `ws://` URL.
    async fn bind() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
        let addr = listener.local_addr().expect("should have addr");
        (listener, format!("ws://{addr}"))
    }

    #[tokio::test]
    async fn test_close_is_seen_by_server() {
        let (listener, url) = bind().await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            matches!(ws.next().await, Some(Ok(Message::Close(_))) | None)
        });

        let conn = WebSocketConnector.connect(&url).await.expect("should connect");
        conn.close().await.expect("should close");

        assert!(server.await.unwrap(), "server should observe the close");
    }

    #[tokio::test]
    async fn test_drop_releases_the_socket() {
        let (listener, url) = bind().await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            // No close frame, but the stream still ends.
            while let Some(Ok(_)) = ws.next().await {}
        });

        let conn = WebSocketConnector.connect(&url).await.expect("should connect");
        drop(conn);

        tokio::time::timeout(std::time::Duration::from_secs(5), server)
            .await
            .expect("server should see the socket go away")
            .unwrap();
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_fails() {
        // Bind then drop so the port is (almost certainly) not listening.
        let (listener, url) = bind().await;
        drop(listener);

        let result = WebSocketConnector.connect(&url).await;

        match result {
            Err(TransportError::ConnectFailed { url: failed, .. }) => assert_eq!(failed, url),
            Err(other) => panic!("expected ConnectFailed, got {other:?}"),
            Ok(_) => panic!("should fail to connect"),
        }
    }

    #[tokio::test]
    async fn test_connection_ids_are_unique() {
        let (listener, url) = bind().await;
        tokio::spawn(async move {
            for _ in 0..2 {
                let (stream, _) = listener.accept().await.unwrap();
                tokio::spawn(async move {
                    let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
                    while let Some(Ok(_)) = ws.next().await {}
                });
            }
        });

        let a = WebSocketConnector.connect(&url).await.unwrap();
        let b = WebSocketConnector.connect(&url).await.unwrap();
        assert_ne!(a.id(), b.id());
    }
}
