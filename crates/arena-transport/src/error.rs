/// Errors from opening or closing an outbound connection.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// DNS, TCP, TLS or handshake failure.
    #[error("connect to {url} failed: {source}")]
    ConnectFailed {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// The close handshake could not be sent.
    #[error("close failed: {0}")]
    CloseFailed(#[source] std::io::Error),
}
