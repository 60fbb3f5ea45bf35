/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Opening the TCP connection failed.
    #[error("connect to {addr} failed: {source}")]
    ConnectFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing a line to the peer failed.
    #[error("write failed: {0}")]
    WriteFailed(#[source] std::io::Error),

    /// Reading from the peer failed.
    #[error("read failed: {0}")]
    ReadFailed(#[source] std::io::Error),

    /// The connection was closed.
    #[error("connection closed: {0}")]
    Closed(String),
}
