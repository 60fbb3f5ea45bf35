//! Write side: one command line at a time.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{ConnectionId, TransportError};

/// Owns the write half of a connection.
///
/// Boxed so the client does not need to be generic over the stream type:
/// a `TcpStream` half in production, a `tokio::io::duplex` pipe in tests.
pub struct LineWriter {
    conn_id: ConnectionId,
    inner: Option<Box<dyn AsyncWrite + Send + Unpin>>,
}

impl LineWriter {
    pub fn new<W>(conn_id: ConnectionId, writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            conn_id,
            inner: Some(Box::new(writer)),
        }
    }

    /// Writes `line` followed by `\n` and flushes.
    pub async fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        let writer = self
            .inner
            .as_mut()
            .ok_or_else(|| TransportError::Closed("writer shut down".into()))?;

        let mut framed = Vec::with_capacity(line.len() + 1);
        framed.extend_from_slice(line.as_bytes());
        framed.push(b'\n');

        writer
            .write_all(&framed)
            .await
            .map_err(TransportError::WriteFailed)?;
        writer.flush().await.map_err(TransportError::WriteFailed)?;

        tracing::trace!(conn_id = %self.conn_id, %line, "line sent");
        Ok(())
    }

    /// Shuts the write half down. Further sends fail with `Closed`.
    ///
    /// Calling this more than once is harmless.
    pub async fn shutdown(&mut self) {
        if let Some(mut writer) = self.inner.take() {
            if let Err(e) = writer.shutdown().await {
                tracing::debug!(conn_id = %self.conn_id, error = %e, "shutdown error");
            }
        }
    }

    /// Returns `true` until [`shutdown`](Self::shutdown) has been called.
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }
}
