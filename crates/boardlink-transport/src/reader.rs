//! Read side: bytes in, lines out.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{ConnectionId, TransportError};

/// Splits a byte stream into `\n`-terminated lines.
///
/// A trailing `\r` is stripped and invalid UTF-8 is replaced rather than
/// rejected, so one bad byte from the server never kills the stream.
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LineReader<BufReader<R>> {
    /// Wraps an unbuffered reader.
    pub fn new(reader: R) -> Self {
        Self::from_buffered(BufReader::new(reader))
    }
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    /// Wraps a reader that already buffers.
    pub fn from_buffered(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(256),
        }
    }

    /// Reads the next line.
    ///
    /// Returns `Ok(None)` at end of stream. A final line without a
    /// terminating `\n` is still returned.
    pub async fn next_line(&mut self) -> Result<Option<String>, TransportError> {
        self.buf.clear();
        let n = self
            .inner
            .read_until(b'\n', &mut self.buf)
            .await
            .map_err(TransportError::ReadFailed)?;
        if n == 0 {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

/// Spawns the reader task for one connection.
///
/// Lines are handed off through a channel with room for exactly one line,
/// so the task suspends until the consumer has taken the previous one.
/// The task ends on end of stream, on a read error, or when the receiver
/// is dropped. Consumers detect all three as the channel closing.
pub fn spawn_line_reader<R>(
    conn_id: ConnectionId,
    reader: R,
) -> (mpsc::Receiver<String>, JoinHandle<()>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    let mut lines = LineReader::new(reader);

    let handle = tokio::spawn(async move {
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    tracing::trace!(%conn_id, %line, "line received");
                    if tx.send(line).await.is_err() {
                        tracing::debug!(%conn_id, "line consumer gone");
                        break;
                    }
                }
                Ok(None) => {
                    tracing::debug!(%conn_id, "stream closed by peer");
                    break;
                }
                Err(e) => {
                    tracing::debug!(%conn_id, error = %e, "read error");
                    break;
                }
            }
        }
    });

    (rx, handle)
}
