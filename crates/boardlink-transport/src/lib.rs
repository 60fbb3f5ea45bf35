//! Line-framed transport layer for Boardlink.
//!
//! The game server speaks a plain-text protocol: every message, in both
//! directions, is one line terminated by `\n`. This crate owns the byte
//! stream and nothing else. It knows nothing about what the lines mean.
//!
//! - [`spawn_line_reader`] turns the read half into a stream of lines
//!   delivered through a single-slot channel.
//! - [`LineWriter`] writes one line at a time to the write half.
//! - [`connect_tcp`] opens the TCP connection both halves come from.

mod error;
mod reader;
mod writer;

pub use error::TransportError;
pub use reader::{LineReader, spawn_line_reader};
pub use writer::LineWriter;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::net::{TcpStream, ToSocketAddrs};

/// Opaque identifier for a connection, used to tag log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocates a process-unique `ConnectionId`.
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Opens a TCP connection to the game server.
///
/// Nagle's algorithm is disabled: commands are tiny and latency matters
/// more than throughput.
pub async fn connect_tcp<A>(addr: A) -> Result<TcpStream, TransportError>
where
    A: ToSocketAddrs + fmt::Debug,
{
    let label = format!("{addr:?}");
    let stream = TcpStream::connect(addr).await.map_err(|source| {
        TransportError::ConnectFailed {
            addr: label.clone(),
            source,
        }
    })?;
    if let Err(e) = stream.set_nodelay(true) {
        tracing::debug!(addr = %label, error = %e, "could not set TCP_NODELAY");
    }
    tracing::info!(addr = %label, "connected");
    Ok(stream)
}
