//! Error types for the client layer.
//!
//! Two levels: [`CommandError`] says what happened to one command on the
//! wire; [`ClientError`] says which operation it belonged to. A rejected
//! move and a rejected login carry the same `CommandError::Rejected`, but
//! the caller can still tell them apart.

use boardlink_transport::TransportError;

/// What went wrong with a single command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The server answered `ERR <text>`. The text is kept verbatim.
    #[error("rejected by server: {0}")]
    Rejected(String),

    /// No answer arrived within the configured timeout.
    #[error("no response from server")]
    Timeout,

    /// The connection dropped while the command was outstanding.
    #[error("connection closed")]
    ConnectionClosed,

    /// `disconnect` was called on this client.
    #[error("not connected")]
    NotConnected,

    /// Writing the command failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl CommandError {
    /// Returns the server's text for a rejected command.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Errors from the client's public operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Opening the connection failed.
    #[error("connection error: {0}")]
    Connection(#[from] TransportError),

    /// `login` or `logout` failed.
    #[error("login error: {0}")]
    Login(#[source] CommandError),

    /// `subscribe` failed.
    #[error("subscribe error: {0}")]
    Subscribe(#[source] CommandError),

    /// Issuing or accepting a challenge failed.
    #[error("challenge error: {0}")]
    Challenge(#[source] CommandError),

    /// Sending a move or a forfeit failed.
    #[error("move error: {0}")]
    Move(#[source] CommandError),

    /// A game or player list query failed.
    #[error("query error: {0}")]
    Query(#[source] CommandError),
}

impl ClientError {
    /// Returns the underlying command error, if any.
    pub fn command(&self) -> Option<&CommandError> {
        match self {
            Self::Connection(_) => None,
            Self::Login(e)
            | Self::Subscribe(e)
            | Self::Challenge(e)
            | Self::Move(e)
            | Self::Query(e) => Some(e),
        }
    }
}
