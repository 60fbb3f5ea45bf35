//! Unified error type for the Boardlink facade.

use boardlink_agent::AgentError;
use boardlink_client::{ClientError, CommandError};
use boardlink_game::GameError;
use boardlink_protocol::ProtocolError;
use boardlink_transport::TransportError;

/// Errors from [`AutoPlayer`](crate::AutoPlayer).
#[derive(Debug, thiserror::Error)]
pub enum AutoPlayError {
    /// The server started a game this crate has no rules for.
    #[error("unsupported game type: {0}")]
    UnsupportedGame(String),

    /// The connection closed before the match finished.
    #[error("connection closed before the match finished")]
    Disconnected,

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Top-level error that wraps every crate-specific error.
///
/// The `#[from]` attributes let `?` convert sub-crate errors directly.
#[derive(Debug, thiserror::Error)]
pub enum BoardlinkError {
    /// Connecting, reading, or writing the socket.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A server line that could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A single command that failed without client context.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// A client command (login, move, ...) that failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    AutoPlay(#[from] AutoPlayError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::Closed("gone".into());
        let boardlink_err: BoardlinkError = err.into();
        assert!(matches!(boardlink_err, BoardlinkError::Transport(_)));
        assert!(boardlink_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_client_error_keeps_server_text() {
        let err = ClientError::Login(CommandError::Rejected("Duplicate name exists".into()));
        let boardlink_err: BoardlinkError = err.into();
        assert!(matches!(boardlink_err, BoardlinkError::Client(_)));
        assert!(boardlink_err.to_string().contains("Duplicate name exists"));
    }

    #[test]
    fn test_from_game_error() {
        let boardlink_err: BoardlinkError = GameError::AlreadyRunning.into();
        assert!(matches!(boardlink_err, BoardlinkError::Game(_)));
    }

    #[test]
    fn test_from_auto_play_error() {
        let err = AutoPlayError::UnsupportedGame("Chess".into());
        let boardlink_err: BoardlinkError = err.into();
        assert!(matches!(boardlink_err, BoardlinkError::AutoPlay(_)));
        assert_eq!(boardlink_err.to_string(), "unsupported game type: Chess");
    }

    #[test]
    fn test_auto_play_error_from_agent_error() {
        let err: AutoPlayError = AgentError::Disconnected.into();
        assert!(matches!(err, AutoPlayError::Agent(AgentError::Disconnected)));
    }
}
