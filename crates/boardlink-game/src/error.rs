//! Error types for the game layer.

/// Errors that can occur during game session operations.
///
/// An illegal move is *not* an error: `try_move` returns `false` and the
/// session publishes an invalid-move event instead.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// `start` was called while a game is in progress.
    #[error("game is already running")]
    AlreadyRunning,

    /// No rule engine is known for this game name.
    #[error("unsupported game type: {0}")]
    UnknownGame(String),
}
