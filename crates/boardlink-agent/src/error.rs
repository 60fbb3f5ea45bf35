//! Error types for agents and the orchestrator.

use boardlink_game::{Cell, GameError, PlayerSlot};

/// Errors an agent or the orchestrator can return.
///
/// Any of these ends the orchestrator's loop; the session is stopped
/// without a winner before the error is returned.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The local input source reached end of file.
    #[error("move input closed")]
    InputClosed,

    /// Reading the local input source failed.
    #[error("move input failed: {0}")]
    Input(#[source] std::io::Error),

    /// The move proposer found nothing to play.
    #[error("no legal move for {0}")]
    NoLegalMove(PlayerSlot),

    /// The move proposer returned a move the session refused.
    #[error("proposed move {cell} is not legal for {slot}")]
    IllegalProposal { slot: PlayerSlot, cell: Cell },

    /// The connection to the game server was lost mid-game.
    #[error("game server connection lost")]
    Disconnected,

    /// A network agent needs a logged-in client to tell remote moves apart.
    #[error("client is not logged in")]
    NotLoggedIn,

    /// Both agents claim the same slot.
    #[error("both agents are bound to {0}")]
    SlotConflict(PlayerSlot),

    /// The agents are bound to different sessions.
    #[error("agents are bound to different sessions")]
    SessionMismatch,

    #[error(transparent)]
    Game(#[from] GameError),
}
