//! The client's listener registries, one per event kind.

use boardlink_events::Listeners;
use boardlink_protocol::{Challenge, GameEnd, GameStart, Move, Player};

/// Listener registries for everything the server pushes.
///
/// Callbacks run on the connection's dispatcher task, one event at a time
/// and in arrival order. Anything a callback blocks on delays every later
/// line on the connection, including command acknowledgements.
///
/// Registries come in two lifetimes:
///
/// - **Game-scoped**: `game_start`, `moves`, `turn`, `game_end`. Cleared
///   right after a `GameEnd` has been delivered, so a listener set up for
///   one game never sees the next one.
/// - **Connection-scoped**: challenges and lists. Never cleared
///   automatically.
#[derive(Debug, Default)]
pub struct ClientEvents {
    game_start: Listeners<GameStart>,
    moves: Listeners<Move>,
    turn: Listeners<String>,
    game_end: Listeners<GameEnd>,
    challenge_received: Listeners<Challenge>,
    challenge_cancelled: Listeners<Challenge>,
    player_list: Listeners<Vec<Player>>,
    game_list: Listeners<Vec<String>>,
}

impl ClientEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// A match was made (`SVR GAME MATCH`).
    pub fn game_start(&self) -> &Listeners<GameStart> {
        &self.game_start
    }

    /// Either player moved (`SVR GAME MOVE`).
    pub fn moves(&self) -> &Listeners<Move> {
        &self.moves
    }

    /// The local player may move (`SVR GAME YOURTURN`). Receives the
    /// server's turn message.
    pub fn turn(&self) -> &Listeners<String> {
        &self.turn
    }

    /// The game is over (`SVR GAME WIN|LOSS|DRAW`).
    pub fn game_end(&self) -> &Listeners<GameEnd> {
        &self.game_end
    }

    pub fn challenge_received(&self) -> &Listeners<Challenge> {
        &self.challenge_received
    }

    /// Receives the challenge as it was originally received, not just
    /// its id.
    pub fn challenge_cancelled(&self) -> &Listeners<Challenge> {
        &self.challenge_cancelled
    }

    pub fn player_list(&self) -> &Listeners<Vec<Player>> {
        &self.player_list
    }

    pub fn game_list(&self) -> &Listeners<Vec<String>> {
        &self.game_list
    }

    /// Drops every game-scoped listener.
    pub fn clear_game_listeners(&self) {
        self.game_start.clear();
        self.moves.clear();
        self.turn.clear();
        self.game_end.clear();
    }
}
