//! Domain types carried by the game server's protocol.
//!
//! Every `SVR ...` line the server pushes is decoded into one
//! [`DomainEvent`]. These types are plain data: immutable once built,
//! no behaviour beyond formatting. The client publishes them to listeners
//! and the agent layer reacts to them.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player as the server knows them: identified by login name.
///
/// Two `Player` values are the same player when their names are equal.
/// This is the server-side identity, not the local seat at the board
/// (that is a `PlayerSlot` in the game crate).
///
/// `#[serde(transparent)]` keeps the JSON form a bare string, which is
/// also how the server lists players in `SVR PLAYERLIST`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Player(String);

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the login name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Player {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The number the server assigns to an open challenge.
///
/// Used to accept it (`challenge accept <n>`) and to match a later
/// cancellation against the challenge it cancels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeId(pub u32);

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Event payloads
// ---------------------------------------------------------------------------

/// An open challenge from another player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub challenger: Player,
    pub game_type: String,
}

/// A match has been made. Sent once per game, before any move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStart {
    /// Who moves first. May be the opponent.
    pub starting_player: Player,
    pub opponent: Player,
    pub game_type: String,
}

/// A move made by either player, as echoed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub player: Player,
    /// Board position as `y * width + x`.
    pub position: usize,
    /// Free-form server remark, e.g. `"Illegal move"`. Usually empty.
    pub details: String,
}

/// The local player's view of how a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Win => write!(f, "WIN"),
            Self::Loss => write!(f, "LOSS"),
            Self::Draw => write!(f, "DRAW"),
        }
    }
}

/// A game is over, as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEnd {
    pub result: GameResult,
    pub player_one_score: u32,
    pub player_two_score: u32,
    pub comment: String,
}

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

/// One decoded server push.
///
/// `#[serde(tag = "type", content = "data")]` gives the adjacently tagged
/// form `{ "type": "Move", "data": { ... } }`, handy when events are logged
/// or forwarded as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DomainEvent {
    /// `SVR GAME MATCH`
    GameStart(GameStart),
    /// `SVR GAME MOVE`
    Move(Move),
    /// `SVR GAME YOURTURN`: the local player may now move.
    Turn { message: String },
    /// `SVR GAME WIN|LOSS|DRAW`
    GameEnd(GameEnd),
    /// `SVR GAME CHALLENGE`
    ChallengeReceived(Challenge),
    /// `SVR GAME CHALLENGE CANCELLED`. Only the id is on the wire.
    ChallengeCancelled { id: ChallengeId },
    /// `SVR PLAYERLIST`
    PlayerList(Vec<Player>),
    /// `SVR GAMELIST`
    GameList(Vec<String>),
}

impl DomainEvent {
    /// Short name of the variant, for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GameStart(_) => "game_start",
            Self::Move(_) => "move",
            Self::Turn { .. } => "turn",
            Self::GameEnd(_) => "game_end",
            Self::ChallengeReceived(_) => "challenge_received",
            Self::ChallengeCancelled { .. } => "challenge_cancelled",
            Self::PlayerList(_) => "player_list",
            Self::GameList(_) => "game_list",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // Identity types
    // =====================================================================

    #[test]
    fn test_player_equality_by_name() {
        assert_eq!(Player::new("Jip"), Player::from("Jip"));
        assert_ne!(Player::new("Jip"), Player::new("Janneke"));
    }

    #[test]
    fn test_player_serializes_as_plain_string() {
        let json = serde_json::to_string(&Player::new("Jip")).unwrap();
        assert_eq!(json, "\"Jip\"");
    }

    #[test]
    fn test_player_display_is_name() {
        assert_eq!(Player::new("Janneke").to_string(), "Janneke");
    }

    #[test]
    fn test_challenge_id_display_is_bare_number() {
        assert_eq!(ChallengeId(12).to_string(), "12");
    }

    // =====================================================================
    // DomainEvent
    // =====================================================================

    #[test]
    fn test_domain_event_move_json_format() {
        let event = DomainEvent::Move(Move {
            player: Player::new("Jip"),
            position: 26,
            details: String::new(),
        });
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "Move");
        assert_eq!(json["data"]["player"], "Jip");
        assert_eq!(json["data"]["position"], 26);
    }

    #[test]
    fn test_domain_event_kind_names() {
        let turn = DomainEvent::Turn {
            message: String::new(),
        };
        assert_eq!(turn.kind(), "turn");
        let cancelled = DomainEvent::ChallengeCancelled { id: ChallengeId(1) };
        assert_eq!(cancelled.kind(), "challenge_cancelled");
    }

    #[test]
    fn test_game_result_display_matches_wire_keyword() {
        assert_eq!(GameResult::Win.to_string(), "WIN");
        assert_eq!(GameResult::Loss.to_string(), "LOSS");
        assert_eq!(GameResult::Draw.to_string(), "DRAW");
    }
}
