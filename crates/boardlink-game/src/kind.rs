//! Game-type lookup: from the server's game name to a rule engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{GameError, Reversi, RuleEngine, SessionHandle, TicTacToe};

/// The games this crate ships rules for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    TicTacToe,
    Reversi,
}

impl GameKind {
    pub const ALL: [GameKind; 2] = [GameKind::TicTacToe, GameKind::Reversi];

    /// Looks a game up by its server name. Case is ignored.
    pub fn from_name(name: &str) -> Result<Self, GameError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| GameError::UnknownGame(name.to_string()))
    }

    /// The name the server uses for this game.
    pub fn name(self) -> &'static str {
        match self {
            Self::TicTacToe => "Tic-tac-toe",
            Self::Reversi => "Reversi",
        }
    }

    /// A fresh rule engine for this game.
    pub fn engine(self) -> Box<dyn RuleEngine> {
        match self {
            Self::TicTacToe => Box::new(TicTacToe),
            Self::Reversi => Box::new(Reversi),
        }
    }

    /// A fresh, unstarted session for this game.
    pub fn new_session(self) -> SessionHandle {
        SessionHandle::with_engine(self.engine())
    }
}

impl FromStr for GameKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
