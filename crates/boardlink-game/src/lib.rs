//! Turn-based game sessions for Boardlink.
//!
//! A session runs one two-player board game, independent of where the
//! moves come from (a keyboard, an AI, the network).
//!
//! # Key types
//!
//! - [`GameSession`] — the state machine: start, try a move, stop
//! - [`SessionHandle`] — shared, locked access to a session
//! - [`SessionEvents`] — listeners for started / moved / next player / ended
//! - [`RuleEngine`] — the trait one game's rules implement
//! - [`Board`], [`Cell`], [`TileState`], [`PlayerSlot`] — the board model
//! - [`GameKind`] — server game name → rule engine

mod board;
mod error;
mod kind;
mod rules;
mod session;

pub use board::{Board, Cell, PlayerSlot, TileState};
pub use error::GameError;
pub use kind::GameKind;
pub use rules::{Reversi, RuleEngine, TicTacToe};
pub use session::{
    GameOutcome, GameSession, MoveAttempt, SessionEvents, SessionHandle,
    SessionState,
};
