//! The `RuleEngine` trait — where one specific game's rules live.
//!
//! A [`GameSession`](crate::GameSession) knows about turns, states, and
//! events, but nothing about what makes a move legal. It asks its engine.
//! Two engines ship with the crate ([`TicTacToe`], [`Reversi`]); anything
//! else can be plugged in by implementing the trait.
//!
//! Engines are stateless with respect to a game: everything they need is
//! on the [`Board`] passed in. That keeps the session the single owner of
//! game state.

mod reversi;
mod tictactoe;

pub use reversi::Reversi;
pub use tictactoe::TicTacToe;

use crate::{Board, Cell, PlayerSlot};

/// The rules of one board game.
///
/// `Send + 'static` because the session holding the engine is shared
/// between the orchestrator task and the connection's dispatcher task.
pub trait RuleEngine: Send + 'static {
    /// The game's name as the server spells it, e.g. `"Reversi"`.
    fn name(&self) -> &str;

    /// `(width, height)` of the board.
    fn board_size(&self) -> (usize, usize);

    /// Stones on the board before the first move.
    fn starting_layout(&self) -> Vec<(Cell, PlayerSlot)>;

    /// Every cell `slot` may play on `board`, row by row.
    fn legal_moves(&self, board: &Board, slot: PlayerSlot) -> Vec<Cell>;

    /// Whether `slot` may play at `(x, y)`.
    ///
    /// Default: membership in [`legal_moves`](Self::legal_moves). Override
    /// when a direct check is cheaper.
    fn is_legal(&self, board: &Board, slot: PlayerSlot, x: usize, y: usize) -> bool {
        self.legal_moves(board, slot).contains(&Cell::new(x, y))
    }

    /// Places `slot`'s stone at `(x, y)` and applies its side effects
    /// (captures, flips). Only called after `is_legal` said yes.
    fn apply(&self, board: &mut Board, slot: PlayerSlot, x: usize, y: usize);

    /// Who moves after `current` has moved. `None` when nobody can.
    fn next_slot(&self, board: &Board, current: PlayerSlot) -> Option<PlayerSlot>;

    /// Whether the position is terminal.
    fn has_ended(&self, board: &Board) -> bool;

    /// `[player one, player two]` scores for the position.
    fn scores(&self, board: &Board) -> [u32; 2];

    /// Who is ahead. `None` on a tie.
    fn leading_slot(&self, scores: [u32; 2]) -> Option<PlayerSlot> {
        match scores[0].cmp(&scores[1]) {
            std::cmp::Ordering::Greater => Some(PlayerSlot::One),
            std::cmp::Ordering::Less => Some(PlayerSlot::Two),
            std::cmp::Ordering::Equal => None,
        }
    }
}
