//! Computed moves: an agent that asks a [`MoveProposer`] what to play.

use boardlink_game::{Board, Cell, PlayerSlot, SessionHandle, TileState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Agent, AgentError};

// ---------------------------------------------------------------------------
// MoveProposer
// ---------------------------------------------------------------------------

/// Picks a move for `slot` on `board`.
///
/// The board passed in has the legal moves of `slot` marked as
/// [`TileState::LegalMove`]. Proposers run synchronously on the
/// orchestrator's task, so a slow search should be bounded by the
/// implementation.
pub trait MoveProposer: Send + 'static {
    /// Returns the cell to play, or `None` when there is nothing to play.
    fn propose(&mut self, board: &Board, slot: PlayerSlot) -> Option<Cell>;
}

impl<F> MoveProposer for F
where
    F: FnMut(&Board, PlayerSlot) -> Option<Cell> + Send + 'static,
{
    fn propose(&mut self, board: &Board, slot: PlayerSlot) -> Option<Cell> {
        self(board, slot)
    }
}

/// Plays the first legal cell, row by row.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLegalMove;

impl MoveProposer for FirstLegalMove {
    fn propose(&mut self, board: &Board, _slot: PlayerSlot) -> Option<Cell> {
        board.cells_where(|t| t == TileState::LegalMove).first().copied()
    }
}

/// Plays a uniformly random legal cell.
#[derive(Debug, Clone)]
pub struct RandomLegalMove {
    rng: StdRng,
}

impl RandomLegalMove {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// A proposer with a fixed seed, for reproducible games.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomLegalMove {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveProposer for RandomLegalMove {
    fn propose(&mut self, board: &Board, _slot: PlayerSlot) -> Option<Cell> {
        let legal = board.cells_where(|t| t == TileState::LegalMove);
        if legal.is_empty() {
            return None;
        }
        Some(legal[self.rng.random_range(0..legal.len())])
    }
}

// ---------------------------------------------------------------------------
// ComputedAgent
// ---------------------------------------------------------------------------

/// Plays whatever its proposer picks.
pub struct ComputedAgent<P> {
    session: SessionHandle,
    slot: PlayerSlot,
    proposer: P,
}

impl<P: MoveProposer> ComputedAgent<P> {
    pub fn new(session: SessionHandle, slot: PlayerSlot, proposer: P) -> Self {
        Self {
            session,
            slot,
            proposer,
        }
    }
}

impl<P: MoveProposer> Agent for ComputedAgent<P> {
    fn slot(&self) -> PlayerSlot {
        self.slot
    }

    fn session(&self) -> &SessionHandle {
        &self.session
    }

    async fn perform_next_move(&mut self) -> Result<(), AgentError> {
        let slot = self.slot;
        if !self.session.is_turn_of(slot) {
            return Ok(());
        }

        let board = self.session.board();
        let cell = self
            .proposer
            .propose(&board, slot)
            .ok_or(AgentError::NoLegalMove(slot))?;

        // Give the other tasks on this runtime a turn between moves.
        tokio::task::yield_now().await;

        if self.session.try_move(slot, cell.x, cell.y) {
            tracing::debug!(%slot, %cell, "computed move played");
            return Ok(());
        }
        // The game may have ended while we were thinking.
        if self.session.is_turn_of(slot) {
            return Err(AgentError::IllegalProposal { slot, cell });
        }
        Ok(())
    }
}
