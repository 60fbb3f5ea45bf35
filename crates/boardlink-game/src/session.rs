//! Game session: the turn-based state machine around a rule engine.
//!
//! A session owns the board, the scores, and whose turn it is. It asks its
//! [`RuleEngine`] whether a move is legal and what it does, then publishes
//! what happened to [`SessionEvents`].
//!
//! Sessions are shared between tasks through a [`SessionHandle`], which
//! puts the whole session behind one mutex: every call that changes the
//! game holds the lock from start to finish.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use boardlink_events::Listeners;
use serde::{Deserialize, Serialize};

use crate::{Board, Cell, GameError, PlayerSlot, RuleEngine, TileState};

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The lifecycle state of a session.
///
/// ```text
/// Unstarted → Running → Ended
/// ```
///
/// `Ended` is terminal. Stopping an ended session does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Unstarted,
    Running,
    Ended,
}

impl SessionState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, Self::Ended)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unstarted => write!(f, "Unstarted"),
            Self::Running => write!(f, "Running"),
            Self::Ended => write!(f, "Ended"),
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A move attempt: who, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveAttempt {
    pub slot: PlayerSlot,
    pub cell: Cell,
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// `None` for a draw.
    pub winner: Option<PlayerSlot>,
    /// `[player one, player two]`.
    pub scores: [u32; 2],
}

/// Listener registries for one session.
///
/// Listeners run while the session lock is held, on whichever task made
/// the call. They must not call back into the session's handle.
#[derive(Debug, Default)]
pub struct SessionEvents {
    started: Listeners<PlayerSlot>,
    moved: Listeners<MoveAttempt>,
    invalid_move: Listeners<MoveAttempt>,
    next_player: Listeners<PlayerSlot>,
    ended: Listeners<GameOutcome>,
}

impl SessionEvents {
    /// The game started. Receives the slot to move first.
    pub fn started(&self) -> &Listeners<PlayerSlot> {
        &self.started
    }

    /// A legal move was applied.
    pub fn moved(&self) -> &Listeners<MoveAttempt> {
        &self.moved
    }

    /// A move was refused: wrong turn, not running, or illegal.
    pub fn invalid_move(&self) -> &Listeners<MoveAttempt> {
        &self.invalid_move
    }

    /// The turn passed. Receives the slot to move next, which may be the
    /// same slot again when the other player has to pass.
    pub fn next_player(&self) -> &Listeners<PlayerSlot> {
        &self.next_player
    }

    pub fn ended(&self) -> &Listeners<GameOutcome> {
        &self.ended
    }
}

// ---------------------------------------------------------------------------
// GameSession
// ---------------------------------------------------------------------------

/// One game between two slots.
pub struct GameSession {
    engine: Box<dyn RuleEngine>,
    board: Board,
    state: SessionState,
    current_player: Option<PlayerSlot>,
    scores: [u32; 2],
    outcome: Option<GameOutcome>,
    events: Arc<SessionEvents>,
}

impl GameSession {
    pub fn new(engine: Box<dyn RuleEngine>) -> Self {
        let (width, height) = engine.board_size();
        Self {
            engine,
            board: Board::new(width, height),
            state: SessionState::Unstarted,
            current_player: None,
            scores: [0, 0],
            outcome: None,
            events: Arc::new(SessionEvents::default()),
        }
    }

    pub fn name(&self) -> &str {
        self.engine.name()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_player(&self) -> Option<PlayerSlot> {
        self.current_player
    }

    pub fn scores(&self) -> [u32; 2] {
        self.scores
    }

    pub fn events(&self) -> &Arc<SessionEvents> {
        &self.events
    }

    /// How the last game ended. `None` until a game has ended, and again
    /// after a restart.
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Cells currently marked as legal for the player to move.
    pub fn legal_moves(&self) -> Vec<Cell> {
        self.board.cells_where(|t| t == TileState::LegalMove)
    }

    /// Starts (or restarts) the game with `first` to move.
    ///
    /// # Errors
    /// `GameError::AlreadyRunning` while a game is in progress.
    pub fn start(&mut self, first: PlayerSlot) -> Result<(), GameError> {
        if self.state.is_running() {
            return Err(GameError::AlreadyRunning);
        }

        let (width, height) = self.engine.board_size();
        self.board = Board::new(width, height);
        for (cell, slot) in self.engine.starting_layout() {
            self.board.set(cell.x, cell.y, TileState::Occupied(slot));
        }
        self.scores = self.engine.scores(&self.board);
        self.outcome = None;
        self.current_player = Some(first);
        self.mark_legal_moves(first);
        self.state = SessionState::Running;

        tracing::info!(game = self.engine.name(), %first, "game started");
        self.events.started.publish(&first);
        Ok(())
    }

    /// Tries to play `(x, y)` for `slot`.
    ///
    /// Returns `true` and advances the game when the session is running,
    /// it is `slot`'s turn, and the engine allows the move. Otherwise
    /// publishes `invalid_move`, changes nothing, and returns `false`.
    pub fn try_move(&mut self, slot: PlayerSlot, x: usize, y: usize) -> bool {
        let attempt = MoveAttempt {
            slot,
            cell: Cell::new(x, y),
        };

        let allowed = self.state.is_running()
            && self.current_player == Some(slot)
            && self.engine.is_legal(&self.board, slot, x, y);
        if !allowed {
            tracing::debug!(%slot, x, y, state = %self.state, "move refused");
            self.events.invalid_move.publish(&attempt);
            return false;
        }

        self.engine.apply(&mut self.board, slot, x, y);
        self.board.clear_markers();
        let next = self.engine.next_slot(&self.board, slot);
        self.scores = self.engine.scores(&self.board);

        tracing::debug!(%slot, x, y, scores = ?self.scores, "move applied");
        self.events.moved.publish(&attempt);

        match next {
            Some(next) if !self.engine.has_ended(&self.board) => {
                self.mark_legal_moves(next);
                self.current_player = Some(next);
                self.events.next_player.publish(&next);
            }
            _ => {
                let leader = self.engine.leading_slot(self.scores);
                self.stop(leader);
            }
        }
        true
    }

    /// Ends the game with `winner` (`None` for a draw).
    ///
    /// Does nothing if the game has already ended, so `ended` fires at
    /// most once per game.
    pub fn stop(&mut self, winner: Option<PlayerSlot>) {
        if self.state.is_ended() {
            return;
        }
        self.state = SessionState::Ended;
        self.current_player = None;
        self.board.clear_markers();

        let outcome = GameOutcome {
            winner,
            scores: self.scores,
        };
        self.outcome = Some(outcome);
        tracing::info!(game = self.engine.name(), ?winner, scores = ?self.scores, "game ended");
        self.events.ended.publish(&outcome);
    }

    /// Ends the game in favour of `slot`'s opponent.
    pub fn forfeit(&mut self, slot: PlayerSlot) {
        tracing::info!(%slot, "forfeit");
        self.stop(Some(slot.opponent()));
    }

    fn mark_legal_moves(&mut self, slot: PlayerSlot) {
        let moves = self.engine.legal_moves(&self.board, slot);
        self.board.mark_legal(&moves);
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("game", &self.engine.name())
            .field("state", &self.state)
            .field("current_player", &self.current_player)
            .field("scores", &self.scores)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SessionHandle
// ---------------------------------------------------------------------------

/// Shared, lock-protected access to a [`GameSession`].
///
/// Cheap to clone. Every method takes the lock for its whole duration, so
/// calls from different tasks never interleave inside the session.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<GameSession>>,
    events: Arc<SessionEvents>,
}

impl SessionHandle {
    pub fn new(session: GameSession) -> Self {
        let events = Arc::clone(session.events());
        Self {
            inner: Arc::new(Mutex::new(session)),
            events,
        }
    }

    /// Wraps a fresh session for `engine`.
    pub fn with_engine(engine: Box<dyn RuleEngine>) -> Self {
        Self::new(GameSession::new(engine))
    }

    /// Locks the session for a sequence of calls.
    ///
    /// Do not hold the guard across an `.await`.
    pub fn lock(&self) -> MutexGuard<'_, GameSession> {
        // A panicking listener poisons the lock; the session is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registries for this session. Available without taking the lock.
    pub fn events(&self) -> &Arc<SessionEvents> {
        &self.events
    }

    /// `true` if both handles refer to the same session.
    pub fn same_session(&self, other: &SessionHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn start(&self, first: PlayerSlot) -> Result<(), GameError> {
        self.lock().start(first)
    }

    pub fn try_move(&self, slot: PlayerSlot, x: usize, y: usize) -> bool {
        self.lock().try_move(slot, x, y)
    }

    pub fn stop(&self, winner: Option<PlayerSlot>) {
        self.lock().stop(winner)
    }

    pub fn forfeit(&self, slot: PlayerSlot) {
        self.lock().forfeit(slot)
    }

    pub fn state(&self) -> SessionState {
        self.lock().state()
    }

    pub fn current_player(&self) -> Option<PlayerSlot> {
        self.lock().current_player()
    }

    /// `true` while the game runs and `slot` is to move.
    pub fn is_turn_of(&self, slot: PlayerSlot) -> bool {
        let session = self.lock();
        session.state().is_running() && session.current_player() == Some(slot)
    }

    pub fn scores(&self) -> [u32; 2] {
        self.lock().scores()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.lock().outcome()
    }

    /// A copy of the current board.
    pub fn board(&self) -> Board {
        self.lock().board().clone()
    }

    pub fn name(&self) -> String {
        self.lock().name().to_string()
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionHandle").field(&*self.lock()).finish()
    }
}
