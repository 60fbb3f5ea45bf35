//! The turn loop: start a session, then ask whoever is to move.

use boardlink_game::{GameOutcome, PlayerSlot, SessionHandle};
use tokio::task::JoinHandle;

use crate::{Agent, AgentError};

/// Runs one game between two agents.
///
/// Both agents must be bound to the same session, on different slots.
/// The orchestrator never touches the board itself: it starts the session
/// and hands the turn to the agent of the current slot until the session
/// is no longer running.
pub struct Orchestrator<A, B> {
    session: SessionHandle,
    first: A,
    second: B,
}

impl<A: Agent, B: Agent> Orchestrator<A, B> {
    /// # Errors
    /// - `AgentError::SessionMismatch` if the agents play different sessions.
    /// - `AgentError::SlotConflict` if they play the same slot.
    pub fn new(a: A, b: B) -> Result<Self, AgentError> {
        if !a.session().same_session(b.session()) {
            return Err(AgentError::SessionMismatch);
        }
        if a.slot() == b.slot() {
            return Err(AgentError::SlotConflict(a.slot()));
        }
        Ok(Self {
            session: a.session().clone(),
            first: a,
            second: b,
        })
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Starts the session with `first` to move and plays it out.
    ///
    /// # Errors
    /// Fails if the session cannot start or an agent fails. On an agent
    /// failure the session is stopped without a winner first.
    pub async fn run(self, first: PlayerSlot) -> Result<GameOutcome, AgentError> {
        self.session.start(first)?;
        tracing::info!(game = %self.session.name(), %first, "orchestrator running");
        self.resume().await
    }

    /// Plays out a session that has already been started.
    ///
    /// Used when the game must be running before any agent is asked, e.g.
    /// when the remote side may move as soon as the server says so.
    pub async fn resume(mut self) -> Result<GameOutcome, AgentError> {
        loop {
            let (running, current) = {
                let game = self.session.lock();
                (game.state().is_running(), game.current_player())
            };
            if !running {
                break;
            }
            let Some(current) = current else { break };

            let result = if current == self.first.slot() {
                self.first.perform_next_move().await
            } else {
                self.second.perform_next_move().await
            };

            if let Err(e) = result {
                tracing::warn!(slot = %current, error = %e, "agent failed; stopping game");
                self.session.stop(None);
                return Err(e);
            }
        }

        let outcome = self.session.outcome().unwrap_or_else(|| GameOutcome {
            winner: None,
            scores: self.session.scores(),
        });
        tracing::info!(winner = ?outcome.winner, scores = ?outcome.scores, "orchestrator finished");
        Ok(outcome)
    }

    /// Runs the game on its own task.
    pub fn spawn(self, first: PlayerSlot) -> JoinHandle<Result<GameOutcome, AgentError>> {
        tokio::spawn(self.run(first))
    }
}
