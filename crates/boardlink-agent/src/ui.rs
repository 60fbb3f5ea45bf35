//! An agent driven by a user interface.
//!
//! The UI thread (or task) holds a [`MoveSubmitter`] and calls
//! [`submit_move`](MoveSubmitter::submit_move) on a click; the agent picks
//! the move up on its next turn.

use std::sync::{Arc, Mutex, PoisonError};

use boardlink_game::{Cell, PlayerSlot, SessionHandle};
use tokio::sync::Notify;

use crate::{Agent, AgentError};

#[derive(Debug, Default)]
struct Mailbox {
    pending: Mutex<Option<Cell>>,
    notify: Notify,
}

impl Mailbox {
    fn take(&self) -> Option<Cell> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Hands moves from a UI to a [`UiAgent`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct MoveSubmitter {
    mailbox: Arc<Mailbox>,
}

impl MoveSubmitter {
    /// Offers `(x, y)` as the next move. A newer submission replaces one
    /// the agent has not picked up yet.
    pub fn submit_move(&self, x: usize, y: usize) {
        *self
            .mailbox
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Cell::new(x, y));
        self.mailbox.notify.notify_one();
    }
}

/// Waits for the UI to submit a move, then plays it.
///
/// A refused move is dropped and the agent waits for the next one.
#[derive(Debug)]
pub struct UiAgent {
    session: SessionHandle,
    slot: PlayerSlot,
    mailbox: Arc<Mailbox>,
}

impl UiAgent {
    pub fn new(session: SessionHandle, slot: PlayerSlot) -> Self {
        let mailbox = Arc::new(Mailbox::default());

        // Wake a waiting turn when the game ends under it.
        let wake = Arc::clone(&mailbox);
        session
            .events()
            .ended()
            .register(move |_| wake.notify.notify_one());

        Self {
            session,
            slot,
            mailbox,
        }
    }

    /// A handle for the UI side.
    pub fn submitter(&self) -> MoveSubmitter {
        MoveSubmitter {
            mailbox: Arc::clone(&self.mailbox),
        }
    }
}

impl Agent for UiAgent {
    fn slot(&self) -> PlayerSlot {
        self.slot
    }

    fn session(&self) -> &SessionHandle {
        &self.session
    }

    async fn perform_next_move(&mut self) -> Result<(), AgentError> {
        loop {
            if !self.session.is_turn_of(self.slot) {
                return Ok(());
            }
            if let Some(cell) = self.mailbox.take() {
                if self.session.try_move(self.slot, cell.x, cell.y) {
                    return Ok(());
                }
                tracing::debug!(slot = %self.slot, %cell, "submitted move refused");
                continue;
            }
            self.mailbox.notify.notified().await;
        }
    }
}
