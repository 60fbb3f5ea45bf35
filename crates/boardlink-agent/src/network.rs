//! The remote opponent, seen through a [`GameClient`].
//!
//! A `NetworkAgent` bridges one session slot to the server:
//!
//! ```text
//!   server MOVE (opponent) ──▶ try_move(own slot) ──▶ wake perform_next_move
//!   session Moved (local)  ──▶ queue ──▶ [forwarder] ──(YOURTURN token)──▶ server
//!   server GAME WIN/LOSS/DRAW ──▶ stop the session
//! ```
//!
//! The forwarder only sends a move after the server has granted a turn, one
//! move per `YOURTURN`. It keeps running after the agent is dropped so the
//! final local move still reaches the server; it exits on game end or
//! connection loss.

use std::sync::Arc;

use boardlink_client::GameClient;
use boardlink_game::{PlayerSlot, SessionHandle};
use boardlink_protocol::{GameEnd, GameResult, Move};
use tokio::sync::{Notify, Semaphore, mpsc, watch};

use crate::{Agent, AgentError};

#[derive(Debug)]
struct Shared {
    /// Woken after each remote move is applied.
    moved: Notify,
    /// Set once the server has ended the game.
    finished: watch::Sender<bool>,
    /// One permit per `YOURTURN`.
    turns: Semaphore,
}

impl Shared {
    async fn finished(&self) {
        let mut rx = self.finished.subscribe();
        let _ = rx.wait_for(|done| *done).await;
    }
}

/// Plays the slot of the remote player.
pub struct NetworkAgent {
    session: SessionHandle,
    slot: PlayerSlot,
    client: Arc<GameClient>,
    shared: Arc<Shared>,
}

impl NetworkAgent {
    /// Binds the remote player to `slot` of `session`.
    ///
    /// Registers listeners on the client and the session, and spawns the
    /// move forwarder. Must be called from inside a Tokio runtime, before
    /// the server's first `YOURTURN` of the game is dispatched.
    ///
    /// # Errors
    /// `AgentError::NotLoggedIn` if the client has no local player yet.
    pub fn new(
        session: SessionHandle,
        slot: PlayerSlot,
        client: Arc<GameClient>,
    ) -> Result<Self, AgentError> {
        let local_player = client.local_player().ok_or(AgentError::NotLoggedIn)?;
        let shared = Arc::new(Shared {
            moved: Notify::new(),
            finished: watch::Sender::new(false),
            turns: Semaphore::new(0),
        });

        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let width = session.board().width();
        let local_slot = slot.opponent();

        // Local moves out. Runs under the session lock: queue only.
        session.events().moved().register(move |attempt| {
            if attempt.slot == local_slot {
                let _ = queue_tx.send(attempt.cell.y * width + attempt.cell.x);
            }
        });

        let events = client.events();

        // Remote moves in.
        {
            let session = session.clone();
            let shared = Arc::clone(&shared);
            events.moves().register(move |mv: &Move| {
                if mv.player == local_player {
                    return;
                }
                apply_remote_move(&session, slot, mv);
                shared.moved.notify_one();
            });
        }

        {
            let shared = Arc::clone(&shared);
            events.turn().register(move |_| shared.turns.add_permits(1));
        }

        {
            let session = session.clone();
            let shared = Arc::clone(&shared);
            events.game_end().register(move |end: &GameEnd| {
                let winner = match end.result {
                    GameResult::Win => Some(slot.opponent()),
                    GameResult::Loss => Some(slot),
                    GameResult::Draw => None,
                };
                tracing::info!(result = %end.result, ?winner, "server ended the game");
                session.stop(winner);
                shared.finished.send_replace(true);
                shared.moved.notify_one();
            });
        }

        tokio::spawn(forward_moves(
            Arc::clone(&client),
            Arc::clone(&shared),
            queue_rx,
        ));

        Ok(Self {
            session,
            slot,
            client,
            shared,
        })
    }
}

fn apply_remote_move(session: &SessionHandle, slot: PlayerSlot, mv: &Move) {
    let mut game = session.lock();
    let Some(cell) = game.board().cell_at(mv.position) else {
        tracing::warn!(player = %mv.player, position = mv.position, "remote move off the board");
        return;
    };
    if !game.try_move(slot, cell.x, cell.y) {
        tracing::warn!(player = %mv.player, %cell, "remote move refused by local session");
    }
}

async fn forward_moves(
    client: Arc<GameClient>,
    shared: Arc<Shared>,
    mut queue: mpsc::UnboundedReceiver<usize>,
) {
    let conn_id = client.connection_id();
    loop {
        let position = tokio::select! {
            biased;
            position = queue.recv() => match position {
                Some(position) => position,
                None => break,
            },
            _ = shared.finished() => break,
            _ = client.closed() => break,
        };

        tokio::select! {
            biased;
            permit = shared.turns.acquire() => match permit {
                Ok(permit) => permit.forget(),
                Err(_) => break,
            },
            _ = shared.finished() => break,
            _ = client.closed() => break,
        }

        if let Err(e) = client.perform_move(position).await {
            tracing::warn!(%conn_id, position, error = %e, "failed to forward move");
            if !client.is_connected() {
                break;
            }
        }
    }
    tracing::debug!(%conn_id, "move forwarder stopped");
}

impl Agent for NetworkAgent {
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
            if !self.client.is_connected() {
                return Err(AgentError::Disconnected);
            }
            tokio::select! {
                _ = self.shared.moved.notified() => {}
                _ = self.shared.finished() => {}
                _ = self.client.closed() => {}
            }
        }
    }
}
