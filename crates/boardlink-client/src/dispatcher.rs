//! Message dispatcher: the single consumer of a connection's lines.
//!
//! Each line from the reader task goes through [`Dispatcher::handle_line`]:
//!
//! ```text
//!   OK        → resolve the pending command with success
//!   ERR text  → resolve the pending command with the server's text
//!   SVR ...   → decode and publish to the client's listeners
//!   other     → log and drop
//! ```
//!
//! This task is the only writer of the pending-ack slot and the only
//! publisher of client events, so listeners never run concurrently with
//! each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use boardlink_protocol::{
    Challenge, ChallengeId, DomainEvent, Player, ProtocolError, ServerMessage,
    decode_line,
};
use boardlink_transport::ConnectionId;
use tokio::sync::{mpsc, oneshot, watch};

use crate::ClientEvents;

/// How a command was answered: `Ok` for `OK`, `Err(text)` for `ERR text`.
pub(crate) type Ack = Result<(), String>;

/// State shared between the dispatcher task and the command side.
pub(crate) struct Connection {
    pub(crate) conn_id: ConnectionId,
    pub(crate) events: Arc<ClientEvents>,
    /// Reply slot for the one outstanding command.
    pending: Mutex<Option<oneshot::Sender<Ack>>>,
    challenges: Mutex<HashMap<ChallengeId, Challenge>>,
    pub(crate) player_list: watch::Sender<Option<Vec<Player>>>,
    pub(crate) game_list: watch::Sender<Option<Vec<String>>>,
    open: watch::Sender<bool>,
}

impl Connection {
    pub(crate) fn new(conn_id: ConnectionId, events: Arc<ClientEvents>) -> Self {
        Self {
            conn_id,
            events,
            pending: Mutex::new(None),
            challenges: Mutex::new(HashMap::new()),
            player_list: watch::Sender::new(None),
            game_list: watch::Sender::new(None),
            open: watch::Sender::new(true),
        }
    }

    /// Installs a fresh reply slot and returns its receiving end.
    ///
    /// Any previous slot is dropped, which fails its waiter with a
    /// `RecvError`. Callers hold the command lock, so there is none in
    /// practice.
    pub(crate) fn install_pending(&self) -> oneshot::Receiver<Ack> {
        let (tx, rx) = oneshot::channel();
        *lock(&self.pending) = Some(tx);
        rx
    }

    /// Clears the reply slot, e.g. after a timeout.
    pub(crate) fn clear_pending(&self) {
        lock(&self.pending).take();
    }

    pub(crate) fn is_open(&self) -> bool {
        *self.open.borrow()
    }

    /// Marks the connection closed and fails any outstanding command.
    ///
    /// The flag flips before the slot is cleared. A command that installs
    /// its slot concurrently either sees the flag or has its slot dropped.
    pub(crate) fn mark_closed(&self) {
        self.open.send_replace(false);
        self.clear_pending();
    }

    /// Resolves once the connection is closed.
    pub(crate) async fn closed(&self) {
        let mut rx = self.open.subscribe();
        // The sender lives in `self`, so this cannot fail while we borrow it.
        let _ = rx.wait_for(|open| !*open).await;
    }

    pub(crate) fn challenges(&self) -> Vec<Challenge> {
        let mut list: Vec<Challenge> = lock(&self.challenges).values().cloned().collect();
        list.sort_by_key(|c| c.id.0);
        list
    }
}

// A panicking listener must not wedge the connection; the data is still valid.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Routes decoded lines to the pending command or to listeners.
pub(crate) struct Dispatcher {
    conn: Arc<Connection>,
}

impl Dispatcher {
    pub(crate) fn new(conn: Arc<Connection>) -> Self {
        Self { conn }
    }

    /// Consumes lines until the reader task ends, then marks the
    /// connection closed.
    pub(crate) async fn run(self, mut lines: mpsc::Receiver<String>) {
        let conn_id = self.conn.conn_id;
        tracing::debug!(%conn_id, "dispatcher started");

        while let Some(line) = lines.recv().await {
            self.handle_line(&line);
        }

        self.conn.mark_closed();
        tracing::info!(%conn_id, "connection closed");
    }

    pub(crate) fn handle_line(&self, line: &str) {
        let conn_id = self.conn.conn_id;
        match decode_line(line) {
            Ok(ServerMessage::Ok) => self.resolve(Ok(())),
            Ok(ServerMessage::Err(text)) => self.resolve(Err(text)),
            Ok(ServerMessage::Event(event)) => {
                tracing::debug!(%conn_id, kind = event.kind(), "event received");
                self.publish(event);
            }
            Err(ProtocolError::Unrecognized(line)) => {
                tracing::debug!(%conn_id, %line, "ignoring unrecognized line");
            }
            Err(e) => {
                tracing::warn!(%conn_id, error = %e, %line, "dropping malformed line");
            }
        }
    }

    fn resolve(&self, ack: Ack) {
        let pending = lock(&self.conn.pending).take();
        match pending {
            Some(reply) => {
                // The waiter may have timed out and gone; nothing to do then.
                let _ = reply.send(ack);
            }
            None => {
                tracing::warn!(conn_id = %self.conn.conn_id, ?ack, "acknowledgement with no command outstanding");
            }
        }
    }

    fn publish(&self, event: DomainEvent) {
        let events = &self.conn.events;
        match event {
            DomainEvent::GameStart(start) => events.game_start().publish(&start),
            DomainEvent::Move(mv) => events.moves().publish(&mv),
            DomainEvent::Turn { message } => events.turn().publish(&message),
            DomainEvent::GameEnd(end) => {
                events.game_end().publish(&end);
                events.clear_game_listeners();
            }
            DomainEvent::ChallengeReceived(challenge) => {
                lock(&self.conn.challenges).insert(challenge.id, challenge.clone());
                events.challenge_received().publish(&challenge);
            }
            DomainEvent::ChallengeCancelled { id } => {
                let removed = lock(&self.conn.challenges).remove(&id);
                match removed {
                    Some(challenge) => events.challenge_cancelled().publish(&challenge),
                    None => {
                        tracing::warn!(conn_id = %self.conn.conn_id, %id, "cancellation for unknown challenge");
                    }
                }
            }
            DomainEvent::PlayerList(players) => {
                self.conn.player_list.send_replace(Some(players.clone()));
                events.player_list().publish(&players);
            }
            DomainEvent::GameList(games) => {
                self.conn.game_list.send_replace(Some(games.clone()));
                events.game_list().publish(&games);
            }
        }
    }
}
