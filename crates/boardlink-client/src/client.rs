//! The game client: one connection, its tasks, and the command API.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use boardlink_protocol::{Challenge, ChallengeId, Command, Player};
use boardlink_transport::{ConnectionId, LineWriter, connect_tcp, spawn_line_reader};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::ToSocketAddrs;
use tokio::task::JoinHandle;

use crate::command::CommandChannel;
use crate::dispatcher::{Connection, Dispatcher};
use crate::{ClientConfig, ClientError, ClientEvents};

/// A connected client for the game server.
///
/// Creating a client spawns two tasks: the line reader (bytes → lines) and
/// the dispatcher (lines → acks and events). They live until the server
/// closes the connection, [`disconnect`](Self::disconnect) is called, or
/// the client is dropped.
///
/// Commands are serialised: calling two of them concurrently is allowed,
/// the second simply waits for the first to be answered.
pub struct GameClient {
    conn: Arc<Connection>,
    commands: CommandChannel,
    config: ClientConfig,
    local_player: Mutex<Option<Player>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl GameClient {
    /// Connects to the server over TCP.
    pub async fn connect<A>(addr: A, config: ClientConfig) -> Result<Self, ClientError>
    where
        A: ToSocketAddrs + fmt::Debug,
    {
        let stream = connect_tcp(addr).await?;
        let (reader, writer) = stream.into_split();
        Ok(Self::from_parts(reader, writer, config))
    }

    /// Wraps an already-open duplex stream.
    ///
    /// Must be called from inside a Tokio runtime.
    pub fn from_stream<S>(stream: S, config: ClientConfig) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, writer) = tokio::io::split(stream);
        Self::from_parts(reader, writer, config)
    }

    /// Wraps separate read and write halves.
    ///
    /// Must be called from inside a Tokio runtime.
    pub fn from_parts<R, W>(reader: R, writer: W, config: ClientConfig) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let conn_id = ConnectionId::next();
        let conn = Arc::new(Connection::new(conn_id, Arc::new(ClientEvents::new())));

        let (lines, reader_task) = spawn_line_reader(conn_id, reader);
        let dispatcher_task = tokio::spawn(Dispatcher::new(Arc::clone(&conn)).run(lines));

        let commands = CommandChannel::new(
            Arc::clone(&conn),
            LineWriter::new(conn_id, writer),
            config.command_timeout,
            config.list_timeout,
        );

        tracing::info!(%conn_id, "client started");
        Self {
            conn,
            commands,
            config,
            local_player: Mutex::new(None),
            tasks: Mutex::new(vec![reader_task, dispatcher_task]),
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.conn.conn_id
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The listener registries for this connection.
    pub fn events(&self) -> &Arc<ClientEvents> {
        &self.conn.events
    }

    /// `true` until the server closes the connection or `disconnect` is
    /// called.
    pub fn is_connected(&self) -> bool {
        self.conn.is_open()
    }

    /// Resolves once the connection is closed, for whatever reason.
    pub async fn closed(&self) {
        self.conn.closed().await;
    }

    /// The name of the last successful login on this connection.
    pub fn local_player(&self) -> Option<Player> {
        self.local_player
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Open challenges received on this connection, ordered by id.
    pub fn challenges(&self) -> Vec<Challenge> {
        self.conn.challenges()
    }

    // -- Commands -------------------------------------------------------

    pub async fn login(&self, name: &str) -> Result<(), ClientError> {
        self.commands
            .issue(&Command::Login(name.to_string()))
            .await
            .map_err(ClientError::Login)?;
        *self
            .local_player
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Player::new(name));
        tracing::info!(conn_id = %self.conn.conn_id, player = name, "logged in");
        Ok(())
    }

    /// Sends `logout`. The server closes the connection instead of
    /// answering, so this does not wait.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.commands
            .send(&Command::Logout)
            .await
            .map_err(ClientError::Login)
    }

    pub async fn subscribe_to_game(&self, game_type: &str) -> Result<(), ClientError> {
        self.commands
            .issue(&Command::Subscribe(game_type.to_string()))
            .await
            .map_err(ClientError::Subscribe)
    }

    pub async fn challenge_player(&self, player: &str, game_type: &str) -> Result<(), ClientError> {
        let command = Command::Challenge {
            player: player.to_string(),
            game_type: game_type.to_string(),
        };
        self.commands
            .issue(&command)
            .await
            .map_err(ClientError::Challenge)
    }

    pub async fn accept_challenge(&self, id: ChallengeId) -> Result<(), ClientError> {
        self.commands
            .issue(&Command::AcceptChallenge(id))
            .await
            .map_err(ClientError::Challenge)
    }

    /// Sends a move. `position` is `y * width + x`.
    ///
    /// The server may acknowledge an illegal move with `OK` and end the
    /// game instead, so legality is checked by the game session before a
    /// move ever gets here.
    pub async fn perform_move(&self, position: usize) -> Result<(), ClientError> {
        self.commands
            .issue(&Command::Move(position))
            .await
            .map_err(ClientError::Move)
    }

    pub async fn forfeit(&self) -> Result<(), ClientError> {
        self.commands
            .issue(&Command::Forfeit)
            .await
            .map_err(ClientError::Move)
    }

    /// Asks the server for the games it supports.
    pub async fn get_game_list(&self) -> Result<Vec<String>, ClientError> {
        self.commands
            .query(&Command::GetGameList, &self.conn.game_list)
            .await
            .map_err(ClientError::Query)
    }

    /// Asks the server for the players currently logged in.
    pub async fn get_player_list(&self) -> Result<Vec<Player>, ClientError> {
        self.commands
            .query(&Command::GetPlayerList, &self.conn.player_list)
            .await
            .map_err(ClientError::Query)
    }

    /// Closes the connection and stops its tasks.
    ///
    /// A command waiting for an answer fails with `ConnectionClosed`;
    /// later commands fail with `NotConnected`.
    pub async fn disconnect(&self) {
        self.conn.mark_closed();
        self.abort_tasks();
        self.commands.shutdown().await;
        tracing::info!(conn_id = %self.conn.conn_id, "disconnected");
    }

    fn abort_tasks(&self) {
        let tasks = std::mem::take(&mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner));
        for task in tasks {
            task.abort();
        }
    }
}

impl Drop for GameClient {
    fn drop(&mut self) {
        self.abort_tasks();
    }
}

impl fmt::Debug for GameClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameClient")
            .field("conn_id", &self.conn.conn_id)
            .field("connected", &self.is_connected())
            .finish()
    }
}
