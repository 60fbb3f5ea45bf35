//! Command channel: write a command, wait for its `OK` or `ERR`.
//!
//! The protocol has no request ids. An `OK` belongs to whichever command
//! was sent last, so at most one command may be in flight per connection.
//! The writer lives behind an async mutex that is held from the write
//! until the answer arrives; that lock *is* the one-outstanding rule.

use std::sync::Arc;
use std::time::Duration;

use boardlink_protocol::Command;
use boardlink_transport::LineWriter;
use tokio::sync::{Mutex, MutexGuard, oneshot, watch};

use crate::CommandError;
use crate::dispatcher::{Ack, Connection};

pub(crate) struct CommandChannel {
    conn: Arc<Connection>,
    writer: Mutex<LineWriter>,
    command_timeout: Duration,
    list_timeout: Duration,
}

impl CommandChannel {
    pub(crate) fn new(
        conn: Arc<Connection>,
        writer: LineWriter,
        command_timeout: Duration,
        list_timeout: Duration,
    ) -> Self {
        Self {
            conn,
            writer: Mutex::new(writer),
            command_timeout,
            list_timeout,
        }
    }

    /// Sends `command` and waits for the server's answer.
    pub(crate) async fn issue(&self, command: &Command) -> Result<(), CommandError> {
        let mut writer = self.lock_writer().await?;
        let ack = self.send_with_ack(&mut writer, command).await?;

        let conn_id = self.conn.conn_id;
        match tokio::time::timeout(self.command_timeout, ack).await {
            Ok(Ok(Ok(()))) => {
                tracing::debug!(%conn_id, command = command.name(), "command acknowledged");
                Ok(())
            }
            Ok(Ok(Err(text))) => {
                tracing::debug!(%conn_id, command = command.name(), %text, "command rejected");
                Err(CommandError::Rejected(text))
            }
            Ok(Err(_)) => Err(CommandError::ConnectionClosed),
            Err(_) => {
                self.conn.clear_pending();
                tracing::warn!(%conn_id, command = command.name(), "command timed out");
                Err(CommandError::Timeout)
            }
        }
    }

    /// Sends `command` without waiting for any answer.
    pub(crate) async fn send(&self, command: &Command) -> Result<(), CommandError> {
        let mut writer = self.lock_writer().await?;
        writer.send_line(&command.to_string()).await?;
        tracing::debug!(conn_id = %self.conn.conn_id, command = command.name(), "command sent");
        Ok(())
    }

    /// Sends a list request and waits for the list itself.
    ///
    /// The server may or may not answer `OK` before the list arrives. A
    /// bare `OK` is absorbed; an `ERR` fails the query.
    pub(crate) async fn query<T: Clone>(
        &self,
        command: &Command,
        snapshot: &watch::Sender<Option<T>>,
    ) -> Result<T, CommandError> {
        let mut writer = self.lock_writer().await?;

        snapshot.send_replace(None);
        let mut latest = snapshot.subscribe();
        let mut ack = self.send_with_ack(&mut writer, command).await?;
        let mut acked = false;

        let wait = async {
            loop {
                tokio::select! {
                    changed = latest.changed() => {
                        if changed.is_err() {
                            return Err(CommandError::ConnectionClosed);
                        }
                        if let Some(value) = latest.borrow_and_update().clone() {
                            return Ok(value);
                        }
                    }
                    answer = &mut ack, if !acked => match answer {
                        Ok(Ok(())) => acked = true,
                        Ok(Err(text)) => return Err(CommandError::Rejected(text)),
                        Err(_) => return Err(CommandError::ConnectionClosed),
                    },
                    _ = self.conn.closed() => return Err(CommandError::ConnectionClosed),
                }
            }
        };

        let result = tokio::time::timeout(self.list_timeout, wait)
            .await
            .unwrap_or(Err(CommandError::Timeout));
        if !acked {
            // Whatever answer comes later is no longer ours.
            self.conn.clear_pending();
        }
        result
    }

    /// Shuts the write half down. Later commands fail with `NotConnected`.
    pub(crate) async fn shutdown(&self) {
        self.writer.lock().await.shutdown().await;
    }

    async fn lock_writer(&self) -> Result<MutexGuard<'_, LineWriter>, CommandError> {
        let writer = self.writer.lock().await;
        if !writer.is_open() {
            return Err(CommandError::NotConnected);
        }
        if !self.conn.is_open() {
            return Err(CommandError::ConnectionClosed);
        }
        Ok(writer)
    }

    async fn send_with_ack(
        &self,
        writer: &mut LineWriter,
        command: &Command,
    ) -> Result<oneshot::Receiver<Ack>, CommandError> {
        let ack = self.conn.install_pending();
        // The dispatcher may have closed between the lock and the install.
        if !self.conn.is_open() {
            self.conn.clear_pending();
            return Err(CommandError::ConnectionClosed);
        }
        if let Err(e) = writer.send_line(&command.to_string()).await {
            self.conn.clear_pending();
            return Err(e.into());
        }
        tracing::trace!(conn_id = %self.conn.conn_id, command = command.name(), "awaiting acknowledgement");
        Ok(ack)
    }
}
