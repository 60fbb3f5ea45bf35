//! An agent fed by text input: one `x y` pair per line.

use boardlink_game::{PlayerSlot, SessionHandle};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::{Agent, AgentError};

/// Reads moves as `x y` lines from an async line source, such as stdin.
///
/// Keeps reading until a move is accepted. Lines that don't parse, and
/// moves the session refuses, are logged and skipped.
pub struct LocalAgent<R> {
    session: SessionHandle,
    slot: PlayerSlot,
    input: Lines<R>,
}

impl<R> LocalAgent<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(session: SessionHandle, slot: PlayerSlot, input: R) -> Self {
        Self {
            session,
            slot,
            input: input.lines(),
        }
    }
}

/// Parses `"x y"` (extra whitespace allowed, a comma also separates).
pub fn parse_coordinates(line: &str) -> Option<(usize, usize)> {
    let mut parts = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|p| !p.is_empty());
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    parts.next().is_none().then_some((x, y))
}

impl<R> Agent for LocalAgent<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn slot(&self) -> PlayerSlot {
        self.slot
    }

    fn session(&self) -> &SessionHandle {
        &self.session
    }

    async fn perform_next_move(&mut self) -> Result<(), AgentError> {
        let slot = self.slot;
        while self.session.is_turn_of(slot) {
            tracing::debug!(%slot, board = %self.session.board(), "waiting for input");
            let line = self
                .input
                .next_line()
                .await
                .map_err(AgentError::Input)?
                .ok_or(AgentError::InputClosed)?;

            match parse_coordinates(&line) {
                Some((x, y)) => {
                    if !self.session.try_move(slot, x, y) {
                        tracing::warn!(%slot, x, y, "move not allowed");
                    }
                }
                None => tracing::warn!(%slot, %line, "expected \"x y\""),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use boardlink_game::{GameKind, TileState};

    use super::*;

    #[test]
    fn test_parse_coordinates_accepts_pairs() {
        assert_eq!(parse_coordinates("1 2"), Some((1, 2)));
        assert_eq!(parse_coordinates("  0   7 "), Some((0, 7)));
        assert_eq!(parse_coordinates("3,4"), Some((3, 4)));
    }

    #[test]
    fn test_parse_coordinates_rejects_junk() {
        assert_eq!(parse_coordinates(""), None);
        assert_eq!(parse_coordinates("1"), None);
        assert_eq!(parse_coordinates("a b"), None);
        assert_eq!(parse_coordinates("1 2 3"), None);
        assert_eq!(parse_coordinates("-1 2"), None);
    }

    #[tokio::test]
    async fn test_perform_next_move_skips_bad_lines_until_accepted() {
        let session = GameKind::TicTacToe.new_session();
        session.start(PlayerSlot::One).unwrap();
        let input: &[u8] = b"hello\n9 9\n1 1\n";
        let mut agent = LocalAgent::new(session.clone(), PlayerSlot::One, input);

        agent.perform_next_move().await.unwrap();

        assert_eq!(
            session.board().get(1, 1),
            Some(TileState::Occupied(PlayerSlot::One))
        );
        assert_eq!(session.current_player(), Some(PlayerSlot::Two));
    }

    #[tokio::test]
    async fn test_perform_next_move_input_closed() {
        let session = GameKind::TicTacToe.new_session();
        session.start(PlayerSlot::One).unwrap();
        let input: &[u8] = b"nonsense\n";
        let mut agent = LocalAgent::new(session, PlayerSlot::One, input);

        let err = agent.perform_next_move().await.unwrap_err();
        assert!(matches!(err, AgentError::InputClosed));
    }

    #[tokio::test]
    async fn test_perform_next_move_not_our_turn_returns_immediately() {
        let session = GameKind::TicTacToe.new_session();
        session.start(PlayerSlot::Two).unwrap();
        let input: &[u8] = b"";
        let mut agent = LocalAgent::new(session, PlayerSlot::One, input);

        agent.perform_next_move().await.unwrap();
    }
}
