//! The `Agent` trait — anything that can produce moves for one slot.

use std::future::Future;

use boardlink_game::{PlayerSlot, SessionHandle};

use crate::AgentError;

/// A move producer bound to one slot of one session for its whole life.
///
/// The orchestrator calls [`perform_next_move`](Self::perform_next_move)
/// whenever it is this agent's slot to move. The call should return once
/// the agent has made a move through the session (or the turn has moved
/// on for another reason, e.g. the game ended).
///
/// # Trait bounds
///
/// - `Send + 'static` → agents are moved into the orchestrator's task.
/// - The returned future is `Send` for the same reason.
pub trait Agent: Send + 'static {
    /// The slot this agent plays.
    fn slot(&self) -> PlayerSlot;

    /// The session this agent plays in.
    fn session(&self) -> &SessionHandle;

    /// Makes this agent's next move.
    fn perform_next_move(
        &mut self,
    ) -> impl Future<Output = Result<(), AgentError>> + Send;

    /// Gives up: the opponent wins.
    fn forfeit(&self) {
        self.session().forfeit(self.slot());
    }
}
