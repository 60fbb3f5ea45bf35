//! Agents and the turn loop for Boardlink.
//!
//! An [`Agent`] produces moves for one slot of one
//! [`SessionHandle`](boardlink_game::SessionHandle). Where the moves come
//! from is up to the agent:
//!
//! - [`LocalAgent`] — `x y` lines from a text source such as stdin
//! - [`UiAgent`] — clicks handed over through a [`MoveSubmitter`]
//! - [`ComputedAgent`] — a [`MoveProposer`] ([`FirstLegalMove`],
//!   [`RandomLegalMove`], or any closure)
//! - [`NetworkAgent`] — the remote opponent on a
//!   [`GameClient`](boardlink_client::GameClient)
//!
//! The [`Orchestrator`] binds two agents to a session and asks whichever
//! slot is to move until the game is over:
//!
//! ```text
//!   Orchestrator ──perform_next_move──▶ Agent(slot One) ──try_move──▶ Session
//!                └─perform_next_move──▶ Agent(slot Two) ──try_move──▶ Session
//! ```

mod agent;
mod computed;
mod error;
mod local;
mod network;
mod orchestrator;
mod ui;

pub use agent::Agent;
pub use computed::{ComputedAgent, FirstLegalMove, MoveProposer, RandomLegalMove};
pub use error::AgentError;
pub use local::{LocalAgent, parse_coordinates};
pub use network::NetworkAgent;
pub use orchestrator::Orchestrator;
pub use ui::{MoveSubmitter, UiAgent};
