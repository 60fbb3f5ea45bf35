//! # Boardlink
//!
//! Client library for a line-oriented two-player board game server.
//!
//! Boardlink connects to the server, turns its `SVR ...` pushes into typed
//! events, keeps a local copy of each game in a session state machine, and
//! lets agents (keyboard, UI, computed, remote) take turns on it.
//!
//! ```text
//! AutoPlayer (this crate)      ← headless: wait for a match, play it
//!     ↕
//! Agents + Orchestrator        ← boardlink-agent
//!     ↕
//! Game session + rules         ← boardlink-game
//!     ↕
//! Client + events              ← boardlink-client, boardlink-events
//!     ↕
//! Protocol / Transport         ← boardlink-protocol, boardlink-transport
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use boardlink::prelude::*;
//!
//! # async fn run() -> Result<(), BoardlinkError> {
//! let client = Arc::new(GameClient::connect("127.0.0.1:7789", ClientConfig::default()).await?);
//! client.login("bot").await?;
//!
//! let player = AutoPlayer::new(Arc::clone(&client), RandomLegalMove::new());
//! let report = player.subscribe_and_play("Reversi").await?;
//! println!("{} against {}", report.server_result, report.opponent);
//! # Ok(())
//! # }
//! ```

mod autoplay;
mod error;
mod logging;

pub use autoplay::{AutoPlayer, MatchReport};
pub use error::{AutoPlayError, BoardlinkError};
pub use logging::{DEFAULT_FILTER, init_logging};

pub use boardlink_agent as agent;
pub use boardlink_client as client;
pub use boardlink_events as events;
pub use boardlink_game as game;
pub use boardlink_protocol as protocol;
pub use boardlink_transport as transport;

/// The types most programs need.
pub mod prelude {
    pub use crate::{AutoPlayError, AutoPlayer, BoardlinkError, MatchReport, init_logging};
    pub use boardlink_agent::{
        Agent, AgentError, ComputedAgent, FirstLegalMove, LocalAgent, MoveProposer,
        MoveSubmitter, NetworkAgent, Orchestrator, RandomLegalMove, UiAgent,
    };
    pub use boardlink_client::{ClientConfig, ClientError, ClientEvents, CommandError, GameClient};
    pub use boardlink_game::{
        Board, Cell, GameKind, GameOutcome, PlayerSlot, RuleEngine, SessionHandle, SessionState,
        TileState,
    };
    pub use boardlink_protocol::{
        Challenge, ChallengeId, GameEnd, GameResult, GameStart, Move, Player,
    };
}
