//! Protocol client for the Boardlink game server.
//!
//! This crate turns a line-oriented TCP connection into two things:
//!
//! 1. **Commands** — `login`, `subscribe_to_game`, `perform_move`, … each
//!    resolving to the server's `OK` or `ERR` ([`GameClient`]).
//! 2. **Events** — typed server pushes delivered to registered listeners
//!    ([`ClientEvents`]).
//!
//! # How it fits in the stack
//!
//! ```text
//! Agents (above)          ← register listeners, send moves
//!     ↕
//! Client (this crate)     ← correlates acks, publishes events
//!     ↕
//! Protocol / Transport    ← decode lines / read and write lines
//! ```
//!
//! # Tasks
//!
//! ```text
//!   socket ─▶ [reader task] ─(1 slot)─▶ [dispatcher task] ─▶ listeners
//!                                              │
//!   caller ─▶ CommandChannel ─▶ socket         └─▶ pending OK/ERR ─▶ caller
//! ```

mod client;
mod command;
mod config;
mod dispatcher;
mod error;
mod events;

pub use client::GameClient;
pub use config::ClientConfig;
pub use error::{ClientError, CommandError};
pub use events::ClientEvents;
