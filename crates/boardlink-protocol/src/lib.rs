//! Wire protocol for Boardlink.
//!
//! This crate defines the "language" the game server speaks:
//!
//! - **Types** ([`DomainEvent`], [`Player`], [`Challenge`], etc.) — the
//!   events the server pushes, decoded into plain data.
//! - **Codec** ([`decode_line`], [`ServerMessage`]) — how one text line
//!   becomes an acknowledgement or an event.
//! - **Commands** ([`Command`]) — the lines the client sends.
//! - **Errors** ([`ProtocolError`]) — why a line could not be understood.
//!
//! # Architecture
//!
//! The protocol layer sits between the transport (raw lines) and the
//! client (acks and listeners). It doesn't know about connections or
//! games; it only turns strings into types and back.
//!
//! ```text
//! Transport (lines) → Protocol (ServerMessage) → Client (ack / publish)
//! ```

mod codec;
mod command;
mod error;
pub mod notation;
mod types;

pub use codec::{ServerMessage, decode_line};
pub use command::Command;
pub use error::ProtocolError;
pub use types::{
    Challenge, ChallengeId, DomainEvent, GameEnd, GameResult, GameStart, Move,
    Player,
};
