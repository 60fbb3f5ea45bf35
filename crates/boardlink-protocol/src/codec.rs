//! Decoding server lines into typed messages.
//!
//! Every line the server sends falls into one of three families:
//!
//! - `OK` acknowledges the last command.
//! - `ERR <text>` rejects the last command. `<text>` is kept verbatim.
//! - `SVR <header> <payload>` pushes an event, decoded to [`DomainEvent`].
//!
//! The `SVR` header is matched by its words, so `SVR GAME  MOVE` and
//! `SVR GAME MOVE` are the same message. Everything else is
//! [`ProtocolError::Unrecognized`].

use crate::notation::{Fields, parse_list, parse_object};
use crate::{
    Challenge, ChallengeId, DomainEvent, GameEnd, GameResult, GameStart, Move,
    Player, ProtocolError,
};

/// One decoded server line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// The outstanding command succeeded.
    Ok,
    /// The outstanding command failed. Carries the server's text as-is.
    Err(String),
    /// An unsolicited push.
    Event(DomainEvent),
}

/// Decodes one line (without its trailing newline).
pub fn decode_line(line: &str) -> Result<ServerMessage, ProtocolError> {
    let line = line.trim_end();

    if line == "OK" {
        return Ok(ServerMessage::Ok);
    }
    if let Some(rest) = line.strip_prefix("ERR") {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return Ok(ServerMessage::Err(rest.trim_start().to_string()));
        }
    }
    if let Some(rest) = line.strip_prefix("SVR ") {
        return decode_push(rest).map(ServerMessage::Event);
    }

    Err(ProtocolError::Unrecognized(line.to_string()))
}

/// Decodes the part of an `SVR` line after the keyword.
fn decode_push(rest: &str) -> Result<DomainEvent, ProtocolError> {
    let split = rest.find(['{', '[']).unwrap_or(rest.len());
    let (header, payload) = rest.split_at(split);
    let header: Vec<&str> = header.split_whitespace().collect();

    match header.as_slice() {
        ["PLAYERLIST"] => {
            let players = parse_list(payload)?
                .into_iter()
                .map(Player::new)
                .collect();
            Ok(DomainEvent::PlayerList(players))
        }
        ["GAMELIST"] => Ok(DomainEvent::GameList(parse_list(payload)?)),
        ["GAME", "CHALLENGE", "CANCELLED"] => {
            let fields = parse_object("challenge cancelled", payload)?;
            Ok(DomainEvent::ChallengeCancelled {
                id: ChallengeId(fields.require_number("CHALLENGENUMBER")?),
            })
        }
        ["GAME", "CHALLENGE"] => {
            let fields = parse_object("challenge", payload)?;
            Ok(DomainEvent::ChallengeReceived(Challenge {
                id: ChallengeId(fields.require_number("CHALLENGENUMBER")?),
                challenger: Player::new(fields.require("CHALLENGER")?),
                game_type: fields.require("GAMETYPE")?.to_string(),
            }))
        }
        ["GAME", "MATCH"] => {
            let fields = parse_object("match", payload)?;
            Ok(DomainEvent::GameStart(GameStart {
                starting_player: Player::new(fields.require("PLAYERTOMOVE")?),
                opponent: Player::new(fields.require("OPPONENT")?),
                game_type: fields.require("GAMETYPE")?.to_string(),
            }))
        }
        ["GAME", "YOURTURN"] => {
            let fields = parse_object("turn", payload)?;
            Ok(DomainEvent::Turn {
                message: fields.get_or_empty("TURNMESSAGE").to_string(),
            })
        }
        ["GAME", "MOVE"] => {
            let fields = parse_object("move", payload)?;
            Ok(DomainEvent::Move(Move {
                player: Player::new(fields.require("PLAYER")?),
                position: fields.require_number("MOVE")?,
                details: fields.get_or_empty("DETAILS").to_string(),
            }))
        }
        ["GAME", "WIN"] => game_end(GameResult::Win, payload),
        ["GAME", "LOSS"] => game_end(GameResult::Loss, payload),
        ["GAME", "DRAW"] => game_end(GameResult::Draw, payload),
        _ => Err(ProtocolError::Unrecognized(format!("SVR {rest}"))),
    }
}

fn game_end(result: GameResult, payload: &str) -> Result<DomainEvent, ProtocolError> {
    let fields: Fields = parse_object("game end", payload)?;
    Ok(DomainEvent::GameEnd(GameEnd {
        result,
        player_one_score: fields.require_number("PLAYERONESCORE")?,
        player_two_score: fields.require_number("PLAYERTWOSCORE")?,
        comment: fields.get_or_empty("COMMENT").to_string(),
    }))
}
