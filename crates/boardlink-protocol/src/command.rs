//! Outbound commands and their wire form.

use std::fmt;

use crate::ChallengeId;

/// A command the client can send. `Display` renders the exact line,
/// without the trailing newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(String),
    Logout,
    GetGameList,
    GetPlayerList,
    Subscribe(String),
    Challenge { player: String, game_type: String },
    AcceptChallenge(ChallengeId),
    Move(usize),
    Forfeit,
}

impl Command {
    /// Short name for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Logout => "logout",
            Self::GetGameList => "get_game_list",
            Self::GetPlayerList => "get_player_list",
            Self::Subscribe(_) => "subscribe",
            Self::Challenge { .. } => "challenge",
            Self::AcceptChallenge(_) => "accept_challenge",
            Self::Move(_) => "move",
            Self::Forfeit => "forfeit",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login(name) => write!(f, "login {name}"),
            Self::Logout => write!(f, "logout"),
            Self::GetGameList => write!(f, "get gamelist"),
            Self::GetPlayerList => write!(f, "get playerlist"),
            Self::Subscribe(game) => write!(f, "subscribe {game}"),
            Self::Challenge { player, game_type } => {
                write!(f, "challenge \"{player}\" \"{game_type}\"")
            }
            Self::AcceptChallenge(id) => write!(f, "challenge accept {id}"),
            Self::Move(position) => write!(f, "move {position}"),
            Self::Forfeit => write!(f, "forfeit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_display_wire_lines() {
        assert_eq!(Command::Login("Jip".into()).to_string(), "login Jip");
        assert_eq!(Command::Logout.to_string(), "logout");
        assert_eq!(Command::GetGameList.to_string(), "get gamelist");
        assert_eq!(Command::GetPlayerList.to_string(), "get playerlist");
        assert_eq!(
            Command::Subscribe("Reversi".into()).to_string(),
            "subscribe Reversi"
        );
        assert_eq!(
            Command::Challenge {
                player: "Janneke".into(),
                game_type: "Tic-tac-toe".into(),
            }
            .to_string(),
            "challenge \"Janneke\" \"Tic-tac-toe\""
        );
        assert_eq!(
            Command::AcceptChallenge(ChallengeId(4)).to_string(),
            "challenge accept 4"
        );
        assert_eq!(Command::Move(19).to_string(), "move 19");
        assert_eq!(Command::Forfeit.to_string(), "forfeit");
    }

    #[test]
    fn test_command_name() {
        assert_eq!(Command::Move(0).name(), "move");
        assert_eq!(Command::AcceptChallenge(ChallengeId(1)).name(), "accept_challenge");
    }
}
