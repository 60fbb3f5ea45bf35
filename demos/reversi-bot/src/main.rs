//! Logs in, subscribes to a game type, and plays random legal moves until
//! the connection closes.
//!
//! ```text
//! BOARDLINK_ADDR=127.0.0.1:7789 BOARDLINK_NAME=bot cargo run -p reversi-bot
//! ```

use std::sync::Arc;

use boardlink::prelude::*;
use boardlink::{AutoPlayError, DEFAULT_FILTER};

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

struct Settings {
    addr: String,
    name: String,
    game_type: String,
    matches: Option<u32>,
}

impl Settings {
    fn from_env() -> Self {
        let var = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());
        Self {
            addr: var("BOARDLINK_ADDR", "127.0.0.1:7789"),
            name: var("BOARDLINK_NAME", "reversi-bot"),
            game_type: var("BOARDLINK_GAME", GameKind::Reversi.name()),
            matches: std::env::var("BOARDLINK_MATCHES").ok().and_then(|n| n.parse().ok()),
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), BoardlinkError> {
    init_logging(DEFAULT_FILTER);
    let settings = Settings::from_env();

    let client = Arc::new(GameClient::connect(settings.addr.as_str(), ClientConfig::default()).await?);
    client.login(&settings.name).await?;

    let games = client.get_game_list().await?;
    tracing::info!(?games, "server games");

    let player = AutoPlayer::new(Arc::clone(&client), RandomLegalMove::new());
    let mut played = 0u32;
    let (mut won, mut lost, mut drawn) = (0u32, 0u32, 0u32);

    while settings.matches.is_none_or(|limit| played < limit) {
        match player.subscribe_and_play(&settings.game_type).await {
            Ok(report) => {
                played += 1;
                match report.server_result {
                    GameResult::Win => won += 1,
                    GameResult::Loss => lost += 1,
                    GameResult::Draw => drawn += 1,
                }
                tracing::info!(
                    opponent = %report.opponent,
                    result = %report.server_result,
                    scores = ?report.outcome.scores,
                    won,
                    lost,
                    drawn,
                    "match done"
                );
            }
            Err(AutoPlayError::Disconnected) => {
                tracing::warn!("server closed the connection");
                break;
            }
            Err(AutoPlayError::UnsupportedGame(game_type)) => {
                tracing::warn!(%game_type, "skipped match");
            }
            Err(e) => return Err(e.into()),
        }
    }

    client.disconnect().await;
    tracing::info!(played, won, lost, drawn, "bot finished");
    Ok(())
}
