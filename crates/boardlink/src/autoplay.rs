//! Headless match runner: wait for the server to start a game, then play
//! it out with a move proposer against the remote opponent.
//!
//! ```text
//!   SVR GAME MATCH ──▶ session (GameKind) ──▶ ComputedAgent (local slot)
//!                                         └─▶ NetworkAgent  (remote slot)
//!                  ──▶ Orchestrator::run ──▶ wait for SVR GAME WIN/LOSS/DRAW
//! ```
//!
//! The starting player always gets [`PlayerSlot::One`].

use std::sync::{Arc, Mutex, PoisonError, Weak};

use boardlink_agent::{AgentError, ComputedAgent, MoveProposer, NetworkAgent, Orchestrator};
use boardlink_client::GameClient;
use boardlink_game::{GameKind, GameOutcome, PlayerSlot};
use boardlink_protocol::{GameEnd, GameResult, GameStart, Player};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::AutoPlayError;

/// What happened in one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    /// The game type as the server named it.
    pub game_type: String,
    pub opponent: Player,
    /// The slot the local player had on the local board.
    pub local_slot: PlayerSlot,
    /// The result as the local session saw it.
    pub outcome: GameOutcome,
    /// The result the server announced, from the local player's side.
    pub server_result: GameResult,
}

impl MatchReport {
    /// `true` if the local board and the server agree on who won.
    pub fn is_consistent(&self) -> bool {
        let expected = match self.server_result {
            GameResult::Win => Some(self.local_slot),
            GameResult::Loss => Some(self.local_slot.opponent()),
            GameResult::Draw => None,
        };
        self.outcome.winner == expected
    }
}

type LocalVsRemote<P> = Orchestrator<ComputedAgent<P>, NetworkAgent>;

struct Prepared<P> {
    game_type: String,
    opponent: Player,
    local_slot: PlayerSlot,
    orchestrator: LocalVsRemote<P>,
    game_end: oneshot::Receiver<GameEnd>,
}

/// Plays server-arranged matches for the logged-in player.
///
/// The proposer is cloned for each match.
pub struct AutoPlayer<P> {
    client: Arc<GameClient>,
    proposer: P,
}

impl<P> AutoPlayer<P>
where
    P: MoveProposer + Clone + Sync,
{
    pub fn new(client: Arc<GameClient>, proposer: P) -> Self {
        Self { client, proposer }
    }

    pub fn client(&self) -> &Arc<GameClient> {
        &self.client
    }

    /// Waits for the next `GAME MATCH` and plays it to the end.
    ///
    /// # Errors
    /// - `AgentError::NotLoggedIn` (as `AutoPlayError::Agent`) before login.
    /// - `AutoPlayError::UnsupportedGame` for a game without local rules;
    ///   the match is forfeited.
    /// - `AutoPlayError::Disconnected` if the connection drops first.
    pub async fn play_match(&self) -> Result<MatchReport, AutoPlayError> {
        let armed = self.arm()?;
        self.finish(armed).await
    }

    /// Subscribes to `game_type` and plays the match the server arranges.
    ///
    /// The match listener is in place before the subscription is sent, so
    /// a match starting right after the `OK` is not missed.
    pub async fn subscribe_and_play(&self, game_type: &str) -> Result<MatchReport, AutoPlayError> {
        let armed = self.arm()?;
        self.client.subscribe_to_game(game_type).await?;
        self.finish(armed).await
    }

    /// Registers the one-shot `GAME MATCH` listener.
    ///
    /// The session and both agents are built, and the session started,
    /// inside the listener on the dispatcher task. The remote agent is
    /// listening before the server's first `YOURTURN` or `MOVE` of the
    /// game is dispatched.
    fn arm(&self) -> Result<oneshot::Receiver<Result<Prepared<P>, AutoPlayError>>, AutoPlayError> {
        let local = self.client.local_player().ok_or(AgentError::NotLoggedIn)?;
        let (tx, rx) = oneshot::channel();
        let tx = Mutex::new(Some(tx));
        let client = Arc::downgrade(&self.client);
        let proposer = self.proposer.clone();

        self.client.events().game_start().register(move |start: &GameStart| {
            let Some(tx) = tx.lock().unwrap_or_else(PoisonError::into_inner).take() else {
                return;
            };
            let prepared = prepare(&client, &local, proposer.clone(), start);
            let _ = tx.send(prepared);
        });
        Ok(rx)
    }

    async fn finish(
        &self,
        armed: oneshot::Receiver<Result<Prepared<P>, AutoPlayError>>,
    ) -> Result<MatchReport, AutoPlayError> {
        let prepared = tokio::select! {
            prepared = armed => prepared.map_err(|_| AutoPlayError::Disconnected)?,
            _ = self.client.closed() => return Err(AutoPlayError::Disconnected),
        };

        let prepared = match prepared {
            Ok(prepared) => prepared,
            Err(AutoPlayError::UnsupportedGame(game_type)) => {
                tracing::warn!(%game_type, "no rules for game; forfeiting");
                if let Err(e) = self.client.forfeit().await {
                    tracing::warn!(error = %e, "forfeit failed");
                }
                return Err(AutoPlayError::UnsupportedGame(game_type));
            }
            Err(e) => return Err(e),
        };

        let Prepared {
            game_type,
            opponent,
            local_slot,
            orchestrator,
            game_end,
        } = prepared;

        tracing::info!(%game_type, %opponent, %local_slot, "match started");
        let outcome = orchestrator.resume().await?;

        let end = tokio::select! {
            end = game_end => end.map_err(|_| AutoPlayError::Disconnected)?,
            _ = self.client.closed() => return Err(AutoPlayError::Disconnected),
        };

        let report = MatchReport {
            game_type,
            opponent,
            local_slot,
            outcome,
            server_result: end.result,
        };
        if !report.is_consistent() {
            tracing::warn!(?report, "local board disagrees with the server");
        }
        tracing::info!(
            result = %report.server_result,
            scores = ?report.outcome.scores,
            comment = %end.comment,
            "match finished"
        );
        Ok(report)
    }
}

fn prepare<P: MoveProposer>(
    client: &Weak<GameClient>,
    local: &Player,
    proposer: P,
    start: &GameStart,
) -> Result<Prepared<P>, AutoPlayError> {
    let client = client.upgrade().ok_or(AutoPlayError::Disconnected)?;
    let kind = GameKind::from_name(&start.game_type)
        .map_err(|_| AutoPlayError::UnsupportedGame(start.game_type.clone()))?;

    let local_slot = if start.starting_player == *local {
        PlayerSlot::One
    } else {
        PlayerSlot::Two
    };

    let (end_tx, end_rx) = oneshot::channel();
    let end_tx = Mutex::new(Some(end_tx));
    client.events().game_end().register(move |end: &GameEnd| {
        if let Some(tx) = end_tx.lock().unwrap_or_else(PoisonError::into_inner).take() {
            let _ = tx.send(end.clone());
        }
    });

    let session = kind.new_session();
    let local_agent = ComputedAgent::new(session.clone(), local_slot, proposer);
    let remote_agent = NetworkAgent::new(session.clone(), local_slot.opponent(), client)?;
    let orchestrator = Orchestrator::new(local_agent, remote_agent)?;
    session.start(PlayerSlot::One).map_err(AgentError::from)?;

    Ok(Prepared {
        game_type: start.game_type.clone(),
        opponent: start.opponent.clone(),
        local_slot,
        orchestrator,
        game_end: end_rx,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(local_slot: PlayerSlot, winner: Option<PlayerSlot>, result: GameResult) -> MatchReport {
        MatchReport {
            game_type: "Reversi".into(),
            opponent: Player::new("Them"),
            local_slot,
            outcome: GameOutcome {
                winner,
                scores: [0, 0],
            },
            server_result: result,
        }
    }

    #[test]
    fn test_is_consistent_matches_server_perspective() {
        assert!(report(PlayerSlot::One, Some(PlayerSlot::One), GameResult::Win).is_consistent());
        assert!(report(PlayerSlot::Two, Some(PlayerSlot::One), GameResult::Loss).is_consistent());
        assert!(report(PlayerSlot::Two, None, GameResult::Draw).is_consistent());
        assert!(!report(PlayerSlot::One, Some(PlayerSlot::Two), GameResult::Win).is_consistent());
    }

    #[test]
    fn test_match_report_serializes() {
        let json = serde_json::to_value(report(PlayerSlot::One, None, GameResult::Draw)).unwrap();
        assert_eq!(json["game_type"], "Reversi");
        assert_eq!(json["local_slot"], "One");
    }
}
