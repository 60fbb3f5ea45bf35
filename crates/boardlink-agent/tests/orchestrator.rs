//! Full games played through the orchestrator with in-process agents.

use std::time::Duration;

use boardlink_agent::{
    AgentError, ComputedAgent, FirstLegalMove, LocalAgent, Orchestrator, RandomLegalMove, UiAgent,
};
use boardlink_game::{Board, Cell, GameKind, PlayerSlot, SessionState, TileState};

#[tokio::test]
async fn test_run_two_computed_agents_finish_tictactoe() {
    let session = GameKind::TicTacToe.new_session();
    let one = ComputedAgent::new(session.clone(), PlayerSlot::One, FirstLegalMove);
    let two = ComputedAgent::new(session.clone(), PlayerSlot::Two, FirstLegalMove);

    let outcome = Orchestrator::new(one, two)
        .unwrap()
        .run(PlayerSlot::One)
        .await
        .unwrap();

    // One: (0,0) (2,0) (1,1) (0,2) completes the anti-diagonal.
    assert_eq!(outcome.winner, Some(PlayerSlot::One));
    assert_eq!(outcome.scores, [1, 0]);
    assert_eq!(session.state(), SessionState::Ended);
    assert_eq!(
        session.board().get(0, 2),
        Some(TileState::Occupied(PlayerSlot::One))
    );
}

#[tokio::test]
async fn test_run_random_agents_finish_reversi() {
    let session = GameKind::Reversi.new_session();
    let one = ComputedAgent::new(session.clone(), PlayerSlot::One, RandomLegalMove::seeded(1));
    let two = ComputedAgent::new(session.clone(), PlayerSlot::Two, RandomLegalMove::seeded(2));

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        Orchestrator::new(one, two).unwrap().spawn(PlayerSlot::One),
    )
    .await
    .unwrap()
    .unwrap()
    .unwrap();

    assert_eq!(session.state(), SessionState::Ended);
    let [a, b] = outcome.scores;
    let expected = match a.cmp(&b) {
        std::cmp::Ordering::Greater => Some(PlayerSlot::One),
        std::cmp::Ordering::Less => Some(PlayerSlot::Two),
        std::cmp::Ordering::Equal => None,
    };
    assert_eq!(outcome.winner, expected);
    assert!(a + b <= 64);
}

#[tokio::test]
async fn test_run_agent_failure_stops_session_without_winner() {
    let session = GameKind::TicTacToe.new_session();
    let one = ComputedAgent::new(session.clone(), PlayerSlot::One, FirstLegalMove);
    let stuck = |_: &Board, _: PlayerSlot| -> Option<Cell> { None };
    let two = ComputedAgent::new(session.clone(), PlayerSlot::Two, stuck);

    let mut winners = Vec::new();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    session.events().ended().register(move |o| {
        let _ = tx.send(o.winner);
    });

    let err = Orchestrator::new(one, two)
        .unwrap()
        .run(PlayerSlot::One)
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::NoLegalMove(PlayerSlot::Two)));
    assert_eq!(session.state(), SessionState::Ended);
    while let Ok(w) = rx.try_recv() {
        winners.push(w);
    }
    assert_eq!(winners, vec![None]);
}

#[tokio::test]
async fn test_run_ui_agent_against_computed() {
    let session = GameKind::TicTacToe.new_session();
    let ui = UiAgent::new(session.clone(), PlayerSlot::One);
    let submitter = ui.submitter();
    let bot = ComputedAgent::new(session.clone(), PlayerSlot::Two, FirstLegalMove);

    let game = Orchestrator::new(ui, bot).unwrap().spawn(PlayerSlot::One);

    // The bot answers (0,0) then (1,0); the UI completes the middle row.
    for (x, y) in [(1, 1), (2, 1), (0, 1)] {
        submitter.submit_move(x, y);
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let outcome = tokio::time::timeout(Duration::from_secs(2), game)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(outcome.winner, Some(PlayerSlot::One));
    assert_eq!(session.state(), SessionState::Ended);
}

#[tokio::test]
async fn test_run_local_agent_reads_moves_from_input() {
    let session = GameKind::TicTacToe.new_session();
    let input: &'static [u8] = b"0 0\n0 1\n0 2\n";
    let local = LocalAgent::new(session.clone(), PlayerSlot::One, input);
    // The bot answers (1,0) then (2,0).
    let bot = ComputedAgent::new(session.clone(), PlayerSlot::Two, FirstLegalMove);

    let outcome = Orchestrator::new(local, bot)
        .unwrap()
        .run(PlayerSlot::One)
        .await
        .unwrap();

    assert_eq!(outcome.winner, Some(PlayerSlot::One));
}

#[tokio::test]
async fn test_run_local_agent_input_closed_fails() {
    let session = GameKind::TicTacToe.new_session();
    let input: &'static [u8] = b"0 0\n";
    let local = LocalAgent::new(session.clone(), PlayerSlot::One, input);
    let bot = ComputedAgent::new(session.clone(), PlayerSlot::Two, FirstLegalMove);

    let err = Orchestrator::new(local, bot)
        .unwrap()
        .run(PlayerSlot::One)
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::InputClosed));
    assert_eq!(session.state(), SessionState::Ended);
}
