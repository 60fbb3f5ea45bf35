//! Integration tests for `GameClient` against a scripted in-memory server.

use std::time::Duration;

use boardlink_client::{ClientConfig, ClientError, CommandError, GameClient};
use boardlink_protocol::{Challenge, ChallengeId, GameResult, Player};
use boardlink_transport::LineReader;
use tokio::io::{AsyncWriteExt, BufReader, DuplexStream, ReadHalf, WriteHalf};
use tokio::sync::mpsc;

// =========================================================================
// Fake server: the other end of a duplex pipe.
// =========================================================================

struct FakeServer {
    lines: LineReader<BufReader<ReadHalf<DuplexStream>>>,
    out: WriteHalf<DuplexStream>,
}

impl FakeServer {
    async fn expect_line(&mut self) -> String {
        tokio::time::timeout(Duration::from_secs(2), self.lines.next_line())
            .await
            .expect("client should have sent a line")
            .unwrap()
            .expect("client should not have closed")
    }

    async fn send(&mut self, line: &str) {
        self.out.write_all(line.as_bytes()).await.unwrap();
        self.out.write_all(b"\n").await.unwrap();
        self.out.flush().await.unwrap();
    }
}

fn pair_with(config: ClientConfig) -> (GameClient, FakeServer) {
    let (client_end, server_end) = tokio::io::duplex(4096);
    let client = GameClient::from_stream(client_end, config);
    let (read, out) = tokio::io::split(server_end);
    (
        client,
        FakeServer {
            lines: LineReader::new(read),
            out,
        },
    )
}

fn pair() -> (GameClient, FakeServer) {
    pair_with(ClientConfig::default())
}

async fn next<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("listener should fire")
        .expect("listener channel open")
}

// =========================================================================
// Commands
// =========================================================================

#[tokio::test]
async fn test_login_ok_sets_local_player() {
    let (client, mut server) = pair();

    let login = tokio::spawn(async move {
        let result = client.login("Jip").await;
        (client, result)
    });
    assert_eq!(server.expect_line().await, "login Jip");
    server.send("OK").await;

    let (client, result) = login.await.unwrap();
    assert!(result.is_ok());
    assert_eq!(client.local_player(), Some(Player::new("Jip")));
}

#[tokio::test]
async fn test_login_err_carries_server_text_exactly() {
    let (client, mut server) = pair();

    let login = tokio::spawn(async move { client.login("Jip").await });
    server.expect_line().await;
    server.send("ERR Duplicate name exists").await;

    let err = login.await.unwrap().unwrap_err();
    match err {
        ClientError::Login(CommandError::Rejected(text)) => {
            assert_eq!(text, "Duplicate name exists");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_commands_render_expected_lines() {
    let (client, mut server) = pair();

    let calls = tokio::spawn(async move {
        client.subscribe_to_game("Reversi").await.unwrap();
        client.challenge_player("Janneke", "Tic-tac-toe").await.unwrap();
        client.accept_challenge(ChallengeId(3)).await.unwrap();
        client.perform_move(19).await.unwrap();
        client.forfeit().await.unwrap();
    });

    for expected in [
        "subscribe Reversi",
        "challenge \"Janneke\" \"Tic-tac-toe\"",
        "challenge accept 3",
        "move 19",
        "forfeit",
    ] {
        assert_eq!(server.expect_line().await, expected);
        server.send("OK").await;
    }
    calls.await.unwrap();
}

#[tokio::test]
async fn test_move_rejected_maps_to_move_error() {
    let (client, mut server) = pair();

    let mv = tokio::spawn(async move { client.perform_move(64).await });
    server.expect_line().await;
    server.send("ERR Illegal argument(s) for command").await;

    let err = mv.await.unwrap().unwrap_err();
    assert!(matches!(err, ClientError::Move(CommandError::Rejected(_))));
    assert_eq!(
        err.command().and_then(CommandError::server_message),
        Some("Illegal argument(s) for command")
    );
}

#[tokio::test]
async fn test_logout_does_not_wait_for_ack() {
    let (client, mut server) = pair();

    tokio::time::timeout(Duration::from_secs(1), client.logout())
        .await
        .expect("logout should not block")
        .unwrap();
    assert_eq!(server.expect_line().await, "logout");
}

#[tokio::test]
async fn test_second_command_waits_for_first_ack() {
    let (client, mut server) = pair();
    let client = std::sync::Arc::new(client);

    let first = {
        let client = std::sync::Arc::clone(&client);
        tokio::spawn(async move { client.subscribe_to_game("Reversi").await })
    };
    assert_eq!(server.expect_line().await, "subscribe Reversi");

    let second = {
        let client = std::sync::Arc::clone(&client);
        tokio::spawn(async move { client.perform_move(3).await })
    };

    // Nothing else may be written while the first command is unanswered.
    let early = tokio::time::timeout(Duration::from_millis(100), server.lines.next_line()).await;
    assert!(early.is_err());

    server.send("OK").await;
    first.await.unwrap().unwrap();

    assert_eq!(server.expect_line().await, "move 3");
    server.send("OK").await;
    second.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_command_without_answer_times_out() {
    let config = ClientConfig {
        command_timeout: Duration::from_millis(100),
        ..ClientConfig::default()
    };
    let (client, mut server) = pair_with(config);

    let sub = tokio::spawn(async move { client.subscribe_to_game("Reversi").await });
    server.expect_line().await;

    let err = sub.await.unwrap().unwrap_err();
    assert!(matches!(err, ClientError::Subscribe(CommandError::Timeout)));
}

#[tokio::test]
async fn test_connection_lost_fails_outstanding_command() {
    let (client, mut server) = pair();

    let login = tokio::spawn(async move {
        let result = client.login("Jip").await;
        (client, result)
    });
    server.expect_line().await;
    drop(server);

    let (client, result) = login.await.unwrap();
    assert!(matches!(
        result,
        Err(ClientError::Login(CommandError::ConnectionClosed))
    ));

    client.closed().await;
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_command_after_disconnect_is_not_connected() {
    let (client, _server) = pair();

    client.disconnect().await;
    assert!(!client.is_connected());

    let err = client.login("Jip").await.unwrap_err();
    assert!(matches!(err, ClientError::Login(CommandError::NotConnected)));
}

// =========================================================================
// List queries
// =========================================================================

#[tokio::test]
async fn test_get_game_list_absorbs_ok_then_returns_list() {
    let (client, mut server) = pair();

    let query = tokio::spawn(async move { client.get_game_list().await });
    assert_eq!(server.expect_line().await, "get gamelist");
    server.send("OK").await;
    server.send(r#"SVR GAMELIST ["Reversi", "Tic-tac-toe"]"#).await;

    let games = query.await.unwrap().unwrap();
    assert_eq!(games, vec!["Reversi", "Tic-tac-toe"]);
}

#[tokio::test]
async fn test_get_player_list_returns_players() {
    let (client, mut server) = pair();

    let query = tokio::spawn(async move { client.get_player_list().await });
    assert_eq!(server.expect_line().await, "get playerlist");
    server.send("OK").await;
    server.send(r#"SVR PLAYERLIST ["Jip", "Janneke"]"#).await;

    let players = query.await.unwrap().unwrap();
    assert_eq!(players, vec![Player::new("Jip"), Player::new("Janneke")]);
}

#[tokio::test]
async fn test_get_player_list_err_fails_query() {
    let (client, mut server) = pair();

    let query = tokio::spawn(async move { client.get_player_list().await });
    server.expect_line().await;
    server.send("ERR Not logged in").await;

    let err = query.await.unwrap().unwrap_err();
    assert!(matches!(err, ClientError::Query(CommandError::Rejected(_))));
}

// =========================================================================
// Events
// =========================================================================

#[tokio::test]
async fn test_challenge_received_listener_observes_challenge() {
    let (client, mut server) = pair();
    let (tx, mut rx) = mpsc::unbounded_channel();
    client.events().challenge_received().register(move |c: &Challenge| {
        let _ = tx.send(c.clone());
    });

    server
        .send(r#"SVR GAME CHALLENGE {CHALLENGER: "Jip", CHALLENGENUMBER: "1", GAMETYPE: "Reversi"}"#)
        .await;

    let challenge = next(&mut rx).await;
    assert_eq!(challenge.challenger, Player::new("Jip"));
    assert_eq!(challenge.id, ChallengeId(1));
    assert_eq!(challenge.game_type, "Reversi");
    assert_eq!(client.challenges(), vec![challenge]);
}

#[tokio::test]
async fn test_challenge_cancelled_listener_observes_same_challenge() {
    let (client, mut server) = pair();
    let (rx_tx, mut received) = mpsc::unbounded_channel();
    let (cx_tx, mut cancelled) = mpsc::unbounded_channel();
    client.events().challenge_received().register(move |c: &Challenge| {
        let _ = rx_tx.send(c.clone());
    });
    client.events().challenge_cancelled().register(move |c: &Challenge| {
        let _ = cx_tx.send(c.clone());
    });

    server
        .send(r#"SVR GAME CHALLENGE {CHALLENGER: "Jip", CHALLENGENUMBER: "1", GAMETYPE: "Reversi"}"#)
        .await;
    server
        .send(r#"SVR GAME CHALLENGE CANCELLED {CHALLENGENUMBER: "1"}"#)
        .await;

    let original = next(&mut received).await;
    let gone = next(&mut cancelled).await;
    assert_eq!(original, gone);
    assert!(client.challenges().is_empty());
}

#[tokio::test]
async fn test_game_end_listener_observes_loss() {
    let (client, mut server) = pair();
    let (tx, mut rx) = mpsc::unbounded_channel();
    client.events().game_end().register(move |end| {
        let _ = tx.send(end.clone());
    });

    server
        .send(r#"SVR GAME LOSS {PLAYERONESCORE: "15", PLAYERTWOSCORE: "1", COMMENT: "MESSAGE"}"#)
        .await;

    let end = next(&mut rx).await;
    assert_eq!(end.result, GameResult::Loss);
    assert_eq!(end.player_one_score, 15);
    assert_eq!(end.player_two_score, 1);
    assert_eq!(end.comment, "MESSAGE");
}

#[tokio::test]
async fn test_game_start_listener_distinct_and_same_players() {
    let (client, mut server) = pair();
    let (tx, mut rx) = mpsc::unbounded_channel();
    client.events().game_start().register(move |start| {
        let _ = tx.send(start.clone());
    });

    server
        .send(r#"SVR GAME MATCH {PLAYERTOMOVE: "Jip", GAMETYPE: "Tic-tac-toe", OPPONENT: "Janneke"}"#)
        .await;
    let start = next(&mut rx).await;
    assert_eq!(start.starting_player, Player::new("Jip"));
    assert_eq!(start.opponent, Player::new("Janneke"));
    assert_ne!(start.starting_player, start.opponent);

    server
        .send(r#"SVR GAME MATCH {PLAYERTOMOVE: "Janneke", GAMETYPE: "Tic-tac-toe", OPPONENT: "Janneke"}"#)
        .await;
    let start = next(&mut rx).await;
    assert_eq!(start.starting_player, start.opponent);
}

#[tokio::test]
async fn test_move_listener_sees_illegal_move_details() {
    let (client, mut server) = pair();
    let (tx, mut rx) = mpsc::unbounded_channel();
    client.events().moves().register(move |mv| {
        let _ = tx.send(mv.clone());
    });

    server
        .send(r#"SVR GAME MOVE {PLAYER: "Jip", DETAILS: "Illegal move", MOVE: "26"}"#)
        .await;

    let mv = next(&mut rx).await;
    assert_eq!(mv.player, Player::new("Jip"));
    assert_eq!(mv.position, 26);
    assert_eq!(mv.details, "Illegal move");
}

#[tokio::test]
async fn test_game_listeners_cleared_after_game_end() {
    let (client, mut server) = pair();
    let (tx, mut rx) = mpsc::unbounded_channel();
    client.events().game_end().register(move |end| {
        let _ = tx.send(end.result);
    });
    client.events().turn().register(|_| {});
    client.events().challenge_received().register(|_| {});

    server
        .send(r#"SVR GAME DRAW {PLAYERONESCORE: "0", PLAYERTWOSCORE: "0", COMMENT: ""}"#)
        .await;
    assert_eq!(next(&mut rx).await, GameResult::Draw);

    // The listener that fired has been removed along with the others.
    server
        .send(r#"SVR GAME WIN {PLAYERONESCORE: "1", PLAYERTWOSCORE: "0", COMMENT: ""}"#)
        .await;
    let again = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
    assert!(matches!(again, Ok(None) | Err(_)));

    assert!(client.events().turn().is_empty());
    assert_eq!(client.events().challenge_received().len(), 1);
}

#[tokio::test]
async fn test_unrecognized_lines_do_not_break_connection() {
    let (client, mut server) = pair();

    server.send("Strategic Game Server Fixed [Version 1.1.0]").await;
    server.send("SVR GAME NONSENSE {}").await;

    let login = tokio::spawn(async move { client.login("Jip").await });
    server.expect_line().await;
    server.send("OK").await;
    login.await.unwrap().unwrap();
}
