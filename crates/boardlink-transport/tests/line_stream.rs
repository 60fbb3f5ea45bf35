//! Integration tests for the line reader task over real pipes and sockets.

use std::time::Duration;

use boardlink_transport::{ConnectionId, LineWriter, connect_tcp, spawn_line_reader};
use tokio::io::AsyncWriteExt;

#[tokio::test]
async fn test_spawn_line_reader_delivers_in_order_then_closes() {
    let (mut server, client) = tokio::io::duplex(256);
    let (mut lines, handle) = spawn_line_reader(ConnectionId::new(1), client);

    server
        .write_all(b"OK\r\nSVR GAME YOURTURN {TURNMESSAGE: \"\"}\nERR x\n")
        .await
        .unwrap();
    drop(server);

    assert_eq!(lines.recv().await.as_deref(), Some("OK"));
    assert_eq!(
        lines.recv().await.as_deref(),
        Some("SVR GAME YOURTURN {TURNMESSAGE: \"\"}")
    );
    assert_eq!(lines.recv().await.as_deref(), Some("ERR x"));
    assert_eq!(lines.recv().await, None);

    handle.await.unwrap();
}

#[tokio::test]
async fn test_spawn_line_reader_waits_for_consumer() {
    let (mut server, client) = tokio::io::duplex(256);
    let (mut lines, handle) = spawn_line_reader(ConnectionId::new(2), client);

    for i in 0..5 {
        server.write_all(format!("line {i}\n").as_bytes()).await.unwrap();
    }
    drop(server);

    // One line fits in the channel; the task must be parked on the next.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!handle.is_finished());

    for i in 0..5 {
        assert_eq!(lines.recv().await, Some(format!("line {i}")));
    }
    assert_eq!(lines.recv().await, None);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_spawn_line_reader_stops_when_receiver_dropped() {
    let (mut server, client) = tokio::io::duplex(256);
    let (lines, handle) = spawn_line_reader(ConnectionId::new(3), client);
    drop(lines);

    server.write_all(b"OK\nOK\n").await.unwrap();

    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("reader task should exit")
        .unwrap();
}

#[tokio::test]
async fn test_tcp_round_trip_writer_to_reader() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (client, accepted) = tokio::join!(connect_tcp(addr), listener.accept());
    let client = client.unwrap();
    let (server, _) = accepted.unwrap();

    let (_client_read, client_write) = client.into_split();
    let (server_read, _server_write) = server.into_split();

    let mut writer = LineWriter::new(ConnectionId::new(4), client_write);
    let (mut lines, _handle) = spawn_line_reader(ConnectionId::new(5), server_read);

    writer.send_line("subscribe Reversi").await.unwrap();
    writer.send_line("move 19").await.unwrap();

    assert_eq!(lines.recv().await.as_deref(), Some("subscribe Reversi"));
    assert_eq!(lines.recv().await.as_deref(), Some("move 19"));
}
