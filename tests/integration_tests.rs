//! End-to-end integration tests — real WebSocket connections against a
//! running transport, covering the full envelope routing protocol.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message};

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Start a test server on a random port.
async fn start_test_server() -> u16 {
    start_test_server_with_limit(None).await
}

async fn start_test_server_with_limit(max_connections: Option<usize>) -> u16 {
    use relay_server::RelayServer;
    use relay_transport::{TransportConfig, TransportServer};

    let config = TransportConfig {
        port: 0, // OS-assigned
        hostname: "127.0.0.1".into(),
        max_connections,
        static_dir: None,
    };

    let transport = TransportServer::start(config, RelayServer::new())
        .await
        .unwrap();
    let port = transport.port();

    // Leak the transport to keep it running for the test duration
    Box::leak(Box::new(transport));

    port
}

/// Connect to the server and read the welcome envelope, returning the
/// stream and the assigned connection id.
async fn connect(port: u16) -> (WsStream, String) {
    let url = format!("ws://127.0.0.1:{port}/websocket");
    let (mut ws, _) = connect_async(&url).await.expect("Failed to connect");

    let welcome = recv_json(&mut ws).await;
    assert_eq!(welcome["type"], "welcome");
    assert_eq!(welcome["message"], "Connected to WebSocket server");
    let id = welcome["connectionId"].as_str().unwrap().to_string();

    (ws, id)
}

/// Read one text frame as JSON, with a timeout.
async fn recv_json(ws: &mut WsStream) -> Value {
    let msg = timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("Timeout waiting for frame")
        .expect("Stream ended")
        .expect("WebSocket error");
    serde_json::from_str(msg.into_text().unwrap().as_str()).unwrap()
}

async fn send_json(ws: &mut WsStream, value: &Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .unwrap();
}

// ─────────────────────────────────────────────────────────────────────────────
// Connection lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn connects_and_receives_welcome() {
    let port = start_test_server().await;
    let (_ws, id) = connect(port).await;
    assert!(!id.is_empty());
}

#[tokio::test]
async fn rejects_unknown_path_before_handshake() {
    let port = start_test_server().await;
    let url = format!("ws://127.0.0.1:{port}/somewhere-else");
    assert!(connect_async(&url).await.is_err());
}

#[tokio::test]
async fn join_notifications_carry_exact_totals() {
    let port = start_test_server().await;

    let (mut ws_a, _id_a) = connect(port).await;
    let (mut ws_b, id_b) = connect(port).await;

    // A learns about B
    let joined = recv_json(&mut ws_a).await;
    assert_eq!(joined["type"], "user_joined");
    assert_eq!(joined["connectionId"], id_b);
    assert_eq!(joined["totalConnections"], 2);

    let (_ws_c, id_c) = connect(port).await;

    // Both A and B learn about C
    for ws in [&mut ws_a, &mut ws_b] {
        let joined = recv_json(ws).await;
        assert_eq!(joined["type"], "user_joined");
        assert_eq!(joined["connectionId"], id_c);
        assert_eq!(joined["totalConnections"], 3);
    }
}

#[tokio::test]
async fn closing_broadcasts_user_left() {
    let port = start_test_server().await;

    let (mut ws_a, _id_a) = connect(port).await;
    let (mut ws_b, id_b) = connect(port).await;
    let _ = recv_json(&mut ws_a).await; // B's join

    ws_b.close(None).await.unwrap();

    let left = recv_json(&mut ws_a).await;
    assert_eq!(left["type"], "user_left");
    assert_eq!(left["connectionId"], id_b);
    assert_eq!(left["totalConnections"], 1);
}

#[tokio::test]
async fn max_connections_rejects_excess_upgrades() {
    let port = start_test_server_with_limit(Some(1)).await;

    let (_ws, _id) = connect(port).await;

    let url = format!("ws://127.0.0.1:{port}/websocket");
    assert!(connect_async(&url).await.is_err());
}

// ─────────────────────────────────────────────────────────────────────────────
// Routing
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ping_pong_roundtrip() {
    let port = start_test_server().await;
    let (mut ws, _id) = connect(port).await;

    send_json(&mut ws, &json!({"type": "ping", "timestamp": "T-0"})).await;

    let pong = recv_json(&mut ws).await;
    assert_eq!(pong["type"], "pong");
    assert_eq!(pong["originalTimestamp"], "T-0");
    assert!(pong["timestamp"].is_string());
}

#[tokio::test]
async fn echo_roundtrip() {
    let port = start_test_server().await;
    let (mut ws, _id) = connect(port).await;

    send_json(&mut ws, &json!({"type": "echo", "message": "abc"})).await;

    let echo = recv_json(&mut ws).await;
    assert_eq!(echo["type"], "echo");
    assert_eq!(echo["originalMessage"], "abc");
}

#[tokio::test]
async fn broadcast_reaches_everyone_but_the_sender() {
    let port = start_test_server().await;

    let (mut ws_a, id_a) = connect(port).await;
    let (mut ws_b, _id_b) = connect(port).await;
    let (mut ws_c, _id_c) = connect(port).await;
    let _ = recv_json(&mut ws_a).await; // B's join
    let _ = recv_json(&mut ws_a).await; // C's join
    let _ = recv_json(&mut ws_b).await; // C's join

    send_json(
        &mut ws_a,
        &json!({"type": "broadcast", "message": "hello everyone"}),
    )
    .await;

    for ws in [&mut ws_b, &mut ws_c] {
        let broadcast = recv_json(ws).await;
        assert_eq!(broadcast["type"], "broadcast");
        assert_eq!(broadcast["from"], id_a);
        assert_eq!(broadcast["message"], "hello everyone");
    }

    // A must not hear its own broadcast: the next frame A receives is the
    // reply to a fresh echo, not the broadcast.
    send_json(&mut ws_a, &json!({"type": "echo", "message": "marker"})).await;
    let next = recv_json(&mut ws_a).await;
    assert_eq!(next["type"], "echo");
    assert_eq!(next["originalMessage"], "marker");
}

#[tokio::test]
async fn private_message_delivers_and_confirms() {
    let port = start_test_server().await;

    let (mut ws_a, id_a) = connect(port).await;
    let (mut ws_b, id_b) = connect(port).await;
    let _ = recv_json(&mut ws_a).await; // B's join

    send_json(
        &mut ws_a,
        &json!({"type": "private", "targetId": id_b, "message": "psst"}),
    )
    .await;

    let private = recv_json(&mut ws_b).await;
    assert_eq!(private["type"], "private");
    assert_eq!(private["from"], id_a);
    assert_eq!(private["message"], "psst");

    let confirmation = recv_json(&mut ws_a).await;
    assert_eq!(confirmation["type"], "private_sent");
    assert_eq!(confirmation["targetId"], id_b);
    assert_eq!(confirmation["message"], "psst");
}

#[tokio::test]
async fn private_to_unknown_target_errors_the_sender() {
    let port = start_test_server().await;
    let (mut ws, _id) = connect(port).await;

    send_json(
        &mut ws,
        &json!({"type": "private", "targetId": "no-such-id", "message": "hello?"}),
    )
    .await;

    let error = recv_json(&mut ws).await;
    assert_eq!(error["type"], "error");
    assert_eq!(error["message"], "Target connection not found: no-such-id");
}

#[tokio::test]
async fn invalid_json_gets_error_and_the_connection_survives() {
    let port = start_test_server().await;
    let (mut ws, _id) = connect(port).await;

    ws.send(Message::Text("not valid json at all {{{".into()))
        .await
        .unwrap();

    let error = recv_json(&mut ws).await;
    assert_eq!(error["type"], "error");
    assert_eq!(error["message"], "Invalid message format");

    // Same connection still routes normally
    send_json(&mut ws, &json!({"type": "ping"})).await;
    let pong = recv_json(&mut ws).await;
    assert_eq!(pong["type"], "pong");
}

#[tokio::test]
async fn unknown_kind_is_acknowledged() {
    let port = start_test_server().await;
    let (mut ws, id) = connect(port).await;

    send_json(&mut ws, &json!({"type": "mystery", "payload": 7})).await;

    let ack = recv_json(&mut ws).await;
    assert_eq!(ack["type"], "message_received");
    assert_eq!(ack["connectionId"], id);
    assert_eq!(ack["receivedMessage"]["type"], "mystery");
    assert_eq!(ack["receivedMessage"]["payload"], 7);
}

// ─────────────────────────────────────────────────────────────────────────────
// Health endpoint
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_endpoint_reports_active_connections() {
    let port = start_test_server().await;

    let (_ws_a, _) = connect(port).await;
    let (_ws_b, _) = connect(port).await;

    let url = format!("http://127.0.0.1:{port}/health");
    let resp = reqwest::get(&url).await.unwrap();
    assert!(resp.status().is_success());

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "UP");
    assert_eq!(body["activeConnections"], 2);
    assert!(body["timestamp"].is_string());
}
