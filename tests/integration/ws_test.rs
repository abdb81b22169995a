//! Integration tests for WebSocket presence over a live socket.

mod helpers;

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use http::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use quickchat_core::config::HandshakeMode;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(addr: SocketAddr, query: &str) -> Client {
    let (ws, _) = connect_async(format!("ws://{addr}/ws{query}"))
        .await
        .expect("WebSocket handshake failed");
    ws
}

/// Next JSON event, skipping control frames.
async fn next_event(ws: &mut Client) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for event")
            .expect("stream ended")
            .expect("socket error");
        match frame {
            Message::Text(text) => return serde_json::from_str(text.as_str()).expect("json"),
            Message::Close(_) => panic!("socket closed while waiting for event"),
            _ => continue,
        }
    }
}

/// Asserts that no event arrives within a short window.
async fn expect_silence(ws: &mut Client) {
    let waited = tokio::time::timeout(Duration::from_millis(200), async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => return Some(text.as_str().to_string()),
                Some(Ok(_)) => continue,
                _ => return None,
            }
        }
    })
    .await;
    if let Ok(Some(text)) = waited {
        panic!("unexpected event: {text}");
    }
}

fn online(ids: &[&str]) -> Value {
    json!({ "event": "getOnlineUsers", "data": ids })
}

#[tokio::test]
async fn test_connect_and_disconnect_broadcasts() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;

    let mut u1 = connect(addr, &format!("?token={}", app.token_for("u1"))).await;
    assert_eq!(next_event(&mut u1).await, online(&["u1"]));

    let mut u2 = connect(addr, &format!("?token={}", app.token_for("u2"))).await;
    assert_eq!(next_event(&mut u1).await, online(&["u1", "u2"]));
    assert_eq!(next_event(&mut u2).await, online(&["u1", "u2"]));

    let presence = app
        .request("GET", "/api/presence/online", None, Some(&app.token_for("u2")))
        .await;
    assert_eq!(presence.status, StatusCode::OK);
    assert_eq!(presence.body["onlineUsers"], json!(["u1", "u2"]));

    u1.close(None).await.expect("close");
    assert_eq!(next_event(&mut u2).await, online(&["u2"]));
}

#[tokio::test]
async fn test_anonymous_connection_is_silent() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;

    let mut u1 = connect(addr, &format!("?token={}", app.token_for("u1"))).await;
    assert_eq!(next_event(&mut u1).await, online(&["u1"]));

    let mut anon = connect(addr, "").await;
    expect_silence(&mut u1).await;
    expect_silence(&mut anon).await;

    anon.close(None).await.expect("close");
    expect_silence(&mut u1).await;
}

#[tokio::test]
async fn test_invalid_token_rejects_upgrade() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;

    let err = connect_async(format!("ws://{addr}/ws?token=forged"))
        .await
        .expect_err("upgrade must be refused");
    match err {
        WsError::Http(response) => assert_eq!(response.status(), StatusCode::UNAUTHORIZED),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_claimed_user_id_without_token_rejected_when_verified() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;

    let err = connect_async(format!("ws://{addr}/ws?userId=u1"))
        .await
        .expect_err("upgrade must be refused");
    assert!(matches!(err, WsError::Http(_)));
}

#[tokio::test]
async fn test_claimed_mode_trusts_user_id() {
    let app = helpers::TestApp::with_handshake(HandshakeMode::Claimed);
    let addr = app.spawn().await;

    let mut alice = connect(addr, "?userId=alice").await;
    assert_eq!(next_event(&mut alice).await, online(&["alice"]));
}

#[tokio::test]
async fn test_reconnect_supersedes_old_socket() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;
    let token = app.token_for("u1");

    let mut first = connect(addr, &format!("?token={token}")).await;
    assert_eq!(next_event(&mut first).await, online(&["u1"]));

    let mut second = connect(addr, &format!("?userId=u1&token={token}")).await;
    assert_eq!(next_event(&mut second).await, online(&["u1"]));

    let notice = next_event(&mut first).await;
    assert_eq!(notice["event"], "superseded");

    // The old socket is closed by the server.
    let closed = tokio::time::timeout(Duration::from_secs(2), async {
        while let Some(Ok(frame)) = first.next().await {
            if matches!(frame, Message::Close(_)) {
                break;
            }
        }
    })
    .await;
    assert!(closed.is_ok());

    // The replacement keeps the presence entry.
    expect_silence(&mut second).await;
    assert_eq!(app.state.realtime.gateway.online_count(), 1);
}

#[tokio::test]
async fn test_on_demand_snapshot_and_bad_message() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;

    let mut u1 = connect(addr, &format!("?token={}", app.token_for("u1"))).await;
    assert_eq!(next_event(&mut u1).await, online(&["u1"]));

    u1.send(Message::text(r#"{"type":"get_online_users"}"#.to_string()))
        .await
        .expect("send");
    assert_eq!(next_event(&mut u1).await, online(&["u1"]));

    u1.send(Message::text("nonsense".to_string()))
        .await
        .expect("send");
    let error = next_event(&mut u1).await;
    assert_eq!(error["event"], "error");
    assert_eq!(error["data"]["code"], "INVALID_MESSAGE");
}
