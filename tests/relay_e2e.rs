//! End-to-end tests for the `admin` relay WebSocket.
//!
//! Each test starts a real Axum server on a random port, connects one or
//! more WebSocket clients and drives the `joined` / `comando` / `left`
//! protocol against the host shell.

#![allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use admin_relay::app_state::AppState;
use admin_relay::config::RelayConfig;
use admin_relay::server::{self, ADMIN_WS_PATH};
use admin_relay::ws::messages::{JOIN_STATUS, ServerEvent};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const TIMEOUT: Duration = Duration::from_secs(5);
const QUIET: Duration = Duration::from_millis(300);

async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::from_config(&RelayConfig::default());
    tokio::spawn(server::serve(listener, state));
    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let url = format!("ws://{addr}{ADMIN_WS_PATH}");
    let (stream, _response) = tokio_tungstenite::connect_async(url)
        .await
        .expect("failed to connect WebSocket");
    stream
}

async fn emit(client: &mut Client, event: &str, data: serde_json::Value) {
    let frame = serde_json::json!({ "event": event, "data": data }).to_string();
    client.send(Message::text(frame)).await.unwrap();
}

async fn recv_event(client: &mut Client) -> ServerEvent {
    loop {
        let msg = timeout(TIMEOUT, client.next())
            .await
            .expect("timed out waiting for WS message")
            .expect("stream ended")
            .expect("WS error");
        match msg {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("not a server event");
            }
            Message::Ping(_) | Message::Pong(_) => {}
            other => panic!("expected text frame, got {other:?}"),
        }
    }
}

async fn join(client: &mut Client) {
    emit(client, "joined", serde_json::json!({})).await;
    assert_eq!(recv_event(client).await, ServerEvent::status(JOIN_STATUS));
}

async fn assert_quiet(client: &mut Client) {
    assert!(
        timeout(QUIET, client.next()).await.is_err(),
        "client received an unexpected frame"
    );
}

async fn health_members(addr: SocketAddr) -> u64 {
    let body: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["members"].as_u64().unwrap()
}

#[tokio::test]
async fn join_then_command_round_trip() {
    let addr = start_server().await;
    let mut a = connect(addr).await;

    join(&mut a).await;
    emit(&mut a, "comando", serde_json::json!({ "msg": "echo ping" })).await;

    assert_eq!(recv_event(&mut a).await, ServerEvent::message("> echo ping"));
    let result = recv_event(&mut a).await;
    assert!(matches!(result, ServerEvent::Message(_)));
    assert_eq!(result.msg().trim_end(), "ping");
}

#[tokio::test]
async fn results_fan_out_to_every_joined_client() {
    let addr = start_server().await;
    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    join(&mut a).await;
    join(&mut b).await;

    emit(&mut b, "comando", serde_json::json!({ "msg": "echo fanout" })).await;

    for client in [&mut a, &mut b] {
        assert_eq!(recv_event(client).await, ServerEvent::message("> echo fanout"));
        assert_eq!(recv_event(client).await.msg().trim_end(), "fanout");
    }
    assert_quiet(&mut a).await;
}

#[tokio::test]
async fn status_is_not_broadcast() {
    let addr = start_server().await;
    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    join(&mut a).await;
    join(&mut b).await;

    assert_quiet(&mut a).await;
}

#[tokio::test]
async fn commands_before_join_are_ignored() {
    let addr = start_server().await;
    let mut member = connect(addr).await;
    let mut stranger = connect(addr).await;
    join(&mut member).await;

    emit(&mut stranger, "comando", serde_json::json!({ "msg": "echo stranger" })).await;
    // Events on one connection are handled in order, so once the status
    // arrives the earlier command has been dealt with.
    join(&mut stranger).await;

    emit(&mut member, "comando", serde_json::json!({ "msg": "echo member" })).await;
    assert_eq!(recv_event(&mut member).await, ServerEvent::message("> echo member"));
    assert_eq!(recv_event(&mut member).await.msg().trim_end(), "member");
}

#[tokio::test]
async fn malformed_frames_do_not_break_the_connection() {
    let addr = start_server().await;
    let mut a = connect(addr).await;
    join(&mut a).await;

    a.send(Message::text("not json")).await.unwrap();
    emit(&mut a, "comando", serde_json::json!({})).await;
    emit(&mut a, "self_destruct", serde_json::json!({})).await;
    assert_quiet(&mut a).await;

    emit(&mut a, "comando", serde_json::json!({ "msg": "echo alive" })).await;
    assert_eq!(recv_event(&mut a).await, ServerEvent::message("> echo alive"));
    assert_eq!(recv_event(&mut a).await.msg().trim_end(), "alive");
}

#[tokio::test]
async fn disconnected_client_is_removed_from_channel() {
    let addr = start_server().await;
    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    join(&mut a).await;
    join(&mut b).await;
    assert_eq!(health_members(addr).await, 2);

    a.close(None).await.unwrap();
    drop(a);

    let left = timeout(TIMEOUT, async {
        while health_members(addr).await != 1 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    assert!(left.is_ok(), "membership never dropped to 1");

    emit(&mut b, "comando", serde_json::json!({ "msg": "echo still-here" })).await;
    assert_eq!(recv_event(&mut b).await, ServerEvent::message("> echo still-here"));
    assert_eq!(recv_event(&mut b).await.msg().trim_end(), "still-here");
}

#[tokio::test]
async fn explicit_leave_closes_the_socket() {
    let addr = start_server().await;
    let mut a = connect(addr).await;
    join(&mut a).await;

    emit(&mut a, "left", serde_json::json!({})).await;

    let closed = timeout(TIMEOUT, async {
        loop {
            match a.next().await {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => break,
                Some(Ok(_)) => {}
            }
        }
    })
    .await;
    assert!(closed.is_ok(), "server did not close the socket");
    assert_eq!(health_members(addr).await, 0);
}

#[cfg(unix)]
#[tokio::test]
async fn non_zero_exit_output_is_delivered() {
    let addr = start_server().await;
    let mut a = connect(addr).await;
    join(&mut a).await;

    emit(&mut a, "comando", serde_json::json!({ "msg": "echo oops; exit 3" })).await;

    assert_eq!(recv_event(&mut a).await.msg(), "> echo oops; exit 3");
    assert_eq!(recv_event(&mut a).await.msg(), "oops\n");
}

#[cfg(unix)]
#[tokio::test]
async fn disconnect_during_long_command_leaves_channel() {
    let addr = start_server().await;
    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    join(&mut a).await;
    join(&mut b).await;

    emit(&mut a, "comando", serde_json::json!({ "msg": "sleep 30" })).await;
    assert_eq!(recv_event(&mut a).await, ServerEvent::message("> sleep 30"));
    assert_eq!(recv_event(&mut b).await, ServerEvent::message("> sleep 30"));

    a.close(None).await.unwrap();
    drop(a);

    let left = timeout(TIMEOUT, async {
        while health_members(addr).await != 1 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    assert!(left.is_ok(), "client stayed joined while its command ran");

    emit(&mut b, "comando", serde_json::json!({ "msg": "echo after" })).await;
    assert_eq!(recv_event(&mut b).await, ServerEvent::message("> echo after"));
    assert_eq!(recv_event(&mut b).await.msg(), "after\n");
}

#[cfg(unix)]
#[tokio::test]
async fn long_command_does_not_stall_other_connections() {
    let addr = start_server().await;
    let mut a = connect(addr).await;
    join(&mut a).await;

    let started = Instant::now();
    emit(&mut a, "comando", serde_json::json!({ "msg": "sleep 3" })).await;
    assert_eq!(recv_event(&mut a).await, ServerEvent::message("> sleep 3"));

    // Connects and talks while A's command is still running.
    let mut b = connect(addr).await;
    emit(&mut b, "comando", serde_json::json!({ "msg": "echo too-early" })).await;
    join(&mut b).await;
    assert_eq!(health_members(addr).await, 2);

    emit(&mut b, "comando", serde_json::json!({ "msg": "echo quick" })).await;
    assert_eq!(recv_event(&mut b).await, ServerEvent::message("> echo quick"));
    assert_eq!(recv_event(&mut b).await.msg(), "quick\n");
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "second connection waited on the first one's command"
    );

    // A is blocked on its own command but still receives broadcasts.
    assert_eq!(recv_event(&mut a).await, ServerEvent::message("> echo quick"));
    assert_eq!(recv_event(&mut a).await.msg(), "quick\n");

    // Then the sleep finishes with empty output, delivered to both.
    assert_eq!(recv_event(&mut a).await, ServerEvent::message(""));
    assert_eq!(recv_event(&mut b).await, ServerEvent::message(""));
    assert!(started.elapsed() >= Duration::from_secs(3));
}
