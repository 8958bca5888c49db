//! WebSocket connection loop.
//!
//! Handles the read loop for a single WebSocket connection and a writer
//! task that drains the connection's outbox onto the socket.

use std::collections::VecDeque;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::messages::{ClientEvent, ServerEvent};
use crate::domain::{ConnectionId, RelaySession};
use crate::service::RelayController;

/// What one inbound frame means for the read loop.
enum Inbound {
    Event(ClientEvent),
    Ignored,
    Closed,
}

fn classify(msg: Option<Result<Message, axum::Error>>, conn_id: ConnectionId) -> Inbound {
    match msg {
        Some(Ok(Message::Text(text))) => match ClientEvent::decode(text.as_str()) {
            Ok(event) => {
                tracing::debug!(%conn_id, event = event.name(), "ws event received");
                Inbound::Event(event)
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "discarding ws frame");
                Inbound::Ignored
            }
        },
        Some(Ok(Message::Close(_))) | None => Inbound::Closed,
        Some(Err(e)) => {
            tracing::debug!(%conn_id, error = %e, "ws read error");
            Inbound::Closed
        }
        Some(Ok(_)) => Inbound::Ignored,
    }
}

/// Runs a single relay connection until the client goes away or leaves.
///
/// Inbound events are handled one at a time: while a command runs, further
/// events from this client are queued, but the writer task keeps delivering
/// broadcasts from other members. If the socket closes mid-command the
/// connection leaves the channel at once; the command itself is not
/// cancelled and still reports to the remaining members.
pub async fn run_connection(socket: WebSocket, relay: Arc<RelayController>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (outbox, mut outbox_rx) = mpsc::unbounded_channel::<ServerEvent>();
    let mut session = RelaySession::new(outbox);
    let conn_id = session.id();
    tracing::info!(%conn_id, "ws connection established");

    let writer = tokio::spawn(async move {
        while let Some(event) = outbox_rx.recv().await {
            let json = match event.to_json() {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(%conn_id, error = %e, "failed to serialize event");
                    continue;
                }
            };
            if ws_tx.send(Message::text(json)).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    let mut backlog: VecDeque<ClientEvent> = VecDeque::new();

    loop {
        let event = match backlog.pop_front() {
            Some(event) => event,
            None => match classify(ws_rx.next().await, conn_id) {
                Inbound::Event(event) => event,
                Inbound::Ignored => continue,
                Inbound::Closed => break,
            },
        };

        let ClientEvent::Comando(command) = event else {
            relay.handle_event(&mut session, event).await;
            if session.is_closed() {
                break;
            }
            continue;
        };

        let run = relay.command(&session, &command);
        tokio::pin!(run);
        let mut transport_open = true;
        loop {
            tokio::select! {
                _ = &mut run => break,
                msg = ws_rx.next(), if transport_open => match classify(msg, conn_id) {
                    Inbound::Event(event) => backlog.push_back(event),
                    Inbound::Ignored => {}
                    Inbound::Closed => {
                        transport_open = false;
                        relay.evict(conn_id).await;
                    }
                },
            }
        }
        if !transport_open {
            break;
        }
    }

    relay.disconnect(&mut session).await;
    // Dropping the last outbox sender lets the writer flush and exit.
    drop(session);
    if let Err(e) = writer.await {
        tracing::warn!(%conn_id, error = %e, "ws writer task failed");
    }

    tracing::info!(%conn_id, "ws connection closed");
}
