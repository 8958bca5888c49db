//! Relay controller: the per-connection protocol state machine.

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionState, RelaySession, SessionRegistry};
use crate::executor::CommandExecutor;
use crate::ws::messages::{ClientEvent, JOIN_STATUS, ServerEvent};

/// Orchestrates the relay protocol.
///
/// Stateless coordinator: owns references to the [`SessionRegistry`] for
/// membership and a [`CommandExecutor`] for running commands. Per-connection
/// state lives in the caller's [`RelaySession`].
#[derive(Debug, Clone)]
pub struct RelayController {
    registry: Arc<SessionRegistry>,
    executor: Arc<dyn CommandExecutor>,
}

impl RelayController {
    /// Creates a new `RelayController`.
    #[must_use]
    pub fn new(registry: Arc<SessionRegistry>, executor: Arc<dyn CommandExecutor>) -> Self {
        Self { registry, executor }
    }

    /// Returns a reference to the inner [`SessionRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Dispatches one decoded client event.
    pub async fn handle_event(&self, session: &mut RelaySession, event: ClientEvent) {
        match event {
            ClientEvent::Joined => self.join(session).await,
            ClientEvent::Comando(command) => {
                self.command(session, &command).await;
            }
            ClientEvent::Left => self.leave(session).await,
        }
    }

    /// Joins the session to the channel and confirms to that connection alone.
    ///
    /// Every call produces one status event, even when the connection was
    /// already a member. Closed sessions are ignored.
    pub async fn join(&self, session: &mut RelaySession) {
        if session.is_closed() {
            tracing::debug!(conn_id = %session.id(), "join on closed session ignored");
            return;
        }

        let added = self
            .registry
            .join(session.id(), session.outbox().clone())
            .await;
        session.set_state(ConnectionState::Joined);
        tracing::info!(
            conn_id = %session.id(),
            channel = self.registry.channel(),
            rejoin = !added,
            "client joined"
        );

        if session.outbox().send(ServerEvent::status(JOIN_STATUS)).is_err() {
            tracing::debug!(conn_id = %session.id(), "status not delivered, connection gone");
        }
    }

    /// Echoes `command` to the channel, runs it, and broadcasts the outcome.
    ///
    /// Blocks until the command finishes. Commands from sessions that have not
    /// joined are discarded. Returns the total number of deliveries (echo plus
    /// result), which is zero for a discarded command.
    pub async fn command(&self, session: &RelaySession, command: &str) -> usize {
        if session.state() != ConnectionState::Joined {
            tracing::debug!(
                conn_id = %session.id(),
                state = %session.state(),
                "command before join discarded"
            );
            return 0;
        }

        tracing::info!(conn_id = %session.id(), command, "executing command");

        let echoed = self
            .registry
            .broadcast(&ServerEvent::message(format!("> {command}")))
            .await;

        let outcome = self.executor.execute(command).await;
        let result = self
            .registry
            .broadcast(&ServerEvent::message(outcome.into_message()))
            .await;

        let delivered = echoed.saturating_add(result);
        tracing::debug!(conn_id = %session.id(), delivered, "command relayed");
        delivered
    }

    /// Removes the session from the channel and marks it closed.
    pub async fn leave(&self, session: &mut RelaySession) {
        if self.registry.leave(session.id()).await {
            tracing::info!(
                conn_id = %session.id(),
                channel = self.registry.channel(),
                "client left"
            );
        }
        session.set_state(ConnectionState::Closed);
    }

    /// Drops a connection from the channel without touching its session.
    ///
    /// Used when the transport closes while that connection's command is
    /// still running: membership ends immediately, the command is left to
    /// finish on its own. Returns `false` if it was not a member.
    pub async fn evict(&self, id: ConnectionId) -> bool {
        let removed = self.registry.leave(id).await;
        if removed {
            tracing::info!(
                conn_id = %id,
                channel = self.registry.channel(),
                "client disconnected while its command was running"
            );
        }
        removed
    }

    /// Transport closed; same as [`Self::leave`].
    pub async fn disconnect(&self, session: &mut RelaySession) {
        self.leave(session).await;
    }
}
