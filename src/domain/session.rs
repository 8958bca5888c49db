//! Per-connection relay state.

use std::fmt;

use tokio::sync::mpsc;

use super::ConnectionId;
use crate::ws::messages::ServerEvent;

/// Sending half of a connection's outbound queue.
///
/// Drained by the connection's writer task, which preserves per-connection
/// ordering and keeps broadcasts from waiting on a slow socket.
pub type Outbox = mpsc::UnboundedSender<ServerEvent>;

/// Protocol state of a single connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Transport open, not yet a channel member.
    Connected,
    /// Member of the channel; commands are accepted.
    Joined,
    /// Terminal: left the channel or disconnected.
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Connected => "connected",
            Self::Joined => "joined",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// One client's session as seen by the [`crate::service::RelayController`].
///
/// Owned by the task serving the connection. The controller moves it through
/// `Connected → Joined → Closed`; the transitions are one-way.
#[derive(Debug)]
pub struct RelaySession {
    id: ConnectionId,
    outbox: Outbox,
    state: ConnectionState,
}

impl RelaySession {
    /// Creates a session in the [`ConnectionState::Connected`] state.
    #[must_use]
    pub fn new(outbox: Outbox) -> Self {
        Self {
            id: ConnectionId::new(),
            outbox,
            state: ConnectionState::Connected,
        }
    }

    /// Returns the connection identifier.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns the current protocol state.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns `true` once the session has reached [`ConnectionState::Closed`].
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state == ConnectionState::Closed
    }

    /// Returns the outbound queue for this connection alone.
    #[must_use]
    pub const fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    pub(crate) fn set_state(&mut self, state: ConnectionState) {
        self.state = state;
    }
}
