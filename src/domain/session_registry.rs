//! Channel membership with broadcast fan-out.
//!
//! [`SessionRegistry`] tracks which connections are joined to one named
//! channel and delivers [`ServerEvent`]s to all of them. The membership map
//! sits behind a single [`tokio::sync::Mutex`], so `join`, `leave` and
//! `broadcast` are mutually exclusive.

use std::collections::HashMap;

use tokio::sync::Mutex;

use super::ConnectionId;
use super::session::Outbox;
use crate::ws::messages::ServerEvent;

/// Name of the channel the admin console joins.
pub const ADMIN_CHANNEL: &str = "admin";

/// Membership set of a single channel.
///
/// # Concurrency
///
/// - Every operation takes the membership lock for its whole duration.
/// - `broadcast` only queues onto unbounded outboxes while holding the lock,
///   it never awaits a socket.
#[derive(Debug)]
pub struct SessionRegistry {
    channel: String,
    members: Mutex<HashMap<ConnectionId, Outbox>>,
}

impl SessionRegistry {
    /// Creates an empty registry for the named channel.
    #[must_use]
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            members: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the channel name.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Adds a connection to the channel.
    ///
    /// Idempotent: returns `false` and leaves the existing entry untouched
    /// when the connection is already a member.
    pub async fn join(&self, id: ConnectionId, outbox: Outbox) -> bool {
        let mut members = self.members.lock().await;
        if members.contains_key(&id) {
            return false;
        }
        members.insert(id, outbox);
        tracing::debug!(%id, channel = %self.channel, members = members.len(), "joined channel");
        true
    }

    /// Removes a connection from the channel. Returns `false` for non-members.
    pub async fn leave(&self, id: ConnectionId) -> bool {
        let mut members = self.members.lock().await;
        let removed = members.remove(&id).is_some();
        if removed {
            tracing::debug!(%id, channel = %self.channel, members = members.len(), "left channel");
        }
        removed
    }

    /// Queues `event` for every member of the channel.
    ///
    /// Best-effort: a member whose connection is already gone is skipped.
    /// Returns the number of members the event was queued for.
    pub async fn broadcast(&self, event: &ServerEvent) -> usize {
        let members = self.members.lock().await;
        let mut delivered = 0usize;
        for (id, outbox) in members.iter() {
            if outbox.send(event.clone()).is_ok() {
                delivered = delivered.saturating_add(1);
            } else {
                tracing::debug!(%id, channel = %self.channel, "skipping closed member");
            }
        }
        delivered
    }

    /// Returns `true` if the connection is a member.
    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.members.lock().await.contains_key(&id)
    }

    /// Returns the number of members.
    pub async fn len(&self) -> usize {
        self.members.lock().await.len()
    }

    /// Returns `true` if nobody is joined.
    pub async fn is_empty(&self) -> bool {
        self.members.lock().await.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(ADMIN_CHANNEL)
    }
}
