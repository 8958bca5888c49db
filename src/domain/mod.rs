//! Domain layer: connection identity, per-connection session state and
//! the channel membership registry.

pub mod connection_id;
pub mod session;
pub mod session_registry;

pub use connection_id::ConnectionId;
pub use session::{ConnectionState, Outbox, RelaySession};
pub use session_registry::{ADMIN_CHANNEL, SessionRegistry};
