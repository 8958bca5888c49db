//! WebSocket layer: connection handling and the event wire format.
//!
//! The endpoint at `/ws/admin` carries the `admin` channel: clients send
//! `joined`, `comando` and `left`; the server answers with `status` and
//! `message` events.

pub mod connection;
pub mod handler;
pub mod messages;
