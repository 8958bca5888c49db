//! # admin-relay
//!
//! Intentionally vulnerable web application used as a security-testing
//! target. Besides a handful of static pages it exposes an admin console
//! whose WebSocket relays arbitrary text commands to the host shell and
//! broadcasts the output to every joined client.
//!
//! There is no authentication and no command sanitization. Do not expose
//! this service anywhere you would not run `sh -c` for strangers.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── Page / Health Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── RelayController (service/)
//!     │
//!     ├── SessionRegistry (domain/)
//!     └── ShellExecutor (executor)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod executor;
pub mod server;
pub mod service;
pub mod ws;
