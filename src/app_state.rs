//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::domain::{ADMIN_CHANNEL, SessionRegistry};
use crate::executor::{CommandExecutor, ShellExecutor};
use crate::service::RelayController;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Relay controller for the `admin` channel.
    pub relay: Arc<RelayController>,
}

impl AppState {
    /// Wires a fresh `admin` registry to the given executor.
    #[must_use]
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        let registry = Arc::new(SessionRegistry::new(ADMIN_CHANNEL));
        Self {
            relay: Arc::new(RelayController::new(registry, executor)),
        }
    }

    /// Builds state with a [`ShellExecutor`] for the configured interpreter.
    #[must_use]
    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(Arc::new(ShellExecutor::from_config(config)))
    }
}
