//! Service layer: protocol orchestration.
//!
//! [`RelayController`] drives each connection through the relay protocol,
//! delegating membership to the [`super::domain::SessionRegistry`] and
//! command runs to a [`super::executor::CommandExecutor`].

pub mod relay_controller;

pub use relay_controller::RelayController;
