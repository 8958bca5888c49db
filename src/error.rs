//! Relay error types.
//!
//! [`RelayError`] covers startup failures (configuration, binding, serving).
//! [`ProtocolError`] and [`ExecError`] never leave the relay: protocol misuse
//! is discarded and execution failures are turned into ordinary output text.

use std::io;

/// Startup and server-level errors.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A configuration value could not be parsed.
    #[error("invalid configuration for {key}: {reason}")]
    InvalidConfig {
        /// Environment key that held the bad value.
        key: &'static str,
        /// Parser diagnostic.
        reason: String,
    },

    /// The listener could not be bound.
    #[error("failed to bind listener: {0}")]
    Bind(#[source] io::Error),

    /// The HTTP server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

/// Inbound frame could not be turned into a [`crate::ws::messages::ClientEvent`].
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Frame is not a JSON event envelope.
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Envelope names an event the relay does not handle.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// Payload is missing a required field, or it has the wrong type.
    #[error("event `{event}` is missing string field `{field}`")]
    MissingField {
        /// Event name.
        event: &'static str,
        /// Field name.
        field: &'static str,
    },
}

/// Failure to run a command through the host interpreter.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The interpreter process could not be spawned.
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        /// Interpreter program that failed to start.
        program: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Waiting on the process or reading its output failed.
    #[error("failed to capture command output: {0}")]
    Capture(#[source] io::Error),
}
