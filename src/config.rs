//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The server binds all interfaces on
//! `PORT` unless `LISTEN_ADDR` names a full socket address.

use std::net::{Ipv4Addr, SocketAddr};

use crate::error::RelayError;

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 8080;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8080`).
    pub listen_addr: SocketAddr,

    /// Interpreter program commands are handed to.
    pub shell_program: String,

    /// Flag placed between the interpreter and the command text.
    pub shell_flag: String,

    /// Tracing output format.
    pub log_format: LogFormat,
}

impl Default for RelayConfig {
    fn default() -> Self {
        let (shell_program, shell_flag) = default_shell();
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            shell_program: shell_program.to_string(),
            shell_flag: shell_flag.to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidConfig`] if `LISTEN_ADDR` or `PORT` is
    /// set but cannot be parsed.
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidConfig`] if `LISTEN_ADDR` or `PORT` is
    /// present but unparsable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let listen_addr: SocketAddr = match lookup("LISTEN_ADDR") {
            Some(addr) => addr
                .trim()
                .parse::<SocketAddr>()
                .map_err(|e| RelayError::InvalidConfig {
                    key: "LISTEN_ADDR",
                    reason: e.to_string(),
                })?,
            None => {
                let port = match lookup("PORT") {
                    Some(port) => port.trim().parse::<u16>().map_err(|e| {
                        RelayError::InvalidConfig {
                            key: "PORT",
                            reason: e.to_string(),
                        }
                    })?,
                    None => DEFAULT_PORT,
                };
                SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))
            }
        };

        let shell_program = non_empty(lookup("RELAY_SHELL")).unwrap_or(defaults.shell_program);
        let shell_flag = non_empty(lookup("RELAY_SHELL_FLAG")).unwrap_or(defaults.shell_flag);

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            shell_program,
            shell_flag,
            log_format,
        })
    }
}

/// Host default command interpreter and its "run this string" flag.
#[must_use]
pub const fn default_shell() -> (&'static str, &'static str) {
    if cfg!(windows) { ("cmd", "/C") } else { ("sh", "-c") }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
