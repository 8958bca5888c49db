//! WebSocket wire format: `{"event": <name>, "data": <payload>}` envelopes.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Confirmation text sent to a connection after it joins the channel.
pub const JOIN_STATUS: &str = "[*] Successfully connected to host";

/// Single-string payload carried by `comando`, `status` and `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgPayload {
    /// Free text.
    pub msg: String,
}

/// Server → client events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Join confirmation, sent to the joining connection only.
    Status(MsgPayload),
    /// Echoed command line or command output, broadcast to the channel.
    Message(MsgPayload),
}

impl ServerEvent {
    /// Builds a `status` event.
    #[must_use]
    pub fn status(msg: impl Into<String>) -> Self {
        Self::Status(MsgPayload { msg: msg.into() })
    }

    /// Builds a `message` event.
    #[must_use]
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(MsgPayload { msg: msg.into() })
    }

    /// Returns the text carried by the event.
    #[must_use]
    pub fn msg(&self) -> &str {
        match self {
            Self::Status(p) | Self::Message(p) => &p.msg,
        }
    }

    /// Serializes the event as a JSON text frame.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Client → server events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Request to join the channel. Payload is ignored.
    Joined,
    /// Command text to execute, accepted verbatim.
    Comando(String),
    /// Explicit leave; the connection is closed afterwards.
    Left,
}

/// Loosely typed envelope; the payload is inspected per event.
#[derive(Debug, Deserialize)]
struct RawFrame {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl ClientEvent {
    /// Parses a text frame.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] for non-JSON input, unknown event names,
    /// or a `comando` without a string `msg`.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let frame: RawFrame = serde_json::from_str(text)?;
        match frame.event.as_str() {
            "joined" => Ok(Self::Joined),
            "left" => Ok(Self::Left),
            "comando" => frame
                .data
                .get("msg")
                .and_then(serde_json::Value::as_str)
                .map(|msg| Self::Comando(msg.to_string()))
                .ok_or(ProtocolError::MissingField {
                    event: "comando",
                    field: "msg",
                }),
            _ => Err(ProtocolError::UnknownEvent(frame.event)),
        }
    }

    /// Event name as it appears on the wire.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Joined => "joined",
            Self::Comando(_) => "comando",
            Self::Left => "left",
        }
    }
}
