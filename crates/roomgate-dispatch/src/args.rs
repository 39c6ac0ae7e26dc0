//! What the engine receives: the descriptor flattened back to text.

use std::fmt;

use roomgate_form::ConnectionDescriptor;
use roomgate_protocol::ProtocolError;
use serde::{Deserialize, Serialize};

/// Default mount point for the in-process engine.
pub const DEFAULT_RENDER_TARGET: &str = "#game";

/// The six connection fields in the form both engine boundaries take.
///
/// Identifiers are canonical hyphenated UUID text, endpoints are URL
/// strings, and the room configuration is JSON text. Serialized with the
/// named parameters of the native `connect_game` call.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchArgs {
    /// Lobby HTTP base URL.
    pub http_baseurl: String,
    /// Engine WebSocket base URL.
    pub ws_baseurl: String,
    /// The user's identifier.
    pub user_uuid: String,
    /// The user's credential.
    pub user_ticket: String,
    /// The room's identifier.
    pub room_uuid: String,
    /// The room configuration as JSON.
    pub room_config_json: String,
}

impl LaunchArgs {
    /// Re-serializes a validated descriptor.
    ///
    /// `room_config_json` is the room configuration alone, not the whole
    /// descriptor.
    pub fn from_descriptor(
        descriptor: &ConnectionDescriptor,
    ) -> Result<Self, ProtocolError> {
        Ok(Self {
            http_baseurl: descriptor.http_baseurl().to_string(),
            ws_baseurl: descriptor.ws_baseurl().to_string(),
            user_uuid: descriptor.user_id().to_string(),
            user_ticket: descriptor.user_ticket().to_string(),
            room_uuid: descriptor.room_id().to_string(),
            room_config_json: descriptor.room_config_json()?,
        })
    }

    /// Command-line flags for the engine's `connect-game` subcommand.
    pub fn process_flags(&self) -> [(&'static str, &str); 6] {
        [
            ("--http-baseurl", self.http_baseurl.as_str()),
            ("--ws-baseurl", self.ws_baseurl.as_str()),
            ("--user-id", self.user_uuid.as_str()),
            ("--user-ticket", self.user_ticket.as_str()),
            ("--room-id", self.room_uuid.as_str()),
            ("--room-config-json", self.room_config_json.as_str()),
        ]
    }

    /// The flags as `--flag=value` tokens, one per field.
    ///
    /// Attaching the value keeps a ticket like `-abc` from being read as
    /// a flag of its own.
    pub fn process_argv(&self) -> Vec<String> {
        self.process_flags()
            .iter()
            .map(|(flag, value)| format!("{flag}={value}"))
            .collect()
    }
}

impl fmt::Debug for LaunchArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchArgs")
            .field("http_baseurl", &self.http_baseurl)
            .field("ws_baseurl", &self.ws_baseurl)
            .field("user_uuid", &self.user_uuid)
            .field("user_ticket", &"<redacted>")
            .field("room_uuid", &self.room_uuid)
            .field("room_config_json", &self.room_config_json)
            .finish()
    }
}

/// Where the in-process engine draws, e.g. `#game`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderTarget(String);

impl RenderTarget {
    /// A target with the given selector.
    pub fn new(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    /// The selector text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RenderTarget {
    fn default() -> Self {
        Self::new(DEFAULT_RENDER_TARGET)
    }
}

impl fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
