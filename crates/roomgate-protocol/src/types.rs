//! Core types that travel between the launcher, the lobby service, and
//! the game engine.
//!
//! Identifiers are held as 16 raw bytes (a [`Uuid`]) in memory and are
//! only ever turned into text at a boundary: a JSON body, a URL path
//! segment, or an engine argument.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// This is a "newtype wrapper" around a [`Uuid`]. You can't accidentally
/// pass a `RoomId` where a `PlayerId` is expected, even though both are
/// 128-bit values underneath.
///
/// `#[serde(transparent)]` makes the JSON form just the hyphenated UUID
/// string, e.g. `"67e55044-10b1-426f-9247-bb680e5fe0c8"`, which is what
/// the lobby service and the engine expect.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Builds an identifier from its 16-byte binary form.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Returns the 16-byte binary form.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

/// Display prints the canonical hyphenated lowercase form. This is the
/// exact text every external boundary receives.
impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// A unique identifier for a room (one matchmaking session).
///
/// Same newtype pattern as [`PlayerId`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub Uuid);

impl RoomId {
    /// Builds an identifier from its 16-byte binary form.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Returns the 16-byte binary form.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// The finalized configuration of a room, returned by the readiness poll
/// once enough players have joined.
///
/// Participants are opaque strings at this layer; only the engine gives
/// them meaning. There is deliberately no `#[serde(deny_unknown_fields)]`:
/// extra fields the server adds are ignored, not rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Ordered list of participant identifiers.
    pub players: Vec<String>,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// A registered user as returned by the lobby service.
///
/// `id` stays a plain string here: the lobby service is untrusted, so the
/// id is only turned into a [`PlayerId`] by the connection validator.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The user's identifier, as text.
    pub id: String,
    /// The display name chosen at registration.
    pub username: String,
    /// The credential issued by the lobby service.
    pub ticket: String,
}

impl User {
    /// Name to show for an optional signed-in user.
    pub fn display_name(user: Option<&User>) -> &str {
        user.map_or("Unknown", |u| u.username.as_str())
    }
}

/// The ticket is a credential, so it never shows up in `{:?}` output
/// (and therefore never in logs).
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("ticket", &"<redacted>")
            .finish()
    }
}

/// A registration request: just a (trimmed) username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    /// The requested username, already trimmed.
    pub username: String,
}

// ---------------------------------------------------------------------------
// ServerErrorEnvelope
// ---------------------------------------------------------------------------

/// The generic error envelope the lobby service sends when it refuses a
/// request:
///
/// ```json
/// { "error": { "RoomFull": [] }, "message": "Room is already full of players" }
/// ```
///
/// `error` is whatever structured value the server chose to send; we keep
/// it as raw JSON. `#[serde(default)]` means a missing `error` key becomes
/// `null` instead of a decode failure. Only `message` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerErrorEnvelope {
    /// The server's structured error value.
    #[serde(default)]
    pub error: serde_json::Value,
    /// Human-readable reason.
    pub message: String,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The lobby service and the engine both read these shapes as JSON,
    //! so the tests pin the exact JSON forms.

    use super::*;

    const SAMPLE: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

    #[test]
    fn test_player_id_serializes_as_hyphenated_string() {
        let id = PlayerId(Uuid::parse_str(SAMPLE).unwrap());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{SAMPLE}\""));
    }

    #[test]
    fn test_player_id_display_is_canonical() {
        let id = PlayerId(Uuid::parse_str(SAMPLE).unwrap());
        assert_eq!(id.to_string(), SAMPLE);
    }

    #[test]
    fn test_room_id_display_lowercases() {
        let id = RoomId(Uuid::parse_str(&SAMPLE.to_uppercase()).unwrap());
        assert_eq!(id.to_string(), SAMPLE);
    }

    #[test]
    fn test_room_id_bytes_round_trip() {
        let bytes = [7u8; 16];
        let id = RoomId::from_bytes(bytes);
        assert_eq!(id.as_bytes(), &bytes);
    }

    #[test]
    fn test_room_config_ignores_unknown_fields() {
        let json = r#"{"players": ["a", "b"], "map": "harbour"}"#;
        let config: RoomConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.players, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_room_config_requires_players() {
        let result: Result<RoomConfig, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn test_room_config_rejects_non_string_players() {
        let result: Result<RoomConfig, _> =
            serde_json::from_str(r#"{"players": [1, 2]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_user_debug_redacts_ticket() {
        let user = User {
            id: SAMPLE.into(),
            username: "ada".into(),
            ticket: "s3cret".into(),
        };
        let rendered = format!("{user:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("ada"));
    }

    #[test]
    fn test_display_name_falls_back_to_unknown() {
        assert_eq!(User::display_name(None), "Unknown");
        let user = User {
            id: SAMPLE.into(),
            username: "ada".into(),
            ticket: String::new(),
        };
        assert_eq!(User::display_name(Some(&user)), "ada");
    }

    #[test]
    fn test_envelope_error_defaults_to_null() {
        let env: ServerErrorEnvelope =
            serde_json::from_str(r#"{"message": "nope"}"#).unwrap();
        assert!(env.error.is_null());
        assert_eq!(env.message, "nope");
    }

    #[test]
    fn test_envelope_requires_string_message() {
        let result: Result<ServerErrorEnvelope, _> =
            serde_json::from_str(r#"{"error": {}, "message": 3}"#);
        assert!(result.is_err());
    }
}
