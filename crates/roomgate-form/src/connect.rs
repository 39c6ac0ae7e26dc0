//! The connection validator and the descriptor it produces.
//!
//! Six raw strings come in from a lobby round trip, from configuration
//! or from a room link's query string. Every one of them is decoded, even
//! after an earlier one failed, so the caller can show the user the
//! complete list of problems in one go instead of one per attempt.

use std::fmt;

use roomgate_protocol::{PlayerId, ProtocolError, RoomConfig, RoomId};
use url::Url;

use crate::decode::{decode_json, decode_url, decode_uuid};
use crate::{AppError, ErrorStore, FieldKey};

/// Default field keys. These double as the query parameter names of a
/// room link.
pub mod keys {
    /// HTTP base URL of the lobby service.
    pub const HTTP_BASEURL: &str = "httpBaseurl";
    /// WebSocket base URL the engine connects to.
    pub const WS_BASEURL: &str = "wsBaseurl";
    /// The user's identifier.
    pub const USER_ID: &str = "userId";
    /// The user's credential.
    pub const USER_TICKET: &str = "userTicket";
    /// The room's identifier.
    pub const ROOM_ID: &str = "roomId";
    /// The room configuration, as JSON text.
    pub const ROOM_CONFIG_JSON: &str = "roomConfigJson";
}

const NOT_A_URL: &str = "Not a valid URL";
const NOT_A_UUID: &str = "Not a valid UUID";
const NOT_A_ROOM_CONFIG: &str = "Not a valid RoomConfig";

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// One raw input value together with the key its errors are filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagged {
    /// Where errors for this value go.
    pub key: FieldKey,
    /// The untrusted text.
    pub value: String,
}

impl Tagged {
    /// A value filed under the named field.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: FieldKey::field(key),
            value: value.into(),
        }
    }
}

/// The six untyped connection fields, each with its own key.
#[derive(Clone)]
pub struct RawConnection {
    /// Lobby HTTP base URL.
    pub http_baseurl: Tagged,
    /// Engine WebSocket base URL.
    pub ws_baseurl: Tagged,
    /// User identifier (UUID text).
    pub user_id: Tagged,
    /// User credential; forwarded, never validated.
    pub user_ticket: Tagged,
    /// Room identifier (UUID text).
    pub room_id: Tagged,
    /// Room configuration (JSON text).
    pub room_config_json: Tagged,
}

impl RawConnection {
    /// Tags the six values with the default [`keys`].
    pub fn new(
        http_baseurl: impl Into<String>,
        ws_baseurl: impl Into<String>,
        user_id: impl Into<String>,
        user_ticket: impl Into<String>,
        room_id: impl Into<String>,
        room_config_json: impl Into<String>,
    ) -> Self {
        Self {
            http_baseurl: Tagged::new(keys::HTTP_BASEURL, http_baseurl),
            ws_baseurl: Tagged::new(keys::WS_BASEURL, ws_baseurl),
            user_id: Tagged::new(keys::USER_ID, user_id),
            user_ticket: Tagged::new(keys::USER_TICKET, user_ticket),
            room_id: Tagged::new(keys::ROOM_ID, room_id),
            room_config_json: Tagged::new(
                keys::ROOM_CONFIG_JSON,
                room_config_json,
            ),
        }
    }

    /// Reads the fields from navigation parameters.
    ///
    /// Parameters that are missing stay empty and therefore fail
    /// validation under their own key. Unknown parameters are ignored.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = Self::new("", "", "", "", "", "");
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                keys::HTTP_BASEURL => &mut raw.http_baseurl,
                keys::WS_BASEURL => &mut raw.ws_baseurl,
                keys::USER_ID => &mut raw.user_id,
                keys::USER_TICKET => &mut raw.user_ticket,
                keys::ROOM_ID => &mut raw.room_id,
                keys::ROOM_CONFIG_JSON => &mut raw.room_config_json,
                _ => continue,
            };
            slot.value = value.into();
        }
        raw
    }

    /// Reads the fields from a room link's query string.
    pub fn from_link(link: &Url) -> Self {
        Self::from_query_pairs(link.query_pairs())
    }
}

impl fmt::Debug for RawConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawConnection")
            .field("http_baseurl", &self.http_baseurl.value)
            .field("ws_baseurl", &self.ws_baseurl.value)
            .field("user_id", &self.user_id.value)
            .field("user_ticket", &"<redacted>")
            .field("room_id", &self.room_id.value)
            .field("room_config_json", &self.room_config_json.value)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// FieldFailures
// ---------------------------------------------------------------------------

/// Every field that failed validation, in the order the fields were
/// checked. At most one error per key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldFailures {
    entries: Vec<(FieldKey, AppError)>,
}

impl FieldFailures {
    /// Records `error` for `key`, replacing an earlier error for the same key.
    pub fn insert(&mut self, key: FieldKey, error: AppError) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = error,
            None => self.entries.push((key, error)),
        }
    }

    /// The error recorded for `key`.
    pub fn get(&self, key: &FieldKey) -> Option<&AppError> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    /// Number of failed fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing failed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The failed keys, in check order.
    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// `(key, error)` pairs, in check order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &AppError)> {
        self.entries.iter().map(|(k, e)| (k, e))
    }

    /// Appends every failure to its key in `store`, as one update.
    pub fn publish(&self, store: &ErrorStore) {
        store.update(|prev| {
            self.entries.iter().fold(prev.clone(), |acc, (key, error)| {
                acc.appended(key.clone(), [error.clone()])
            })
        });
    }
}

impl fmt::Display for FieldFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (_, error)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldFailures {}

impl IntoIterator for FieldFailures {
    type Item = (FieldKey, AppError);
    type IntoIter = std::vec::IntoIter<(FieldKey, AppError)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ---------------------------------------------------------------------------
// ConnectionDescriptor
// ---------------------------------------------------------------------------

/// Everything the engine needs to join a room, fully typed.
///
/// Only [`validate_connection`] can build one. It is deliberately not
/// `Clone`: the dispatch router takes it by value, so each validation
/// hands off at most once.
#[derive(PartialEq)]
pub struct ConnectionDescriptor {
    http_baseurl: Url,
    ws_baseurl: Url,
    user_id: PlayerId,
    user_ticket: String,
    room_id: RoomId,
    room_config: RoomConfig,
}

impl ConnectionDescriptor {
    /// Lobby HTTP base URL.
    pub fn http_baseurl(&self) -> &Url {
        &self.http_baseurl
    }

    /// Engine WebSocket base URL.
    pub fn ws_baseurl(&self) -> &Url {
        &self.ws_baseurl
    }

    /// The user's identifier.
    pub fn user_id(&self) -> PlayerId {
        self.user_id
    }

    /// The user's credential, exactly as it was received.
    pub fn user_ticket(&self) -> &str {
        &self.user_ticket
    }

    /// The room's identifier.
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// The room configuration.
    pub fn room_config(&self) -> &RoomConfig {
        &self.room_config
    }

    /// The room configuration re-serialized as JSON text.
    pub fn room_config_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(&self.room_config).map_err(ProtocolError::Encode)
    }

    /// The descriptor as navigation parameters, keyed by [`keys`].
    pub fn query_pairs(&self) -> Result<Vec<(&'static str, String)>, ProtocolError> {
        Ok(vec![
            (keys::HTTP_BASEURL, self.http_baseurl.to_string()),
            (keys::WS_BASEURL, self.ws_baseurl.to_string()),
            (keys::USER_ID, self.user_id.to_string()),
            (keys::USER_TICKET, self.user_ticket.clone()),
            (keys::ROOM_ID, self.room_id.to_string()),
            (keys::ROOM_CONFIG_JSON, self.room_config_json()?),
        ])
    }

    /// A `…/room/{room_id}?…` link on `origin` that
    /// [`RawConnection::from_link`] reads back.
    pub fn room_link(&self, origin: &Url) -> Result<Url, ProtocolError> {
        let pairs = self.query_pairs()?;
        let mut link = origin.clone();
        link.set_path(&format!("/room/{}", self.room_id));
        link.query_pairs_mut().clear().extend_pairs(pairs);
        Ok(link)
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("http_baseurl", &self.http_baseurl.as_str())
            .field("ws_baseurl", &self.ws_baseurl.as_str())
            .field("user_id", &self.user_id)
            .field("user_ticket", &"<redacted>")
            .field("room_id", &self.room_id)
            .field("room_config", &self.room_config)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validates all six fields and assembles a [`ConnectionDescriptor`].
///
/// Every decoder runs; nothing short-circuits. The credential is passed
/// through as-is.
///
/// # Errors
/// Returns every failed field, each as an [`AppError::Parse`] naming the
/// field key and one of `Not a valid URL`, `Not a valid UUID`, or
/// `Not a valid RoomConfig`.
pub fn validate_connection(
    raw: &RawConnection,
) -> Result<ConnectionDescriptor, FieldFailures> {
    let mut failures = FieldFailures::default();

    let http_baseurl =
        check(&raw.http_baseurl, decode_url, NOT_A_URL, &mut failures);
    let ws_baseurl = check(&raw.ws_baseurl, decode_url, NOT_A_URL, &mut failures);
    let user_id = check(&raw.user_id, decode_uuid, NOT_A_UUID, &mut failures);
    let room_id = check(&raw.room_id, decode_uuid, NOT_A_UUID, &mut failures);
    let room_config = check(
        &raw.room_config_json,
        decode_json::<RoomConfig>,
        NOT_A_ROOM_CONFIG,
        &mut failures,
    );

    match (http_baseurl, ws_baseurl, user_id, room_id, room_config) {
        (
            Some(http_baseurl),
            Some(ws_baseurl),
            Some(user_id),
            Some(room_id),
            Some(room_config),
        ) if failures.is_empty() => Ok(ConnectionDescriptor {
            http_baseurl,
            ws_baseurl,
            user_id: PlayerId(user_id),
            user_ticket: raw.user_ticket.value.clone(),
            room_id: RoomId(room_id),
            room_config,
        }),
        _ => {
            let rejected: Vec<String> =
                failures.keys().map(ToString::to_string).collect();
            tracing::debug!(
                failed = failures.len(),
                keys = %rejected.join(","),
                "connection fields rejected"
            );
            Err(failures)
        }
    }
}

/// Runs one decoder and files a parse error under the field's key on
/// failure.
fn check<T>(
    field: &Tagged,
    decode: impl FnOnce(&str) -> Option<T>,
    reason: &str,
    failures: &mut FieldFailures,
) -> Option<T> {
    let decoded = decode(&field.value);
    if decoded.is_none() {
        failures.insert(
            field.key.clone(),
            AppError::parse(field.key.to_string(), reason),
        );
    }
    decoded
}
