//! Scalar decoders: one raw string in, a typed value or `None` out.
//!
//! None of these functions return an error or panic. A failure to parse
//! is simply absence; the caller decides which field it belonged to and
//! what the user should be told.

use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

/// Length of the hyphenated textual UUID form (`8-4-4-4-12`).
const HYPHENATED_LEN: usize = 36;

/// Decodes an absolute URL.
///
/// Relative references (`"/api"`, `"not a url"`) and the empty string
/// are rejected because there is no base to resolve them against.
pub fn decode_url(raw: &str) -> Option<Url> {
    Url::parse(raw).ok()
}

/// Decodes a UUID in its hyphenated textual form into 16 bytes.
///
/// Only the `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` form is accepted
/// (either letter case). The simple, braced, and URN forms that
/// [`Uuid::parse_str`] would also take are rejected, so that every
/// accepted string is exactly what the canonical encoder produces, up to
/// case.
pub fn decode_uuid(raw: &str) -> Option<Uuid> {
    if raw.len() != HYPHENATED_LEN {
        return None;
    }
    Uuid::parse_str(raw).ok()
}

/// Decodes JSON text into a target shape `T`.
///
/// Two steps, both of which map failure to `None`:
///
/// 1. generic JSON parse (syntax errors),
/// 2. field-by-field decode into `T` (shape errors: missing fields,
///    wrong types).
pub fn decode_json<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    serde_json::from_value(value).ok()
}

#[cfg(test)]
mod tests {
    use roomgate_protocol::RoomConfig;

    use super::*;

    #[test]
    fn test_decode_url_accepts_absolute() {
        let url = decode_url("http://localhost:8080").unwrap();
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn test_decode_url_accepts_any_scheme() {
        assert!(decode_url("ws://localhost:8080/socket").is_some());
        assert!(decode_url("tauri://localhost").is_some());
    }

    #[test]
    fn test_decode_url_rejects_relative_and_empty() {
        assert!(decode_url("not a url").is_none());
        assert!(decode_url("/api/game").is_none());
        assert!(decode_url("").is_none());
    }

    #[test]
    fn test_decode_uuid_accepts_hyphenated_any_case() {
        let lower = decode_uuid("67e55044-10b1-426f-9247-bb680e5fe0c8");
        let upper = decode_uuid("67E55044-10B1-426F-9247-BB680E5FE0C8");
        assert!(lower.is_some());
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_decode_uuid_rejects_other_forms() {
        assert!(decode_uuid("67e5504410b1426f9247bb680e5fe0c8").is_none());
        assert!(decode_uuid("{67e55044-10b1-426f-9247-bb680e5fe0c8}").is_none());
        assert!(
            decode_uuid("urn:uuid:67e55044-10b1-426f-9247-bb680e5fe0c8")
                .is_none()
        );
        assert!(decode_uuid("").is_none());
        assert!(decode_uuid("67e55044-10b1-426f-9247-bb680e5fe0cz").is_none());
    }

    #[test]
    fn test_decode_json_syntax_error_is_none() {
        assert!(decode_json::<RoomConfig>("{players:").is_none());
        assert!(decode_json::<RoomConfig>("").is_none());
    }

    #[test]
    fn test_decode_json_shape_mismatch_is_none() {
        assert!(decode_json::<RoomConfig>("{}").is_none());
        assert!(decode_json::<RoomConfig>(r#"{"players": "a"}"#).is_none());
        assert!(decode_json::<RoomConfig>(r#"{"players": [1]}"#).is_none());
        assert!(decode_json::<RoomConfig>("[]").is_none());
    }

    #[test]
    fn test_decode_json_ignores_extra_fields() {
        let config: RoomConfig =
            decode_json(r#"{"players": ["a"], "laps": 3}"#).unwrap();
        assert_eq!(config.players, vec!["a".to_string()]);
    }
}
