//! Response body classification shared by every lobby endpoint.

use roomgate_form::AppError;
use roomgate_protocol::{Codec, ResponseBody};
use serde::de::DeserializeOwned;

/// Turns a raw response body into the expected shape or an [`AppError`].
///
/// - not JSON → [`AppError::Fetch`]
/// - matches the error envelope → [`AppError::Server`]
/// - JSON of the wrong shape → [`AppError::Parse`] naming `shape`
///
/// # Errors
/// See above. The HTTP status is not consulted; the service signals
/// refusal through the body.
pub fn classify_response<T: DeserializeOwned>(
    codec: &impl Codec,
    body: &[u8],
    shape: &str,
) -> Result<T, AppError> {
    match codec.classify::<T>(body, shape) {
        Ok(ResponseBody::Decoded(value)) => Ok(value),
        Ok(ResponseBody::Refused(envelope)) => Err(envelope.into()),
        Ok(ResponseBody::Malformed { shape, reason }) => {
            Err(AppError::parse(shape, reason))
        }
        Err(e) => Err(AppError::fetch(e)),
    }
}

/// Like [`classify_response`] for endpoints whose success body carries
/// nothing of interest: any JSON that is not the envelope is success.
///
/// # Errors
/// [`AppError::Server`] on the envelope, [`AppError::Fetch`] on non-JSON.
pub fn classify_refusal(codec: &impl Codec, body: &[u8]) -> Result<(), AppError> {
    classify_response::<serde_json::Value>(codec, body, "any").map(|_| ())
}

#[cfg(test)]
mod tests {
    use roomgate_protocol::{JsonCodec, RoomConfig, RoomId};

    use super::*;

    #[test]
    fn test_envelope_is_server_error() {
        let err = classify_response::<RoomConfig>(
            &JsonCodec,
            br#"{"error": {}, "message": "room full"}"#,
            "RoomConfig",
        )
        .unwrap_err();
        assert_eq!(err.message(), "Request refused: room full");
    }

    #[test]
    fn test_wrong_shape_is_parse_error_naming_shape() {
        let err = classify_response::<RoomConfig>(
            &JsonCodec,
            br#"{"players": 3}"#,
            "RoomConfig",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::Parse { ref field, .. } if field == "RoomConfig"
        ));
    }

    #[test]
    fn test_non_json_is_fetch_error() {
        let err =
            classify_response::<RoomConfig>(&JsonCodec, b"<html>", "RoomConfig")
                .unwrap_err();
        assert!(matches!(err, AppError::Fetch { .. }));
    }

    #[test]
    fn test_room_id_decodes_from_json_string() {
        let room: RoomId = classify_response(
            &JsonCodec,
            br#""a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8""#,
            "RoomId",
        )
        .unwrap();
        assert_eq!(room.to_string(), "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8");
    }

    #[test]
    fn test_refusal_ignores_other_bodies() {
        assert_eq!(classify_refusal(&JsonCodec, b"null"), Ok(()));
        assert_eq!(classify_refusal(&JsonCodec, br#"{"joined": true}"#), Ok(()));
        assert!(matches!(
            classify_refusal(&JsonCodec, br#"{"error": 1, "message": "no"}"#),
            Err(AppError::Server { .. })
        ));
    }
}
