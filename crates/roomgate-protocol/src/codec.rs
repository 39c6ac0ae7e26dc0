//! Codec trait, the JSON implementation, and lobby response classification.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! Everything above this layer asks a [`Codec`] for values and never
//! touches `serde_json` directly, so a different wire format only means a
//! different codec.
//!
//! The lobby service answers every request with one of two JSON shapes:
//! the domain value that was asked for, or a [`ServerErrorEnvelope`].
//! [`Codec::classify`] encodes the rule for telling them apart.

use serde::{Serialize, de::DeserializeOwned};

use crate::{ProtocolError, ServerErrorEnvelope};

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// ## Trait bounds explained
///
/// - `Send + Sync` → the codec can be shared by async tasks that Tokio
///   may run on any worker thread.
/// - `'static` → the codec owns everything it needs.
///
/// `DeserializeOwned` (vs plain `Deserialize`) means the result doesn't
/// borrow from the input bytes, so the response buffer can be dropped
/// right after decoding.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;

    /// Classifies a lobby response body.
    ///
    /// The order matters and is part of the contract:
    ///
    /// 1. the body must be JSON at all, otherwise `Err(Decode)`;
    /// 2. if it matches the error envelope it is [`ResponseBody::Refused`],
    ///    even when it would also decode as `T`;
    /// 3. otherwise it is decoded as `T`, and a shape mismatch becomes
    ///    [`ResponseBody::Malformed`] naming `shape` and the reason.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` when the body is not JSON.
    fn classify<T: DeserializeOwned>(
        &self,
        data: &[u8],
        shape: &str,
    ) -> Result<ResponseBody<T>, ProtocolError> {
        let value: serde_json::Value = self.decode(data)?;

        if let Ok(envelope) =
            serde_json::from_value::<ServerErrorEnvelope>(value.clone())
        {
            return Ok(ResponseBody::Refused(envelope));
        }

        Ok(match serde_json::from_value::<T>(value) {
            Ok(decoded) => ResponseBody::Decoded(decoded),
            Err(e) => ResponseBody::Malformed {
                shape: shape.to_string(),
                reason: e.to_string(),
            },
        })
    }
}

/// The three ways a JSON lobby response can turn out.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody<T> {
    /// The server explicitly refused the request.
    Refused(ServerErrorEnvelope),

    /// The body decoded as the expected domain value.
    Decoded(T),

    /// The body is JSON, but neither an envelope nor a `shape`.
    Malformed {
        /// Name of the shape we tried to decode, e.g. `"RoomConfig"`.
        shape: String,
        /// The decoder's explanation.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use roomgate_protocol::{Codec, JsonCodec, ResponseBody, RoomConfig};
///
/// let codec = JsonCodec;
///
/// let body = br#"{"players": ["a", "b"]}"#;
/// let parsed = codec.classify::<RoomConfig>(body, "RoomConfig").unwrap();
/// assert!(matches!(parsed, ResponseBody::Decoded(_)));
///
/// let body = br#"{"error": {}, "message": "room full"}"#;
/// let parsed = codec.classify::<RoomConfig>(body, "RoomConfig").unwrap();
/// assert!(matches!(parsed, ResponseBody::Refused(_)));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{RoomConfig, RoomId};

    #[test]
    fn test_classify_envelope_wins() {
        let body = br#"{"error": {}, "message": "room full"}"#;
        let parsed: ResponseBody<RoomConfig> =
            JsonCodec.classify(body, "RoomConfig").unwrap();
        match parsed {
            ResponseBody::Refused(env) => assert_eq!(env.message, "room full"),
            other => panic!("expected Refused, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_envelope_wins_over_lenient_shape() {
        // A `serde_json::Value` target accepts anything, but the envelope
        // is still checked first.
        let body = br#"{"error": null, "message": "no"}"#;
        let parsed: ResponseBody<serde_json::Value> =
            JsonCodec.classify(body, "Any").unwrap();
        assert!(matches!(parsed, ResponseBody::Refused(_)));
    }

    #[test]
    fn test_classify_decodes_room_id_string() {
        let body = br#""67e55044-10b1-426f-9247-bb680e5fe0c8""#;
        let parsed: ResponseBody<RoomId> =
            JsonCodec.classify(body, "RoomId").unwrap();
        assert!(matches!(parsed, ResponseBody::Decoded(_)));
    }

    #[test]
    fn test_classify_malformed_names_shape() {
        let body = br#"{"players": "everyone"}"#;
        let parsed: ResponseBody<RoomConfig> =
            JsonCodec.classify(body, "RoomConfig").unwrap();
        match parsed {
            ResponseBody::Malformed { shape, reason } => {
                assert_eq!(shape, "RoomConfig");
                assert!(!reason.is_empty());
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_non_json_is_decode_error() {
        let result: Result<ResponseBody<RoomConfig>, _> =
            JsonCodec.classify(b"<html>502</html>", "RoomConfig");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    proptest! {
        #[test]
        fn prop_room_config_round_trips(
            players in prop::collection::vec(".*", 0..8)
        ) {
            let config = RoomConfig { players };
            let bytes = JsonCodec.encode(&config).unwrap();
            let decoded: RoomConfig = JsonCodec.decode(&bytes).unwrap();
            prop_assert_eq!(decoded, config);
        }
    }
}
