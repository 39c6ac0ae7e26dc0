//! Error types for the protocol layer.
//!
//! Each crate in Roomgate defines its own error enum. A `ProtocolError`
//! always means the bytes themselves were the problem, never the network
//! or the engine.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: the bytes are not JSON at all.
    ///
    /// A body that is valid JSON but has the wrong shape is NOT reported
    /// here; see [`ResponseBody::Malformed`](crate::ResponseBody::Malformed).
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
