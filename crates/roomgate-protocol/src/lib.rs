//! Wire shapes for Roomgate.
//!
//! This crate defines the data that crosses the boundary between the
//! launcher and the lobby service, and between the launcher and the
//! game engine:
//!
//! - **Types** ([`PlayerId`], [`RoomId`], [`RoomConfig`], [`User`],
//!   [`ServerErrorEnvelope`]) — the structures that travel as JSON.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those structures
//!   are converted to/from bytes, and how a lobby response body is
//!   classified ([`ResponseBody`]).
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding
//!   or decoding.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about forms, validation, or engines.
//! It only knows what the bytes look like.
//!
//! ```text
//! Lobby (HTTP bytes) → Protocol (ResponseBody) → Form (AppError / descriptor)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec, ResponseBody};
pub use error::ProtocolError;
pub use types::{
    PlayerId, Register, RoomConfig, RoomId, ServerErrorEnvelope, User,
};
