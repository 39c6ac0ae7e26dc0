//! Lobby service access for Roomgate.
//!
//! The lobby is the HTTP service that registers users, creates and joins
//! rooms, and reports when a room is ready to start. [`LobbyApi`] is the
//! seam the launcher talks to; [`LobbyClient`] is the `reqwest`-backed
//! implementation.
//!
//! Every response goes through [`classify_response`], which applies the
//! one decoding rule the service shares across endpoints: an error
//! envelope always wins, then the expected shape is decoded.

#![allow(async_fn_in_trait)]

mod classify;
mod client;

pub use classify::{classify_refusal, classify_response};
pub use client::LobbyClient;

use roomgate_form::AppError;
use roomgate_protocol::{Register, RoomConfig, RoomId, User};

/// Operations the lobby service offers.
pub trait LobbyApi: Send + Sync {
    /// Registers a new user under `register.username`.
    async fn register(&self, register: &Register) -> Result<User, AppError>;

    /// Opens a room for `player_count` players and returns its id.
    async fn create_room(
        &self,
        user: &User,
        player_count: u32,
    ) -> Result<RoomId, AppError>;

    /// Joins an existing room.
    ///
    /// The response body is only inspected for the error envelope.
    async fn join_room(&self, user: &User, room: RoomId) -> Result<(), AppError>;

    /// Fetches the room's configuration once every seat is taken.
    async fn room_ready(
        &self,
        user: &User,
        room: RoomId,
    ) -> Result<RoomConfig, AppError>;
}
