//! `reqwest`-backed [`LobbyApi`] implementation.

use reqwest::{Client, Method};
use roomgate_form::AppError;
use roomgate_protocol::{Codec, JsonCodec, Register, RoomConfig, RoomId, User};
use url::Url;

use crate::{LobbyApi, classify_refusal, classify_response};

/// HTTP client for one lobby service.
///
/// Identifiers and the credential travel as path segments; each segment
/// is percent-encoded on its own, so a `/` inside a ticket can't change
/// the route.
#[derive(Debug, Clone)]
pub struct LobbyClient<C: Codec = JsonCodec> {
    http: Client,
    base: Url,
    codec: C,
}

impl LobbyClient {
    /// A client for the service at `base`, decoding JSON.
    pub fn new(base: Url) -> Self {
        Self::with_codec(base, JsonCodec)
    }
}

impl<C: Codec> LobbyClient<C> {
    /// A client for the service at `base` with a custom codec.
    pub fn with_codec(base: Url, codec: C) -> Self {
        Self {
            http: Client::new(),
            base,
            codec,
        }
    }

    /// The service's base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `base` with `segments` appended to its path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                AppError::fetch(format!("{} cannot be a base URL", self.base))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Sends a bodiless request and returns the raw response body.
    ///
    /// The status code is ignored. Transport errors are stripped of their
    /// URL before they reach the user, because the URL holds the ticket.
    async fn send(&self, method: Method, url: Url) -> Result<Vec<u8>, AppError> {
        let response = self
            .http
            .request(method, url)
            .send()
            .await
            .map_err(|e| AppError::fetch(e.without_url()))?;
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::fetch(e.without_url()))?;
        Ok(body.to_vec())
    }
}

impl<C: Codec> LobbyApi for LobbyClient<C> {
    async fn register(&self, register: &Register) -> Result<User, AppError> {
        let url = self.endpoint(&["user", "register", register.username.as_str()])?;
        let body = self.send(Method::POST, url).await?;
        let user: User = classify_response(&self.codec, &body, "User")?;
        tracing::info!(player_id = %user.id, username = %user.username, "registered");
        Ok(user)
    }

    async fn create_room(
        &self,
        user: &User,
        player_count: u32,
    ) -> Result<RoomId, AppError> {
        let count = player_count.to_string();
        let url = self.endpoint(&[
            "api",
            "game",
            "new",
            "by",
            user.id.as_str(),
            "ticket",
            user.ticket.as_str(),
            "player_count",
            count.as_str(),
        ])?;
        let body = self.send(Method::POST, url).await?;
        let room: RoomId = classify_response(&self.codec, &body, "RoomId")?;
        tracing::info!(room_id = %room, player_count, "room created");
        Ok(room)
    }

    async fn join_room(&self, user: &User, room: RoomId) -> Result<(), AppError> {
        let room_id = room.to_string();
        let url = self.endpoint(&[
            "api",
            "game",
            "join",
            room_id.as_str(),
            "by",
            user.id.as_str(),
            "ticket",
            user.ticket.as_str(),
        ])?;
        let body = self.send(Method::POST, url).await?;
        classify_refusal(&self.codec, &body)?;
        tracing::info!(room_id = %room, player_id = %user.id, "room joined");
        Ok(())
    }

    async fn room_ready(
        &self,
        user: &User,
        room: RoomId,
    ) -> Result<RoomConfig, AppError> {
        let room_id = room.to_string();
        let url = self.endpoint(&[
            "api",
            "game",
            "ready",
            room_id.as_str(),
            "for",
            user.id.as_str(),
            "ticket",
            user.ticket.as_str(),
        ])?;
        let body = self.send(Method::GET, url).await?;
        let config: RoomConfig =
            classify_response(&self.codec, &body, "RoomConfig")?;
        tracing::debug!(room_id = %room, players = config.players.len(), "room ready");
        Ok(config)
    }
}
