//! Lobby round trips, validation, and dispatch, wired together.

use std::sync::Arc;

use roomgate_dispatch::{Adapter, AdapterKind, DispatchRouter};
use roomgate_form::{
    AppError, ErrorStore, FieldFailures, FieldKey, RawConnection, decode::decode_uuid,
    keys, validate_connection, validate_username,
};
use roomgate_lobby::LobbyApi;
use roomgate_protocol::{ProtocolError, RoomConfig, RoomId, User};

use crate::{Attempt, LaunchSession, LaunchState, LauncherConfig, RoomgateError};

/// Field key for the username input.
pub const USERNAME_KEY: &str = "username";

/// What a successful launch produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Launched {
    /// The room the engine joined.
    pub room_id: RoomId,
    /// The adapter that handed off.
    pub adapter: AdapterKind,
}

/// Drives registration and the create, join, and connect flows.
///
/// Lobby failures land on [`FieldKey::Form`] in the shared
/// [`ErrorStore`]; validation failures land on their own field keys.
/// Nothing is retried. Every flow runs under a fresh [`Attempt`], and
/// results that arrive after [`cancel`](Self::cancel) are dropped
/// without touching the store.
pub struct Launcher<L, M, N> {
    config: LauncherConfig,
    lobby: L,
    router: DispatchRouter<M, N>,
    errors: Arc<ErrorStore>,
    session: LaunchSession,
}

impl<L, M, N> Launcher<L, M, N>
where
    L: LobbyApi,
    M: Adapter,
    N: Adapter,
{
    /// A launcher with its own empty error store.
    pub fn new(
        config: LauncherConfig,
        lobby: L,
        router: DispatchRouter<M, N>,
    ) -> Self {
        Self::with_errors(config, lobby, router, Arc::new(ErrorStore::new()))
    }

    /// A launcher publishing into `errors`.
    pub fn with_errors(
        config: LauncherConfig,
        lobby: L,
        router: DispatchRouter<M, N>,
        errors: Arc<ErrorStore>,
    ) -> Self {
        Self {
            config,
            lobby,
            router,
            errors,
            session: LaunchSession::new(),
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// The shared error store.
    pub fn errors(&self) -> &Arc<ErrorStore> {
        &self.errors
    }

    /// The router hand-offs go through.
    pub fn router(&self) -> &DispatchRouter<M, N> {
        &self.router
    }

    /// The launch session.
    pub fn session(&self) -> &LaunchSession {
        &self.session
    }

    /// Drops whatever is in flight and clears form-level errors.
    pub fn cancel(&self) {
        self.session.cancel();
        self.errors.clear(&FieldKey::Form);
    }

    /// Registers `username` with the lobby.
    ///
    /// A blank name is reported under [`USERNAME_KEY`]; lobby failures
    /// under [`FieldKey::Form`].
    pub async fn register(&self, username: &str) -> Result<User, RoomgateError> {
        let username_key = FieldKey::field(USERNAME_KEY);
        self.errors.clear(&username_key);

        let register = validate_username(username).inspect_err(|e| {
            self.errors.append(username_key, [e.clone()]);
        })?;

        self.lobby
            .register(&register)
            .await
            .inspect_err(|e| self.errors.append(FieldKey::Form, [e.clone()]))
            .map_err(RoomgateError::from)
    }

    /// Creates a room, waits for it to fill, and launches into it.
    pub async fn create(
        &self,
        user: &User,
        player_count: u32,
    ) -> Result<Launched, RoomgateError> {
        let attempt = self.session.begin();
        self.errors.clear(&FieldKey::Form);

        let room = self.lobby.create_room(user, player_count).await;
        let room = self.settle_lobby(attempt, room)?;
        tracing::info!(room_id = %room, "waiting for players");

        let config = self.lobby.room_ready(user, room).await;
        let config = self.settle_lobby(attempt, config)?;

        let raw = self.raw_connection(user, &room.to_string(), &config)?;
        self.launch(attempt, &raw).await
    }

    /// Joins the room typed in as `room`, waits for it to fill, and
    /// launches into it.
    ///
    /// A malformed room id is reported under `roomId` without contacting
    /// the lobby.
    pub async fn join(
        &self,
        user: &User,
        room: &str,
    ) -> Result<Launched, RoomgateError> {
        let attempt = self.session.begin();
        let room_key = FieldKey::field(keys::ROOM_ID);
        self.errors.clear(&room_key);
        self.errors.clear(&FieldKey::Form);

        let Some(room) = decode_uuid(room.trim()).map(RoomId) else {
            let mut failures = FieldFailures::default();
            failures.insert(
                room_key.clone(),
                AppError::parse(room_key.to_string(), "Not a valid UUID"),
            );
            failures.publish(&self.errors);
            return Err(failures.into());
        };

        let joined = self.lobby.join_room(user, room).await;
        self.settle_lobby(attempt, joined)?;
        tracing::info!(room_id = %room, "joined, waiting for players");

        let config = self.lobby.room_ready(user, room).await;
        let config = self.settle_lobby(attempt, config)?;

        let raw = self.raw_connection(user, &room.to_string(), &config)?;
        self.launch(attempt, &raw).await
    }

    /// Validates `raw` (e.g. read from a room link) and launches.
    pub async fn connect(&self, raw: &RawConnection) -> Result<Launched, RoomgateError> {
        let attempt = self.session.begin();
        self.launch(attempt, raw).await
    }

    /// Unwraps a lobby result, publishing its error if the attempt is
    /// still current.
    fn settle_lobby<T>(
        &self,
        attempt: Attempt,
        result: Result<T, AppError>,
    ) -> Result<T, RoomgateError> {
        if !self.session.is_current(attempt) {
            tracing::debug!("dropping lobby result of a cancelled launch");
            return Err(RoomgateError::Cancelled);
        }
        result.map_err(|e| {
            tracing::warn!(error = %e, "lobby request failed");
            self.errors.append(FieldKey::Form, [e.clone()]);
            RoomgateError::App(e)
        })
    }

    fn raw_connection(
        &self,
        user: &User,
        room: &str,
        config: &RoomConfig,
    ) -> Result<RawConnection, RoomgateError> {
        let config_json =
            serde_json::to_string(config).map_err(ProtocolError::Encode)?;
        Ok(RawConnection::new(
            &self.config.http_server,
            &self.config.ws_server,
            &user.id,
            &user.ticket,
            room,
            config_json,
        ))
    }

    async fn launch(
        &self,
        attempt: Attempt,
        raw: &RawConnection,
    ) -> Result<Launched, RoomgateError> {
        for field in [
            &raw.http_baseurl,
            &raw.ws_baseurl,
            &raw.user_id,
            &raw.user_ticket,
            &raw.room_id,
            &raw.room_config_json,
        ] {
            self.errors.clear(&field.key);
        }

        let descriptor = match validate_connection(raw) {
            Ok(descriptor) => descriptor,
            Err(failures) => {
                if self.session.is_current(attempt) {
                    failures.publish(&self.errors);
                }
                return Err(failures.into());
            }
        };
        let room_id = descriptor.room_id();

        self.session.advance(attempt, LaunchState::Validated)?;
        self.session.advance(attempt, LaunchState::Dispatching)?;

        let result = self.router.dispatch(descriptor, &self.config.target()).await;
        if !self.session.is_current(attempt) {
            tracing::debug!(%room_id, "dropping dispatch result of a cancelled launch");
            return Err(RoomgateError::Cancelled);
        }

        match result {
            Ok(adapter) => {
                self.session.advance(attempt, LaunchState::HandedOff)?;
                tracing::info!(%room_id, %adapter, "handed off");
                Ok(Launched { room_id, adapter })
            }
            Err(e) => {
                self.session.advance(attempt, LaunchState::Failed)?;
                tracing::error!(%room_id, error = %e, "hand-off failed");
                Err(e.into())
            }
        }
    }
}
