//! # Roomgate
//!
//! Validated hand-off from a game lobby to the game engine.
//!
//! A player registers, creates or joins a room, and waits for it to fill.
//! Roomgate then takes the six loosely typed connection fields (lobby
//! endpoint, engine endpoint, user id, ticket, room id, room config),
//! validates all of them at once, and hands the result to the engine,
//! either in-process or through a native host. Every failure along the
//! way becomes a human-readable message filed under the form field it
//! belongs to.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roomgate::prelude::*;
//!
//! # async fn run() -> Result<(), RoomgateError> {
//! let config = LauncherConfig::from_env();
//! let lobby = LobbyClient::new(config.http_server.parse().map_err(|_| {
//!     AppError::parse("httpBaseurl", "Not a valid URL")
//! })?);
//! let router = DispatchRouter::new(
//!     Runtime::Native,
//!     Disabled(AdapterKind::Module),
//!     NativeAdapter::new(config.process_host()?),
//! );
//! let launcher = Launcher::new(config, lobby, router);
//!
//! let user = launcher.register("ada").await?;
//! launcher.create(&user, 2).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod launcher;
mod logging;
mod session;

pub use config::{
    ASSET_ROOT_ENV, DEFAULT_HTTP_SERVER, DEFAULT_WS_SERVER, ENGINE_ENV,
    HTTP_SERVER_ENV, LauncherConfig, WS_SERVER_ENV,
};
pub use error::RoomgateError;
pub use launcher::{Launched, Launcher, USERNAME_KEY};
pub use logging::{DEFAULT_FILTER, init_tracing};
pub use session::{Attempt, LaunchSession, LaunchState};

/// Re-exports of the types most launcher code needs.
pub mod prelude {
    pub use crate::{
        LaunchState, Launched, Launcher, LauncherConfig, RoomgateError,
        init_tracing,
    };
    pub use roomgate_dispatch::{
        Adapter, AdapterKind, Disabled, DispatchError, DispatchRouter,
        FsAssetSource, LaunchArgs, ModuleAdapter, NativeAdapter, ProcessHost,
        RenderTarget, Runtime,
    };
    pub use roomgate_form::{
        AppError, ConnectionDescriptor, ErrorStore, FieldKey, FormErrors,
        RawConnection, validate_connection,
    };
    pub use roomgate_lobby::{LobbyApi, LobbyClient};
    pub use roomgate_protocol::{PlayerId, RoomConfig, RoomId, User};
}
