//! `roomgate`: register, create or join a room, and launch the engine.
//!
//! This binary is a native shell: hand-off always goes through the
//! native adapter whatever `ROOMGATE_NATIVE_SHELL` says, which re-runs an engine executable with the hidden
//! `connect-game` subcommand. Without `--engine` that executable is this
//! binary, whose `connect-game` validates and acknowledges the hand-off.

mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use roomgate::{
    ASSET_ROOT_ENV, DEFAULT_HTTP_SERVER, DEFAULT_WS_SERVER, ENGINE_ENV,
    HTTP_SERVER_ENV, LauncherConfig, WS_SERVER_ENV,
};
use roomgate::prelude::RawConnection;
use url::Url;

/// Seats in a new room unless `--players` says otherwise.
const DEFAULT_PLAYERS: u32 = 2;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Lobby-to-engine launcher.
#[derive(Debug, Parser)]
#[command(name = "roomgate", version, about)]
struct Cli {
    /// Lobby service HTTP endpoint.
    #[arg(long, global = true, env = HTTP_SERVER_ENV, default_value = DEFAULT_HTTP_SERVER)]
    http_server: String,

    /// Engine WebSocket endpoint handed to the engine.
    #[arg(long, global = true, env = WS_SERVER_ENV, default_value = DEFAULT_WS_SERVER)]
    ws_server: String,

    /// Directory holding the engine module asset.
    #[arg(long, global = true, env = ASSET_ROOT_ENV, default_value = ".")]
    asset_root: PathBuf,

    /// Engine executable. Defaults to this binary.
    #[arg(long, global = true, env = ENGINE_ENV)]
    engine: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register a user and print it as JSON.
    Register {
        /// Name to register; surrounding whitespace is trimmed.
        username: String,
    },

    /// Create a room, wait for it to fill, then launch.
    Create {
        #[command(flatten)]
        user: UserArgs,

        /// Seats in the room.
        #[arg(long, default_value_t = DEFAULT_PLAYERS, value_parser = clap::value_parser!(u32).range(2..=21))]
        players: u32,
    },

    /// Join a room by id, wait for it to fill, then launch.
    Join {
        #[command(flatten)]
        user: UserArgs,

        /// Room id as shared by its creator.
        room: String,
    },

    /// Launch from a room link.
    Connect {
        /// A `…/room/{id}?httpBaseurl=…` link.
        link: Url,
    },

    /// Print the room link for a set of connection fields.
    Link {
        #[command(flatten)]
        fields: ConnectionArgs,

        /// Origin the link points at.
        #[arg(long, default_value = "http://localhost:3000")]
        origin: Url,
    },

    /// Engine entry point invoked by the native adapter.
    #[command(hide = true)]
    ConnectGame(ConnectionArgs),
}

/// A signed-in user, as printed by `register`.
#[derive(Debug, Args)]
struct UserArgs {
    /// The user's id.
    #[arg(long)]
    user_id: String,

    /// The user's ticket.
    #[arg(long, env = "ROOMGATE_USER_TICKET", hide_env_values = true)]
    user_ticket: String,

    /// The user's name.
    #[arg(long, default_value = "")]
    username: String,
}

/// The six connection fields, as flags.
#[derive(Debug, Args)]
struct ConnectionArgs {
    #[arg(long)]
    http_baseurl: String,
    #[arg(long)]
    ws_baseurl: String,
    #[arg(long)]
    user_id: String,
    #[arg(long)]
    user_ticket: String,
    #[arg(long)]
    room_id: String,
    #[arg(long)]
    room_config_json: String,
}

impl ConnectionArgs {
    fn into_raw(self) -> RawConnection {
        RawConnection::new(
            self.http_baseurl,
            self.ws_baseurl,
            self.user_id,
            self.user_ticket,
            self.room_id,
            self.room_config_json,
        )
    }
}

impl Cli {
    /// Environment defaults overridden by the global flags.
    fn config(&self) -> LauncherConfig {
        let mut config = LauncherConfig::from_env()
            .with_http_server(&self.http_server)
            .with_ws_server(&self.ws_server);
        config.asset_root = self.asset_root.clone();
        config.engine_program = self.engine.clone();
        config
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    roomgate::init_tracing();

    let cli = Cli::parse();
    let config = cli.config();

    match cli.command {
        Command::Register { username } => {
            commands::register(config, &username).await
        }
        Command::Create { user, players } => {
            commands::create(config, user.into(), players).await
        }
        Command::Join { user, room } => {
            commands::join(config, user.into(), &room).await
        }
        Command::Connect { link } => {
            commands::connect(config, RawConnection::from_link(&link)).await
        }
        Command::Link { fields, origin } => {
            commands::link(&fields.into_raw(), &origin)
        }
        Command::ConnectGame(fields) => commands::connect_game(&fields.into_raw()),
    }
}

impl From<UserArgs> for roomgate::prelude::User {
    fn from(args: UserArgs) -> Self {
        Self {
            id: args.user_id,
            username: args.username,
            ticket: args.user_ticket,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
