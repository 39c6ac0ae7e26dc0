//! Subcommand bodies.

use anyhow::{Context, bail};
use roomgate::prelude::*;
use url::Url;

type CliLauncher = Launcher<LobbyClient, Disabled, NativeAdapter<ProcessHost>>;

/// Builds the launcher this binary uses: HTTP lobby, native hand-off.
///
/// The runtime is always [`Runtime::Native`]; `ROOMGATE_NATIVE_SHELL` is
/// not consulted because this binary has no in-process engine.
fn launcher(config: LauncherConfig) -> anyhow::Result<CliLauncher> {
    let base = Url::parse(&config.http_server)
        .with_context(|| format!("invalid lobby endpoint '{}'", config.http_server))?;
    let host = config.process_host().context("no engine executable")?;
    tracing::debug!(program = %host.program().display(), "engine host");

    let router = DispatchRouter::new(
        Runtime::Native,
        Disabled(AdapterKind::Module),
        NativeAdapter::new(host),
    );
    Ok(Launcher::new(config, LobbyClient::new(base), router))
}

/// Prints every non-empty error list in `errors` to stderr.
fn report(errors: &FormErrors) {
    for key in errors.keys() {
        if let Some(message) = errors.message_for(key) {
            eprintln!("{key}: {message}");
        }
    }
}

/// Reports the launcher's published errors alongside `err`.
fn fail<T>(launcher: &CliLauncher, err: RoomgateError) -> anyhow::Result<T> {
    report(&launcher.errors().snapshot());
    Err(err.into())
}

pub async fn register(config: LauncherConfig, username: &str) -> anyhow::Result<()> {
    let launcher = launcher(config)?;
    match launcher.register(username).await {
        Ok(user) => {
            // Includes the ticket; `create` and `join` take it back.
            println!("{}", serde_json::to_string_pretty(&user)?);
            Ok(())
        }
        Err(e) => fail(&launcher, e),
    }
}

pub async fn create(
    config: LauncherConfig,
    user: User,
    players: u32,
) -> anyhow::Result<()> {
    let launcher = launcher(config)?;
    eprintln!("Creating a room for {players} players as {}", User::display_name(Some(&user)));
    match launcher.create(&user, players).await {
        Ok(launched) => {
            println!("{}", launched.room_id);
            Ok(())
        }
        Err(e) => fail(&launcher, e),
    }
}

pub async fn join(config: LauncherConfig, user: User, room: &str) -> anyhow::Result<()> {
    let launcher = launcher(config)?;
    match launcher.join(&user, room).await {
        Ok(launched) => {
            println!("{}", launched.room_id);
            Ok(())
        }
        Err(e) => fail(&launcher, e),
    }
}

pub async fn connect(config: LauncherConfig, raw: RawConnection) -> anyhow::Result<()> {
    let launcher = launcher(config)?;
    match launcher.connect(&raw).await {
        Ok(launched) => {
            println!("{}", launched.room_id);
            Ok(())
        }
        Err(e) => fail(&launcher, e),
    }
}

pub fn link(raw: &RawConnection, origin: &Url) -> anyhow::Result<()> {
    let descriptor = validated(raw)?;
    println!("{}", descriptor.room_link(origin)?);
    Ok(())
}

/// The receiving end of a native hand-off.
pub fn connect_game(raw: &RawConnection) -> anyhow::Result<()> {
    let descriptor = validated(raw)?;
    tracing::info!(
        room_id = %descriptor.room_id(),
        player_id = %descriptor.user_id(),
        players = descriptor.room_config().players.len(),
        ws = %descriptor.ws_baseurl(),
        "engine hand-off received"
    );
    Ok(())
}

fn validated(raw: &RawConnection) -> anyhow::Result<ConnectionDescriptor> {
    match validate_connection(raw) {
        Ok(descriptor) => Ok(descriptor),
        Err(failures) => {
            for (key, error) in failures.iter() {
                eprintln!("{key}: {error}");
            }
            bail!("{} connection field(s) rejected", failures.len())
        }
    }
}
