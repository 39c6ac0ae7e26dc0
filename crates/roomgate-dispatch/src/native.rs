//! The out-of-process adapter.

use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::{Adapter, AdapterKind, DispatchError, LaunchArgs, RenderTarget};

/// Name of the native host command that starts a game.
pub const CONNECT_GAME: &str = "connect_game";

/// Something that can run a named command with named parameters on the
/// native side.
pub trait NativeHost: Send + Sync {
    /// Runs `command` with `args` and waits for it to finish.
    async fn invoke(
        &self,
        command: &str,
        args: &LaunchArgs,
    ) -> Result<(), DispatchError>;
}

/// Hands off through a [`NativeHost`]. The render target is not used.
///
/// One invocation per hand-off. Failures are logged and returned,
/// never retried.
pub struct NativeAdapter<H> {
    host: H,
}

impl<H: NativeHost> NativeAdapter<H> {
    /// An adapter over `host`.
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// The host this adapter calls.
    pub fn host(&self) -> &H {
        &self.host
    }
}

impl<H: NativeHost> Adapter for NativeAdapter<H> {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Native
    }

    async fn hand_off(
        &self,
        args: LaunchArgs,
        _target: &RenderTarget,
    ) -> Result<(), DispatchError> {
        match self.host.invoke(CONNECT_GAME, &args).await {
            Ok(()) => {
                tracing::info!(room_id = %args.room_uuid, "native host finished");
                Ok(())
            }
            Err(e) => {
                tracing::error!(room_id = %args.room_uuid, error = %e, "native host failed");
                Err(e)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ProcessHost
// ---------------------------------------------------------------------------

/// A [`NativeHost`] that runs the engine executable as a child process.
///
/// `connect_game` becomes the `connect-game` subcommand and each named
/// parameter a `--kebab-case=value` flag. The child's exit status decides
/// success. The ticket is on the child's command line, so it is visible
/// to local process listings for as long as the child runs.
#[derive(Debug, Clone)]
pub struct ProcessHost {
    program: PathBuf,
}

impl ProcessHost {
    /// A host running `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// A host re-running the current executable.
    ///
    /// # Errors
    /// Returns [`DispatchError::HostSpawn`] if the executable's path is
    /// unknown.
    pub fn current_exe() -> Result<Self, DispatchError> {
        std::env::current_exe()
            .map(Self::new)
            .map_err(DispatchError::HostSpawn)
    }

    /// The executable this host runs.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl NativeHost for ProcessHost {
    async fn invoke(
        &self,
        command: &str,
        args: &LaunchArgs,
    ) -> Result<(), DispatchError> {
        let subcommand = command.replace('_', "-");
        let mut cmd = Command::new(&self.program);
        cmd.arg(&subcommand).args(args.process_argv());

        tracing::debug!(program = %self.program.display(), %subcommand, "spawning native host");
        let status = cmd.status().await.map_err(DispatchError::HostSpawn)?;

        if status.success() {
            Ok(())
        } else {
            Err(DispatchError::Native(format!("{subcommand} exited with {status}")))
        }
    }
}
