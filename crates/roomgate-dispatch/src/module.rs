//! The in-process adapter: fetch the engine module, initialize it, run it.
//!
//! The engine signals some non-local exits by faulting with a message that
//! starts with [`CONTROL_FLOW_PREFIX`]. Those are not failures: the engine
//! took over and is running. [`EngineFault::from_message`] is the one
//! place that string is inspected; everything past it matches on
//! [`EngineFault::ControlFlow`].

use std::fmt;
use std::path::PathBuf;

use crate::{Adapter, AdapterKind, DispatchError, LaunchArgs, RenderTarget};

/// Message prefix of the engine's control-flow signal.
pub const CONTROL_FLOW_PREFIX: &str = "Using exceptions for control flow,";

/// Default file name of the engine module asset.
pub const DEFAULT_MODULE_ASSET: &str = "zoop_engine_bg.wasm";

// ---------------------------------------------------------------------------
// Engine boundary
// ---------------------------------------------------------------------------

/// How an engine call can end other than in plain success.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineFault {
    /// The engine unwound for control flow; it is running.
    #[error("control-flow signal")]
    ControlFlow,

    /// A real failure.
    #[error("{0}")]
    Fatal(String),
}

impl EngineFault {
    /// Classifies a raw fault message.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.starts_with(CONTROL_FLOW_PREFIX) {
            Self::ControlFlow
        } else {
            Self::Fatal(message)
        }
    }
}

/// Which engine call a fault came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStage {
    /// Module initialization from bytes.
    Init,
    /// The entry point call.
    Run,
}

impl fmt::Display for EngineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::Run => write!(f, "run"),
        }
    }
}

/// A loadable engine module.
pub trait EngineModule: Send + Sync {
    /// Instantiates the module from its binary image.
    async fn init(&self, bytes: Vec<u8>) -> Result<(), EngineFault>;

    /// Calls the entry point with the six connection strings and the
    /// render target.
    async fn run(
        &self,
        args: &LaunchArgs,
        target: &RenderTarget,
    ) -> Result<(), EngineFault>;
}

/// Where the module's binary image comes from.
pub trait AssetSource: Send + Sync {
    /// Reads the whole asset.
    async fn fetch(&self) -> Result<Vec<u8>, DispatchError>;
}

// ---------------------------------------------------------------------------
// FsAssetSource
// ---------------------------------------------------------------------------

/// Reads the module asset from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
    asset: String,
}

impl FsAssetSource {
    /// The asset `asset` under `root`.
    pub fn new(root: impl Into<PathBuf>, asset: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            asset: asset.into(),
        }
    }

    /// Full path of the asset.
    pub fn path(&self) -> PathBuf {
        self.root.join(&self.asset)
    }
}

impl AssetSource for FsAssetSource {
    async fn fetch(&self) -> Result<Vec<u8>, DispatchError> {
        let path = self.path();
        tokio::fs::read(&path)
            .await
            .map_err(|source| DispatchError::Asset { path, source })
    }
}

// ---------------------------------------------------------------------------
// ModuleAdapter
// ---------------------------------------------------------------------------

/// Runs the engine in-process.
pub struct ModuleAdapter<A, E> {
    assets: A,
    engine: E,
}

impl<A: AssetSource, E: EngineModule> ModuleAdapter<A, E> {
    /// An adapter loading `engine` from `assets`.
    pub fn new(assets: A, engine: E) -> Self {
        Self { assets, engine }
    }

    /// The engine this adapter drives.
    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<A: AssetSource, E: EngineModule> Adapter for ModuleAdapter<A, E> {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Module
    }

    async fn hand_off(
        &self,
        args: LaunchArgs,
        target: &RenderTarget,
    ) -> Result<(), DispatchError> {
        let bytes = self.assets.fetch().await?;
        tracing::debug!(bytes = bytes.len(), "module asset loaded");

        settle(EngineStage::Init, self.engine.init(bytes).await)?;
        settle(EngineStage::Run, self.engine.run(&args, target).await)?;

        tracing::info!(room_id = %args.room_uuid, %target, "engine running in-process");
        Ok(())
    }
}

/// Swallows the control-flow signal; anything else fatal is an error.
fn settle(
    stage: EngineStage,
    result: Result<(), EngineFault>,
) -> Result<(), DispatchError> {
    match result {
        Ok(()) => Ok(()),
        Err(EngineFault::ControlFlow) => {
            tracing::debug!(%stage, "engine yielded control-flow signal");
            Ok(())
        }
        Err(EngineFault::Fatal(message)) => {
            Err(DispatchError::Engine { stage, message })
        }
    }
}
