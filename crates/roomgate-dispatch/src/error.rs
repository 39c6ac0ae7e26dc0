use std::path::PathBuf;

use roomgate_protocol::ProtocolError;

use crate::{AdapterKind, EngineStage};

/// Errors that can occur while handing a room off to the engine.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The descriptor could not be re-serialized into launch arguments.
    #[error("launch arguments: {0}")]
    Encode(#[from] ProtocolError),

    /// The engine module asset could not be read.
    #[error("module asset {}: {source}", path.display())]
    Asset {
        /// Where the asset was looked for.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The in-process engine faulted for a reason other than control flow.
    #[error("engine {stage} failed: {message}")]
    Engine {
        /// Which engine call faulted.
        stage: EngineStage,
        /// The fault message as the engine reported it.
        message: String,
    },

    /// The native host process could not be started.
    #[error("native host could not start: {0}")]
    HostSpawn(#[source] std::io::Error),

    /// The native host ran but reported failure.
    #[error("native host failed: {0}")]
    Native(String),

    /// The adapter selected for this runtime is not available in this build.
    #[error("{0} adapter unavailable")]
    AdapterUnavailable(AdapterKind),
}
