//! Engine hand-off for Roomgate.
//!
//! Once a [`ConnectionDescriptor`](roomgate_form::ConnectionDescriptor)
//! exists, this crate gets it to the engine. There are two ways to do
//! that, and which one applies is a property of the process, fixed at
//! startup ([`Runtime`]):
//!
//! - **in-process** — [`ModuleAdapter`] fetches the engine module,
//!   initializes it, and calls its entry point with a render target;
//! - **native** — [`NativeAdapter`] makes one named call
//!   (`connect_game`) across the native host boundary, e.g. a child
//!   process via [`ProcessHost`].
//!
//! [`DispatchRouter`] holds one of each and picks by runtime.

#![allow(async_fn_in_trait)]

mod args;
mod error;
mod module;
mod native;
mod router;
mod runtime;

pub use args::{DEFAULT_RENDER_TARGET, LaunchArgs, RenderTarget};
pub use error::DispatchError;
pub use module::{
    AssetSource, CONTROL_FLOW_PREFIX, DEFAULT_MODULE_ASSET, EngineFault,
    EngineModule, EngineStage, FsAssetSource, ModuleAdapter,
};
pub use native::{CONNECT_GAME, NativeAdapter, NativeHost, ProcessHost};
pub use router::DispatchRouter;
pub use runtime::{AdapterKind, NATIVE_SHELL_ENV, Runtime};

/// One way of handing launch arguments to the engine.
pub trait Adapter: Send + Sync {
    /// Which adapter this is.
    fn kind(&self) -> AdapterKind;

    /// Gives the engine its arguments. Resolves once the engine has taken
    /// over or the hand-off has definitively failed.
    async fn hand_off(
        &self,
        args: LaunchArgs,
        target: &RenderTarget,
    ) -> Result<(), DispatchError>;
}

/// Stand-in for an adapter this build doesn't provide.
///
/// Always fails with [`DispatchError::AdapterUnavailable`].
#[derive(Debug, Clone, Copy)]
pub struct Disabled(pub AdapterKind);

impl Adapter for Disabled {
    fn kind(&self) -> AdapterKind {
        self.0
    }

    async fn hand_off(
        &self,
        _args: LaunchArgs,
        _target: &RenderTarget,
    ) -> Result<(), DispatchError> {
        Err(DispatchError::AdapterUnavailable(self.0))
    }
}
