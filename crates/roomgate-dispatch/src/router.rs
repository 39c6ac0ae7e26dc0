//! Picks the adapter for this runtime and hands the descriptor to it.

use roomgate_form::ConnectionDescriptor;

use crate::{Adapter, AdapterKind, DispatchError, LaunchArgs, RenderTarget, Runtime};

/// Routes a validated descriptor to one of two adapters.
///
/// Both adapters are fixed at construction; the runtime flag only picks
/// between them. The router holds no per-dispatch state.
pub struct DispatchRouter<M, N> {
    runtime: Runtime,
    module: M,
    native: N,
}

impl<M: Adapter, N: Adapter> DispatchRouter<M, N> {
    /// A router for `runtime`.
    pub fn new(runtime: Runtime, module: M, native: N) -> Self {
        Self {
            runtime,
            module,
            native,
        }
    }

    /// A router for [`Runtime::current`].
    pub fn for_current_runtime(module: M, native: N) -> Self {
        Self::new(Runtime::current(), module, native)
    }

    /// The runtime this router dispatches for.
    pub fn runtime(&self) -> Runtime {
        self.runtime
    }

    /// The adapter kind [`dispatch`](Self::dispatch) will use.
    pub fn selected(&self) -> AdapterKind {
        self.runtime.adapter_kind()
    }

    /// Re-serializes `descriptor` and hands it to the selected adapter.
    ///
    /// Consumes the descriptor: one validation, one hand-off.
    ///
    /// # Errors
    /// Whatever the selected adapter reports, or [`DispatchError::Encode`]
    /// if the room configuration can't be serialized.
    pub async fn dispatch(
        &self,
        descriptor: ConnectionDescriptor,
        target: &RenderTarget,
    ) -> Result<AdapterKind, DispatchError> {
        let args = LaunchArgs::from_descriptor(&descriptor)?;
        let kind = self.selected();
        tracing::info!(
            room_id = %descriptor.room_id(),
            player_id = %descriptor.user_id(),
            adapter = %kind,
            "dispatching"
        );

        match self.runtime {
            Runtime::InProcess => self.module.hand_off(args, target).await?,
            Runtime::Native => self.native.hand_off(args, target).await?,
        }
        Ok(kind)
    }
}
