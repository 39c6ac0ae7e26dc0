//! Unified error type for Roomgate.

use roomgate_dispatch::DispatchError;
use roomgate_form::{AppError, FieldFailures};
use roomgate_protocol::ProtocolError;

use crate::LaunchState;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `roomgate` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RoomgateError {
    /// The lobby service failed or refused, or the username was blank.
    #[error(transparent)]
    App(#[from] AppError),

    /// One or more connection fields did not validate.
    #[error("invalid connection: {0}")]
    Invalid(#[from] FieldFailures),

    /// Handing off to the engine failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Re-serializing a value failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The launch was cancelled or superseded; its result was dropped.
    #[error("launch cancelled")]
    Cancelled,

    /// A launch step was attempted out of order.
    #[error("cannot move launch from {from} to {to}")]
    InvalidTransition {
        /// State the session was in.
        from: LaunchState,
        /// State that was requested.
        to: LaunchState,
    },
}
