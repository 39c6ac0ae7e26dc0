//! The one-shot launch state machine.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::RoomgateError;

// ---------------------------------------------------------------------------
// LaunchState
// ---------------------------------------------------------------------------

/// Where a launch attempt stands.
///
/// ```text
/// Idle → Validated → Dispatching → HandedOff
///                                ↘ Failed
/// ```
///
/// `HandedOff` and `Failed` are terminal. There is no retry edge; a new
/// attempt starts over from `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LaunchState {
    /// Nothing validated yet.
    #[default]
    Idle,
    /// A descriptor exists.
    Validated,
    /// The adapter is working.
    Dispatching,
    /// The engine has taken over.
    HandedOff,
    /// The hand-off failed.
    Failed,
}

impl LaunchState {
    /// States reachable in one step.
    pub fn successors(self) -> &'static [Self] {
        match self {
            Self::Idle => &[Self::Validated],
            Self::Validated => &[Self::Dispatching],
            Self::Dispatching => &[Self::HandedOff, Self::Failed],
            Self::HandedOff | Self::Failed => &[],
        }
    }

    /// Returns `true` if moving to `target` is a legal single step.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.successors().contains(&target)
    }

    /// Returns `true` for `HandedOff` and `Failed`.
    pub fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }
}

impl fmt::Display for LaunchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Validated => write!(f, "Validated"),
            Self::Dispatching => write!(f, "Dispatching"),
            Self::HandedOff => write!(f, "HandedOff"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchSession
// ---------------------------------------------------------------------------

/// Handle for one launch attempt, issued by [`LaunchSession::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt(u64);

#[derive(Debug, Default)]
struct Inner {
    state: LaunchState,
    generation: u64,
}

/// Tracks the current launch attempt.
///
/// Every [`begin`](Self::begin) and [`cancel`](Self::cancel) bumps a
/// generation counter. Work that finishes under an older [`Attempt`] is
/// stale: [`advance`](Self::advance) refuses it, and callers check
/// [`is_current`](Self::is_current) before publishing anything.
#[derive(Debug, Default)]
pub struct LaunchSession {
    inner: Mutex<Inner>,
}

impl LaunchSession {
    /// A session in `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The current state.
    pub fn state(&self) -> LaunchState {
        self.lock().state
    }

    /// Starts a new attempt, superseding any in flight.
    pub fn begin(&self) -> Attempt {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = LaunchState::Idle;
        Attempt(inner.generation)
    }

    /// Drops the current attempt and returns to `Idle`.
    pub fn cancel(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        let from = std::mem::take(&mut inner.state);
        tracing::info!(%from, "launch cancelled");
    }

    /// Returns `true` if `attempt` is the latest one.
    pub fn is_current(&self, attempt: Attempt) -> bool {
        self.lock().generation == attempt.0
    }

    /// Moves `attempt` to `to`.
    ///
    /// # Errors
    /// [`RoomgateError::Cancelled`] if `attempt` is stale,
    /// [`RoomgateError::InvalidTransition`] if `to` isn't a successor of
    /// the current state.
    pub fn advance(
        &self,
        attempt: Attempt,
        to: LaunchState,
    ) -> Result<(), RoomgateError> {
        let mut inner = self.lock();
        if inner.generation != attempt.0 {
            return Err(RoomgateError::Cancelled);
        }
        let from = inner.state;
        if !from.can_transition_to(to) {
            return Err(RoomgateError::InvalidTransition { from, to });
        }
        inner.state = to;
        tracing::debug!(%from, %to, "launch state");
        Ok(())
    }
}
