//! The user-facing error taxonomy.

use std::fmt::Display;

use roomgate_protocol::ServerErrorEnvelope;

/// Everything that can go wrong between the user pressing a button and
/// the engine taking over.
///
/// Each variant renders to exactly one human-readable message via
/// `Display`; that message is what ends up next to a field or in the
/// form banner. `Clone` is required because error lists are copied
/// wholesale on every update (see [`FormErrors`](crate::FormErrors)).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    /// The lobby service (or an asset) could not be reached, or answered
    /// with something that isn't JSON.
    #[error("Failed to contact server: {cause}")]
    Fetch {
        /// The underlying transport failure, rendered.
        cause: String,
    },

    /// A field or response failed structural decoding.
    #[error("Failed to decode '{field}': {reason}")]
    Parse {
        /// Field key or expected shape name.
        field: String,
        /// Why it didn't decode.
        reason: String,
    },

    /// The lobby service explicitly refused the request.
    #[error("Request refused: {}", envelope.message)]
    Server {
        /// The envelope exactly as the server sent it.
        envelope: ServerErrorEnvelope,
    },

    /// The username was blank after trimming.
    #[error("Username can't be empty")]
    UsernameEmpty,
}

impl AppError {
    /// Wraps a transport failure.
    pub fn fetch(cause: impl Display) -> Self {
        Self::Fetch {
            cause: cause.to_string(),
        }
    }

    /// Builds a decode failure for `field`.
    pub fn parse(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The message shown to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<ServerErrorEnvelope> for AppError {
    fn from(envelope: ServerErrorEnvelope) -> Self {
        Self::Server { envelope }
    }
}
