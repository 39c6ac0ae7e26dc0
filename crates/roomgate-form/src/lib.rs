//! Field decoding and validation for Roomgate.
//!
//! Everything the launcher receives (lobby responses, configuration,
//! room-link query parameters) arrives as untrusted text. This crate is
//! the only place that text becomes typed values:
//!
//! - [`decode`] — scalar decoders (`&str` → `Option<T>`), never failing
//!   loudly.
//! - [`AppError`] — the user-facing error taxonomy.
//! - [`FormErrors`] / [`ErrorStore`] — per-field error lists, updated
//!   only by copy-then-replace.
//! - [`validate_connection`] — runs every decoder over the six connection
//!   fields and returns either a [`ConnectionDescriptor`] or every
//!   failure at once ([`FieldFailures`]).
//! - [`validate_username`] — the one pre-submission check on free text.

pub mod decode;

mod auth;
mod connect;
mod error;
mod form;

pub use auth::validate_username;
pub use connect::{
    ConnectionDescriptor, FieldFailures, RawConnection, Tagged, keys,
    validate_connection,
};
pub use error::AppError;
pub use form::{ErrorStore, FieldKey, FormErrors};
