//! Per-field error lists and the store that publishes them.
//!
//! [`FormErrors`] is an immutable snapshot. Every operation that
//! "changes" it returns a new snapshot built from a full copy, so a
//! reader holding the old one never sees a half-applied update.
//!
//! [`ErrorStore`] owns the current snapshot and swaps it under a mutex.
//! Each update closure receives the latest published snapshot, so two
//! updates issued back to back can't overwrite each other.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::AppError;

/// Separator between messages rendered for one key.
const MESSAGE_SEPARATOR: &str = ". ";

// ---------------------------------------------------------------------------
// FieldKey
// ---------------------------------------------------------------------------

/// Which part of a form an error belongs to.
///
/// `Form` errors are not tied to any input and render as a page-level
/// banner; `Field` errors render next to the named input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    /// No specific field: a form-level error.
    Form,
    /// A named input, e.g. `"roomId"`.
    Field(String),
}

impl FieldKey {
    /// Key for the named field.
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// The field name, or `None` for form-level errors.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Form => None,
            Self::Field(name) => Some(name),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Form => write!(f, "form"),
            Self::Field(name) => write!(f, "{name}"),
        }
    }
}

// ---------------------------------------------------------------------------
// FormErrors
// ---------------------------------------------------------------------------

/// An immutable snapshot of every error currently shown on a form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    values: BTreeMap<FieldKey, Vec<AppError>>,
}

impl FormErrors {
    /// An empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy with `key`'s list emptied. Other keys are untouched.
    pub fn cleared(&self, key: &FieldKey) -> Self {
        let mut copy = self.clone();
        copy.values.insert(key.clone(), Vec::new());
        copy
    }

    /// A copy with `errors` appended to `key`'s list, in order.
    pub fn appended(
        &self,
        key: FieldKey,
        errors: impl IntoIterator<Item = AppError>,
    ) -> Self {
        let mut copy = self.clone();
        copy.values.entry(key).or_default().extend(errors);
        copy
    }

    /// The errors recorded for `key`, oldest first.
    pub fn errors_for(&self, key: &FieldKey) -> &[AppError] {
        self.values.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// All messages for `key` joined with `". "`, or `None` if there are
    /// none. This string is rendered verbatim.
    pub fn message_for(&self, key: &FieldKey) -> Option<String> {
        let messages: Vec<String> =
            self.errors_for(key).iter().map(AppError::message).collect();
        if messages.is_empty() {
            None
        } else {
            Some(messages.join(MESSAGE_SEPARATOR))
        }
    }

    /// Keys that currently have at least one error.
    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.values
            .iter()
            .filter(|(_, errors)| !errors.is_empty())
            .map(|(key, _)| key)
    }

    /// `true` if no key has any error.
    pub fn is_empty(&self) -> bool {
        self.keys().next().is_none()
    }
}

// ---------------------------------------------------------------------------
// ErrorStore
// ---------------------------------------------------------------------------

/// Holder of the current [`FormErrors`] snapshot.
///
/// This is the only legal mutation path for form errors: every change is
/// a function from the previous snapshot to a new one, applied while the
/// lock is held, then published as a fresh `Arc`. Readers clone the `Arc`
/// and keep a consistent view for as long as they like.
#[derive(Debug, Default)]
pub struct ErrorStore {
    current: Mutex<Arc<FormErrors>>,
}

impl ErrorStore {
    /// A store holding an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot with `transform(previous)` and returns the
    /// newly published snapshot.
    pub fn update(
        &self,
        transform: impl FnOnce(&FormErrors) -> FormErrors,
    ) -> Arc<FormErrors> {
        // A panic inside a previous transform can't leave a half-written
        // snapshot behind (we only ever store whole `Arc`s), so a poisoned
        // lock still guards consistent data.
        let mut guard =
            self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let previous: &FormErrors = &guard;
        let next = Arc::new(transform(previous));
        *guard = Arc::clone(&next);
        next
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<FormErrors> {
        let guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Empties `key`'s list.
    pub fn clear(&self, key: &FieldKey) {
        self.update(|prev| prev.cleared(key));
    }

    /// Appends `errors` to `key`'s list.
    pub fn append(
        &self,
        key: FieldKey,
        errors: impl IntoIterator<Item = AppError>,
    ) {
        self.update(|prev| prev.appended(key, errors));
    }

    /// Rendered messages for `key` in the current snapshot.
    pub fn message_for(&self, key: &FieldKey) -> Option<String> {
        self.snapshot().message_for(key)
    }
}
