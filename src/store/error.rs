//! Store failure type.

use std::sync::PoisonError;

use derive_more::{Display, Error};
use tracing::instrument;

/// A read or write the store could not complete.
///
/// Callers treat every store error as transient: selection degrades to the
/// local snapshot, result lookups count as "no result", and a failed result
/// write leaves the solved view in place. The location is where the error
/// was raised inside the store.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// What the store was doing and why it failed.
    pub message: String,
    /// Line that raised the error.
    pub line: u32,
    /// Source file that raised the error.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a store error located at the caller.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// The backend refused the request outright.
    #[track_caller]
    pub fn unavailable(backend: &str) -> Self {
        Self::new(format!("{} store unavailable", backend))
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("Query failed: {}", err))
    }
}

impl From<diesel::ConnectionError> for StoreError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Could not open database: {}", err))
    }
}

impl<T> From<PoisonError<T>> for StoreError {
    #[track_caller]
    fn from(_: PoisonError<T>) -> Self {
        Self::new("Store lock poisoned by a panicked writer")
    }
}
