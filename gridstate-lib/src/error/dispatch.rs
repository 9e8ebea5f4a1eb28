//! Dispatch error types

use crate::slice::SliceName;

/// Failure raised by a fallible updater function.
///
/// An updater that cannot compute the next value returns this instead of a
/// value. The dispatcher propagates it and leaves the slice untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct UpdaterError {
    /// Error message.
    pub message: String,
}

impl UpdaterError {
    /// Creates a new updater error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for UpdaterError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for UpdaterError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Errors returned from a slice dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The updater function failed; the slice value is unchanged.
    #[error("updater for `{slice}` failed: {source}")]
    Updater {
        /// Slice the dispatch targeted.
        slice: SliceName,
        /// Error raised by the updater.
        #[source]
        source: UpdaterError,
    },

    /// A dynamically typed value was routed to a slice of another type.
    #[error("value for `{found}` cannot be dispatched to `{expected}`")]
    SliceMismatch {
        /// Slice the dispatcher belongs to.
        expected: SliceName,
        /// Slice the value was tagged with.
        found: SliceName,
    },
}

impl DispatchError {
    /// Returns the slice the failed dispatch targeted.
    pub fn slice(&self) -> SliceName {
        match self {
            Self::Updater { slice, .. } => *slice,
            Self::SliceMismatch { expected, .. } => *expected,
        }
    }

    /// Returns the updater error if the updater itself failed.
    pub fn updater_error(&self) -> Option<&UpdaterError> {
        match self {
            Self::Updater { source, .. } => Some(source),
            _ => None,
        }
    }
}
