//! Error types raised while driving views.
//!
//! Building a view never fails. Errors only surface from the operations that
//! actually pull elements out of a source (push/pull iteration, `get`,
//! realization and the eager consumers built on top of them).

use thiserror::Error;

use crate::String;

/// Error raised while driving a view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An entries view met an element that is neither a hole nor a
    /// two-element indexed pair.
    #[error("expected [K, V] tuple: {entry}")]
    MalformedEntry { entry: String },
}

impl Error {
    pub(crate) fn malformed_entry(entry: &crate::Value) -> Self {
        Error::MalformedEntry {
            entry: crate::format!("{entry:?}"),
        }
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
