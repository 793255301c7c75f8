//! Error taxonomy for tree operations.
//!
//! Four families share one flat enum:
//!
//! - lookup errors: a requested name, path, index, or key is absent.
//!   Recoverable by the caller; a transport layer maps these to its own
//!   "no such parameter" codes. Classified by [`Error::is_lookup`].
//! - caller errors: malformed input (empty path segment, index containing
//!   a dot), rejected before any mutation.
//! - schema errors: structural defects found by validation. Always carry
//!   the full dotted path of the offending node. Classified by
//!   [`Error::is_schema`] and treated as configuration bugs, not runtime
//!   conditions.
//! - capability errors: a collection exists but cannot perform the
//!   requested operation (`NotAddable`, `NotImplemented`).

use thiserror::Error;

use crate::path::Path;

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by tree operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no such export: {0}")]
    NoSuchExport(String),

    #[error("no such path: {0}")]
    NoSuchPath(String),

    #[error("no such member: {name}.{index}")]
    NoSuchMember { name: String, index: String },

    #[error("no such key {key:?} in {label}")]
    NoSuchKey { label: String, key: String },

    #[error("not an exported scalar: {0}")]
    NotAScalar(String),

    #[error("not an exported collection: {0}")]
    NotACollection(String),

    #[error("invalid path {0:?}: empty segment")]
    InvalidPath(String),

    #[error("invalid index {0:?}: must not contain '.'")]
    InvalidIndex(String),

    #[error("{0} is exported but does not exist")]
    MissingExport(Path),

    #[error("{0} is a type; instantiate it")]
    NotInstantiated(Path),

    #[error("{0} is declared in more than one registry")]
    DuplicateExport(Path),

    #[error("{0} is a collection but cannot be iterated")]
    NotIterable(Path),

    #[error("collection {0} has no member constructor")]
    NotAddable(String),

    #[error("{label} does not implement {operation}")]
    NotImplemented {
        label: String,
        operation: &'static str,
    },
}

impl Error {
    /// True for errors meaning "the requested thing is not there".
    ///
    /// `KeyedCollection::contains` converts exactly these to `false`;
    /// everything else propagates.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            Error::NoSuchExport(_)
                | Error::NoSuchPath(_)
                | Error::NoSuchMember { .. }
                | Error::NoSuchKey { .. }
                | Error::NotAScalar(_)
                | Error::NotACollection(_)
        )
    }

    /// True for structural defects reported by validation.
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            Error::MissingExport(_)
                | Error::NotInstantiated(_)
                | Error::DuplicateExport(_)
                | Error::NotIterable(_)
        )
    }
}
