use crate::store::StoreError;
use std::fmt::{Display, Formatter};

/// An error type for failures of a whole search, download or upload request.
#[derive(Debug)]
pub enum Error {
    /// Malformed wildcard usage in a path pattern. Raised during pattern
    /// compilation, before any remote round trip.
    UnsupportedPattern(String),
    /// The remote store failed during a traversal round trip.
    Store(StoreError),
    /// The request was interrupted through its `CancelToken`.
    Cancelled,
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(error) => Some(error),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        match self {
            Error::UnsupportedPattern(pattern) => {
                write!(fmt, "unsupported path pattern: {}", pattern)
            }
            Error::Store(error) => write!(fmt, "remote store error: {}", error),
            Error::Cancelled => write!(fmt, "request was cancelled"),
        }
    }
}

impl From<StoreError> for Error {
    fn from(error: StoreError) -> Error {
        Error::Store(error)
    }
}

/// A literal path component that did not resolve to an existing remote
/// folder. The branch was abandoned while the rest of the traversal
/// continued.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchFailure {
    /// Remote path of the folder the lookup was issued from.
    pub base: String,
    /// The literal sub-path that did not resolve.
    pub part: String,
}

impl Display for BranchFailure {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        if self.base.is_empty() {
            write!(fmt, "folder '{}' not found", self.part)
        } else {
            write!(fmt, "folder '{}' not found under '{}'", self.part, self.base)
        }
    }
}

/// An error of a single transferred item within a download or upload
/// request. Item errors never abort sibling items.
#[derive(Debug)]
pub enum ItemError {
    /// Reading or writing a local file failed.
    LocalIo(std::io::Error),
    /// The remote store failed while transferring this item.
    Store(StoreError),
}

impl std::error::Error for ItemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ItemError::LocalIo(error) => Some(error),
            ItemError::Store(error) => Some(error),
        }
    }
}

impl Display for ItemError {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        match self {
            ItemError::LocalIo(error) => write!(fmt, "local i/o error: {}", error),
            ItemError::Store(error) => write!(fmt, "remote store error: {}", error),
        }
    }
}
