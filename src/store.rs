//! Remote document store abstraction consumed by the traversal engine.
//!
//! The concrete client (session establishment, wire protocol, retries) is
//! out of scope; it implements `DocumentStore` and maps its failures onto
//! `StoreError`.

use std::fmt::{Display, Formatter};

/// An immediate file of a remote folder.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    /// Visible file name, the part matched against terminal snippets.
    pub name: String,
    /// Canonical remote path of the file.
    pub remote_path: String,
}

/// An immediate subfolder of a remote folder.
#[derive(Debug, Clone)]
pub struct FolderEntry<F> {
    /// Visible folder name, the part matched against snippets.
    pub name: String,
    /// Canonical remote path of the folder.
    pub remote_path: String,
    /// Store-specific handle used to descend into the folder.
    pub handle: F,
}

/// Minimal contract the traversal engine requires from a remote store.
/// Every method is one blocking round trip; the engine never issues more
/// than one at a time.
pub trait DocumentStore {
    type Folder: Clone;

    /// Handle of the store's root folder.
    fn root(&self) -> Self::Folder;

    /// Immediate files of a folder, in store listing order.
    fn list_files(&self, folder: &Self::Folder) -> Result<Vec<FileEntry>, StoreError>;

    /// Immediate subfolders of a folder, in store listing order.
    fn list_folders(
        &self,
        folder: &Self::Folder,
    ) -> Result<Vec<FolderEntry<Self::Folder>>, StoreError>;

    /// Resolves a (possibly multi-segment) literal path relative to `base`
    /// in a single round trip. Fails with `StoreError::NotFound` when no
    /// such folder exists.
    fn resolve_path(
        &self,
        base: &Self::Folder,
        relative: &str,
    ) -> Result<Self::Folder, StoreError>;

    /// Creates an immediate subfolder, returning the existing one if a
    /// folder of that name is already present.
    fn create_folder(
        &self,
        parent: &Self::Folder,
        name: &str,
    ) -> Result<Self::Folder, StoreError>;

    /// Reads the full contents of a remote file.
    fn read_file(&self, remote_path: &str) -> Result<Vec<u8>, StoreError>;

    /// Creates or replaces a file in a folder.
    fn write_file(
        &self,
        folder: &Self::Folder,
        name: &str,
        bytes: &[u8],
    ) -> Result<(), StoreError>;
}

/// An error type for failures of a single remote round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No folder or file exists under the requested path.
    NotFound(String),
    /// The round trip did not complete within the caller-supplied deadline.
    Timeout(String),
    /// Any other failure of the remote store, e.g. network loss, expired
    /// auth or throttling.
    Transport(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl Display for StoreError {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        match self {
            StoreError::NotFound(path) => write!(fmt, "'{}' not found", path),
            StoreError::Timeout(path) => {
                write!(fmt, "round trip for '{}' timed out", path)
            }
            StoreError::Transport(message) => {
                write!(fmt, "transport failure: {}", message)
            }
        }
    }
}
