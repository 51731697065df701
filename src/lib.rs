//! Wildcard search, download and upload engine for remote hierarchical
//! document stores.
//!
//! The store is a tree of folders and files addressed by slash-separated
//! paths. Search expressions may contain `*` and `?` wildcards at any
//! depth of the path, e.g. `Reports/2023-*/Q?/summary.docx`. Features:
//! - path patterns are split into snippets: runs of literal segments
//!   resolved in one remote lookup each, and wildcard segments resolved
//!   by enumerating and matching children;
//! - recursive search scans the whole subtree once the terminal snippet
//!   is reached;
//! - downloads reachable through several branches of one request are
//!   transferred exactly once.
//!
//! The concrete store client (session establishment, wire protocol) is a
//! collaborator behind the `DocumentStore` trait; this crate only drives
//! the traversal and transfers.

pub mod cancel;
pub mod error;
pub mod find;
pub mod glob;
pub mod ops;
pub mod path;
pub mod snippet;
pub mod store;
pub mod tracker;

#[cfg(test)]
mod memstore;

pub use crate::cancel::CancelToken;
pub use crate::error::{BranchFailure, Error, ItemError};
pub use crate::find::{find, Visitor};
pub use crate::ops::{
    download, search, upload, DownloadItem, DownloadOutcome, Match,
    SearchOutcome, Transfer, UploadItem, UploadOutcome,
};
pub use crate::snippet::{split_into_snippets, FolderSnippet};
pub use crate::store::{DocumentStore, FileEntry, FolderEntry, StoreError};
pub use crate::tracker::DownloadTracker;
