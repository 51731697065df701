//! Recursive descent over a remote folder tree guided by a snippet
//! sequence.
//!
//! The engine is a state machine indexed by the position in the snippet
//! sequence:
//! - literal non-terminal: one direct lookup for the whole folder part;
//! - wildcard non-terminal: enumerate subfolders, descend into matches;
//! - terminal: match immediate files and folders, and when `recursive` is
//!   set re-enter the terminal state in every immediate subfolder.
//!
//! A literal lookup that fails with "not found" abandons only its own
//! branch; the failure is recorded and sibling branches continue.

use crate::cancel::CancelToken;
use crate::error::{BranchFailure, Error};
use crate::path;
use crate::snippet::FolderSnippet;
use crate::store::{DocumentStore, FileEntry, FolderEntry};
use log::warn;

/// Receives matched folders and files during one traversal.
pub trait Visitor<F> {
    fn on_folder(&mut self, entry: &FolderEntry<F>);
    fn on_file(&mut self, file: &FileEntry);
}

/// Walks the tree below `folder` according to `snippets[index..]`,
/// invoking the visitor for every match. `folder_path` is the canonical
/// remote path of `folder`, used for failure reporting and for deriving
/// the paths of resolved literal runs.
pub fn find<S, V>(
    store: &S,
    folder: &S::Folder,
    folder_path: &str,
    snippets: &[FolderSnippet],
    index: usize,
    recursive: bool,
    cancel: &CancelToken,
    visitor: &mut V,
    failures: &mut Vec<BranchFailure>,
) -> Result<(), Error>
where
    S: DocumentStore,
    V: Visitor<S::Folder>,
{
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let snippet = &snippets[index];

    if index + 1 == snippets.len() {
        return find_terminal(
            store, folder, snippets, index, recursive, cancel, visitor, failures,
        );
    }

    if snippet.uses_regex() {
        // Non-matching subfolders are pruned here regardless of the
        // `recursive` flag; recursion only changes the terminal state.
        for entry in store.list_folders(folder)? {
            if snippet.matches(&entry.name) {
                find(
                    store,
                    &entry.handle,
                    &entry.remote_path,
                    snippets,
                    index + 1,
                    recursive,
                    cancel,
                    visitor,
                    failures,
                )?;
            }
        }
        return Ok(());
    }

    // A run of literal segments costs one round trip for the whole part.
    let part = snippet.folder_part();
    match store.resolve_path(folder, &part) {
        Ok(resolved) => {
            let resolved_path = path::join(folder_path, &part);
            find(
                store,
                &resolved,
                &resolved_path,
                snippets,
                index + 1,
                recursive,
                cancel,
                visitor,
                failures,
            )?;
        }
        Err(error) if error.is_not_found() => {
            warn!("folder '{}' not found under '{}'", part, folder_path);
            failures.push(BranchFailure {
                base: folder_path.to_owned(),
                part,
            });
        }
        Err(error) => return Err(Error::Store(error)),
    }

    Ok(())
}

/// Terminal state: the last snippet is the only one matched against files
/// as well as folders.
fn find_terminal<S, V>(
    store: &S,
    folder: &S::Folder,
    snippets: &[FolderSnippet],
    index: usize,
    recursive: bool,
    cancel: &CancelToken,
    visitor: &mut V,
    failures: &mut Vec<BranchFailure>,
) -> Result<(), Error>
where
    S: DocumentStore,
    V: Visitor<S::Folder>,
{
    let snippet = &snippets[index];

    for file in store.list_files(folder)? {
        if snippet.matches(&file.name) {
            visitor.on_file(&file);
        }
    }

    for entry in store.list_folders(folder)? {
        if snippet.matches(&entry.name) {
            visitor.on_folder(&entry);
        }
        if recursive {
            // Scan the whole subtree: descend into every subfolder, not
            // just the matching ones, staying in the terminal state.
            find(
                store,
                &entry.handle,
                &entry.remote_path,
                snippets,
                index,
                recursive,
                cancel,
                visitor,
                failures,
            )?;
        }
    }

    Ok(())
}
