//! Top-level search, download and upload requests.
//!
//! Every request is synchronous and depth-first: at most one remote round
//! trip is outstanding at any time. A request returns its matches or
//! transferred items together with the branch-level failures collected
//! along the way, so one missing path component never hides the results
//! of other branches or sites.

use crate::cancel::CancelToken;
use crate::error::{BranchFailure, Error, ItemError};
use crate::find::{find, Visitor};
use crate::glob;
use crate::path;
use crate::snippet::{split_into_snippets, FolderSnippet};
use crate::store::{DocumentStore, FileEntry, FolderEntry};
use crate::tracker::DownloadTracker;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// One matched item of a search request.
#[derive(Debug, Clone, PartialEq)]
pub enum Match {
    Folder { name: String, remote_path: String },
    File { name: String, remote_path: String },
}

/// Result of one search request: matches in store listing order, plus the
/// literal branches that were abandoned.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub matches: Vec<Match>,
    pub failures: Vec<BranchFailure>,
}

/// Outcome of one transferred item.
#[derive(Debug)]
pub enum Transfer {
    /// The item was transferred.
    Done,
    /// The file was already transferred through another branch of the same
    /// request; the match is reported but no bytes moved.
    Skipped,
    /// The item failed; siblings are unaffected.
    Failed(ItemError),
}

/// One file of a download request.
#[derive(Debug)]
pub struct DownloadItem {
    pub remote_path: String,
    pub local_path: PathBuf,
    pub outcome: Transfer,
}

#[derive(Debug, Default)]
pub struct DownloadOutcome {
    pub items: Vec<DownloadItem>,
    pub failures: Vec<BranchFailure>,
}

/// One (local file, destination folder) pair of an upload request.
#[derive(Debug)]
pub struct UploadItem {
    pub local_path: PathBuf,
    pub remote_folder: String,
    pub outcome: Transfer,
}

#[derive(Debug, Default)]
pub struct UploadOutcome {
    pub items: Vec<UploadItem>,
    pub failures: Vec<BranchFailure>,
}

/// Finds folders and files matching `pattern` below `start_path`. A fresh
/// call re-walks the tree; an unresolvable start path is reported as a
/// branch failure with zero matches so that other sites of a batch can
/// still be processed.
pub fn search<S: DocumentStore>(
    store: &S,
    start_path: &str,
    pattern: &str,
    recursive: bool,
    cancel: &CancelToken,
) -> Result<SearchOutcome, Error> {
    info!("searching for '{}' under '{}'", pattern, start_path);

    let snippets = split_into_snippets(pattern)?;
    let mut outcome = SearchOutcome::default();

    let (folder, folder_path) =
        match resolve_start(store, start_path, &mut outcome.failures)? {
            Some(start) => start,
            None => return Ok(outcome),
        };

    let mut collector = MatchCollector { matches: vec![] };
    find(
        store,
        &folder,
        &folder_path,
        &snippets,
        0,
        recursive,
        cancel,
        &mut collector,
        &mut outcome.failures,
    )?;

    outcome.matches = collector.matches;
    Ok(outcome)
}

struct MatchCollector {
    matches: Vec<Match>,
}

impl<F> Visitor<F> for MatchCollector {
    fn on_folder(&mut self, entry: &FolderEntry<F>) {
        self.matches.push(Match::Folder {
            name: entry.name.clone(),
            remote_path: entry.remote_path.clone(),
        });
    }

    fn on_file(&mut self, file: &FileEntry) {
        self.matches.push(Match::File {
            name: file.name.clone(),
            remote_path: file.remote_path.clone(),
        });
    }
}

/// Downloads every file matching any of `patterns` below `start_path`
/// into `dest_root`, mirroring the remote folder layout. All patterns of
/// the request share one tracker, so a file reachable through several
/// patterns or branches is transferred exactly once and reported for each
/// sighting.
pub fn download<S: DocumentStore>(
    store: &S,
    start_path: &str,
    patterns: &[&str],
    recursive: bool,
    dest_root: &Path,
    cancel: &CancelToken,
) -> Result<DownloadOutcome, Error> {
    info!(
        "downloading {} pattern(s) under '{}' to '{}'",
        patterns.len(),
        start_path,
        dest_root.display()
    );

    // Compile everything up front so a malformed pattern fails the request
    // before any round trip.
    let compiled = patterns
        .iter()
        .map(|&pattern| split_into_snippets(pattern))
        .collect::<Result<Vec<Vec<FolderSnippet>>, Error>>()?;

    let mut outcome = DownloadOutcome::default();

    let (folder, folder_path) =
        match resolve_start(store, start_path, &mut outcome.failures)? {
            Some(start) => start,
            None => return Ok(outcome),
        };

    let mut fetcher = FileFetcher {
        store,
        dest_root,
        tracker: DownloadTracker::new(),
        items: vec![],
    };
    for snippets in &compiled {
        find(
            store,
            &folder,
            &folder_path,
            snippets,
            0,
            recursive,
            cancel,
            &mut fetcher,
            &mut outcome.failures,
        )?;
    }

    outcome.items = fetcher.items;
    Ok(outcome)
}

struct FileFetcher<'a, S: DocumentStore> {
    store: &'a S,
    dest_root: &'a Path,
    tracker: DownloadTracker,
    items: Vec<DownloadItem>,
}

impl<'a, S: DocumentStore> Visitor<S::Folder> for FileFetcher<'a, S> {
    fn on_folder(&mut self, _entry: &FolderEntry<S::Folder>) {}

    fn on_file(&mut self, file: &FileEntry) {
        let local_path = local_destination(self.dest_root, &file.remote_path);

        let store = self.store;
        let remote_path = file.remote_path.clone();
        let target = local_path.clone();
        let result = self
            .tracker
            .note_and_maybe_download(&file.remote_path, move || {
                fetch_file(store, &remote_path, &target)
            });

        let outcome = match result {
            Ok(true) => Transfer::Done,
            Ok(false) => {
                debug!("'{}' already transferred, skipping", file.remote_path);
                Transfer::Skipped
            }
            Err(error) => {
                warn!("download of '{}' failed: {}", file.remote_path, error);
                Transfer::Failed(error)
            }
        };

        self.items.push(DownloadItem {
            remote_path: file.remote_path.clone(),
            local_path,
            outcome,
        });
    }
}

fn fetch_file<S: DocumentStore>(
    store: &S,
    remote_path: &str,
    local_path: &Path,
) -> Result<(), ItemError> {
    let bytes = store.read_file(remote_path).map_err(ItemError::Store)?;

    if let Some(parent) = local_path.parent() {
        // Create-if-absent; a concurrent writer may have created it first.
        std::fs::create_dir_all(parent).map_err(ItemError::LocalIo)?;
    }
    std::fs::write(local_path, bytes).map_err(ItemError::LocalIo)?;

    Ok(())
}

/// Maps a canonical remote path to its mirror below the destination root.
fn local_destination(dest_root: &Path, remote_path: &str) -> PathBuf {
    let mut destination = dest_root.to_path_buf();
    let canonical = path::normalize(remote_path);
    for segment in path::segments(&canonical) {
        destination.push(segment);
    }
    destination
}

/// Uploads `local_paths` into every folder matching `dest_pattern`. With
/// `create_missing` the destination must be fully literal and its missing
/// tail is created folder by folder. Each (file, folder) pair yields one
/// item; a failed item never aborts its siblings.
pub fn upload<S: DocumentStore>(
    store: &S,
    dest_pattern: &str,
    local_paths: &[PathBuf],
    create_missing: bool,
    cancel: &CancelToken,
) -> Result<UploadOutcome, Error> {
    info!(
        "uploading {} file(s) to '{}'",
        local_paths.len(),
        dest_pattern
    );

    let mut outcome = UploadOutcome::default();

    let destinations = if create_missing {
        vec![get_or_create_folder(store, dest_pattern, cancel)?]
    } else {
        find_destinations(store, dest_pattern, cancel, &mut outcome.failures)?
    };

    if destinations.is_empty() {
        warn!("no folder matched upload destination '{}'", dest_pattern);
        outcome.failures.push(BranchFailure {
            base: String::new(),
            part: path::unquote(dest_pattern).to_owned(),
        });
        return Ok(outcome);
    }

    for (folder, folder_path) in &destinations {
        for local_path in local_paths {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let outcome_of_item = match upload_file(store, folder, local_path) {
                Ok(()) => Transfer::Done,
                Err(error) => {
                    warn!(
                        "upload of '{}' to '{}' failed: {}",
                        local_path.display(),
                        folder_path,
                        error
                    );
                    Transfer::Failed(error)
                }
            };
            outcome.items.push(UploadItem {
                local_path: local_path.clone(),
                remote_folder: folder_path.clone(),
                outcome: outcome_of_item,
            });
        }
    }

    Ok(outcome)
}

/// Resolves an upload destination pattern to matching folder handles. A
/// wildcard destination may match several folders; an empty destination
/// is the store root.
fn find_destinations<S: DocumentStore>(
    store: &S,
    dest_pattern: &str,
    cancel: &CancelToken,
    failures: &mut Vec<BranchFailure>,
) -> Result<Vec<(S::Folder, String)>, Error> {
    let trimmed = path::unquote(dest_pattern).trim_matches('/');
    if trimmed.is_empty() {
        return Ok(vec![(store.root(), String::new())]);
    }

    let snippets = split_into_snippets(dest_pattern)?;
    let root = store.root();
    let mut collector = FolderCollector { folders: vec![] };
    find(
        store, &root, "", &snippets, 0, false, cancel, &mut collector, failures,
    )?;

    Ok(collector.folders)
}

struct FolderCollector<F> {
    folders: Vec<(F, String)>,
}

impl<F: Clone> Visitor<F> for FolderCollector<F> {
    fn on_folder(&mut self, entry: &FolderEntry<F>) {
        self.folders
            .push((entry.handle.clone(), entry.remote_path.clone()));
    }

    fn on_file(&mut self, _file: &FileEntry) {}
}

/// Walks a fully literal destination path from the root, creating every
/// missing folder on the way.
fn get_or_create_folder<S: DocumentStore>(
    store: &S,
    dest_path: &str,
    cancel: &CancelToken,
) -> Result<(S::Folder, String), Error> {
    let trimmed = path::unquote(dest_path).trim_matches('/');
    if trimmed.is_empty() {
        return Ok((store.root(), String::new()));
    }
    if glob::has_wildcard(trimmed) {
        return Err(Error::UnsupportedPattern(dest_path.to_owned()));
    }

    let mut folder = store.root();
    let mut folder_path = String::new();
    for segment in path::segments(trimmed) {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        folder = match store.resolve_path(&folder, segment) {
            Ok(next) => next,
            Err(error) if error.is_not_found() => {
                debug!("creating folder '{}' under '{}'", segment, folder_path);
                store.create_folder(&folder, segment)?
            }
            Err(error) => return Err(Error::Store(error)),
        };
        folder_path = path::join(&folder_path, segment);
    }

    Ok((folder, folder_path))
}

fn upload_file<S: DocumentStore>(
    store: &S,
    folder: &S::Folder,
    local_path: &Path,
) -> Result<(), ItemError> {
    let name = local_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            ItemError::LocalIo(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid file name: {}", local_path.display()),
            ))
        })?;

    let bytes = std::fs::read(local_path).map_err(ItemError::LocalIo)?;
    store.write_file(folder, name, &bytes).map_err(ItemError::Store)?;

    Ok(())
}

/// Resolves the start folder of a request. A missing start path is
/// recorded as a branch failure and yields `None`, so one bad site never
/// aborts the rest of a batch.
fn resolve_start<S: DocumentStore>(
    store: &S,
    start_path: &str,
    failures: &mut Vec<BranchFailure>,
) -> Result<Option<(S::Folder, String)>, Error> {
    let trimmed = path::unquote(start_path).trim_matches('/');
    if trimmed.is_empty() {
        return Ok(Some((store.root(), String::new())));
    }

    match store.resolve_path(&store.root(), trimmed) {
        Ok(folder) => Ok(Some((folder, trimmed.to_owned()))),
        Err(error) if error.is_not_found() => {
            warn!("start path '{}' not found", trimmed);
            failures.push(BranchFailure {
                base: String::new(),
                part: trimmed.to_owned(),
            });
            Ok(None)
        }
        Err(error) => Err(Error::Store(error)),
    }
}
