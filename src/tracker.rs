//! Deduplication of file transfers within one download request.

use crate::path;
use std::collections::HashSet;

/// Set of canonical remote paths already transferred. Scoped to one
/// top-level download request; grows monotonically and is discarded with
/// the request. Overlapping patterns and recursive expansions can reach
/// the same file through several branches; only the first sighting pays
/// for a transfer.
#[derive(Debug, Default)]
pub struct DownloadTracker {
    seen: HashSet<String>,
}

impl DownloadTracker {
    pub fn new() -> DownloadTracker {
        DownloadTracker::default()
    }

    /// Runs `action` and returns `Ok(true)` on the first sighting of
    /// `remote_path`; a repeat sighting returns `Ok(false)` without
    /// running the action.
    pub fn note_and_maybe_download<E, A>(
        &mut self,
        remote_path: &str,
        action: A,
    ) -> Result<bool, E>
    where
        A: FnOnce() -> Result<(), E>,
    {
        let canonical = path::normalize(remote_path);
        if !self.seen.insert(canonical) {
            return Ok(false);
        }

        action()?;
        Ok(true)
    }
}
