//! In-memory document store used as a fixture by traversal and operation
//! tests. Folder handles are canonical remote paths; listings come back in
//! name order.

use crate::path;
use crate::store::{DocumentStore, FileEntry, FolderEntry, StoreError};
use std::cell::RefCell;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Node {
    folders: BTreeMap<String, Node>,
    files: BTreeMap<String, Vec<u8>>,
}

impl Node {
    fn descend(&self, segments: &[&str]) -> Option<&Node> {
        let mut node = self;
        for segment in segments {
            node = node.folders.get(*segment)?;
        }
        Some(node)
    }

    fn descend_mut(&mut self, segments: &[&str]) -> Option<&mut Node> {
        let mut node = self;
        for segment in segments {
            node = node.folders.get_mut(*segment)?;
        }
        Some(node)
    }
}

#[derive(Debug, Default)]
pub struct MemStore {
    root: RefCell<Node>,
    broken: RefCell<Option<String>>,
    stalled: RefCell<Option<String>>,
    resolve_log: RefCell<Vec<String>>,
}

impl MemStore {
    pub fn new() -> MemStore {
        MemStore::default()
    }

    pub fn add_folder(&self, folder_path: &str) {
        let mut root = self.root.borrow_mut();
        let mut node = &mut *root;
        for segment in path::segments(folder_path) {
            node = node.folders.entry(segment.to_owned()).or_default();
        }
    }

    pub fn add_file(&self, file_path: &str, bytes: &[u8]) {
        let segments = path::segments(file_path);
        let (name, folders) = segments.split_last().unwrap();
        let mut root = self.root.borrow_mut();
        let mut node = &mut *root;
        for segment in folders {
            node = node.folders.entry((*segment).to_owned()).or_default();
        }
        node.files.insert((*name).to_owned(), bytes.to_vec());
    }

    /// Makes every listing of the folder at `folder_path` fail with a
    /// transport error.
    pub fn break_folder(&self, folder_path: &str) {
        *self.broken.borrow_mut() = Some(folder_path.to_owned());
    }

    /// Makes every round trip touching the folder at `folder_path` fail
    /// with a timeout.
    pub fn stall_folder(&self, folder_path: &str) {
        *self.stalled.borrow_mut() = Some(folder_path.to_owned());
    }

    /// Relative paths handed to `resolve_path` so far, in call order.
    pub fn resolve_log(&self) -> Vec<String> {
        self.resolve_log.borrow().clone()
    }

    pub fn file_content(&self, file_path: &str) -> Option<Vec<u8>> {
        let segments = path::segments(file_path);
        let (name, folders) = segments.split_last()?;
        let root = self.root.borrow();
        let node = root.descend(folders)?;
        node.files.get(*name).cloned()
    }

    fn check_broken(&self, folder: &str) -> Result<(), StoreError> {
        if self.broken.borrow().as_deref() == Some(folder) {
            return Err(StoreError::Transport(format!(
                "injected failure at '{}'",
                folder
            )));
        }
        if self.stalled.borrow().as_deref() == Some(folder) {
            return Err(StoreError::Timeout(folder.to_owned()));
        }
        Ok(())
    }

    fn with_node<R>(
        &self,
        folder: &str,
        action: impl FnOnce(&Node) -> R,
    ) -> Result<R, StoreError> {
        let root = self.root.borrow();
        match root.descend(&path::segments(folder)) {
            Some(node) => Ok(action(node)),
            None => Err(StoreError::NotFound(folder.to_owned())),
        }
    }
}

impl DocumentStore for MemStore {
    type Folder = String;

    fn root(&self) -> String {
        String::new()
    }

    fn list_files(&self, folder: &String) -> Result<Vec<FileEntry>, StoreError> {
        self.check_broken(folder)?;
        self.with_node(folder, |node| {
            node.files
                .keys()
                .map(|name| FileEntry {
                    name: name.clone(),
                    remote_path: path::join(folder, name),
                })
                .collect()
        })
    }

    fn list_folders(
        &self,
        folder: &String,
    ) -> Result<Vec<FolderEntry<String>>, StoreError> {
        self.check_broken(folder)?;
        self.with_node(folder, |node| {
            node.folders
                .keys()
                .map(|name| {
                    let remote_path = path::join(folder, name);
                    FolderEntry {
                        name: name.clone(),
                        handle: remote_path.clone(),
                        remote_path,
                    }
                })
                .collect()
        })
    }

    fn resolve_path(&self, base: &String, relative: &str) -> Result<String, StoreError> {
        self.resolve_log.borrow_mut().push(relative.to_owned());
        let resolved = path::normalize(&path::join(base, relative));
        self.check_broken(&resolved)?;
        self.with_node(&resolved, |_| ())?;
        Ok(resolved)
    }

    fn create_folder(&self, parent: &String, name: &str) -> Result<String, StoreError> {
        let mut root = self.root.borrow_mut();
        let segments = path::segments(parent);
        match root.descend_mut(&segments) {
            Some(node) => {
                node.folders.entry(name.to_owned()).or_default();
                Ok(path::join(parent, name))
            }
            None => Err(StoreError::NotFound(parent.clone())),
        }
    }

    fn read_file(&self, remote_path: &str) -> Result<Vec<u8>, StoreError> {
        self.file_content(remote_path)
            .ok_or_else(|| StoreError::NotFound(remote_path.to_owned()))
    }

    fn write_file(
        &self,
        folder: &String,
        name: &str,
        bytes: &[u8],
    ) -> Result<(), StoreError> {
        let mut root = self.root.borrow_mut();
        let segments = path::segments(folder);
        match root.descend_mut(&segments) {
            Some(node) => {
                node.files.insert(name.to_owned(), bytes.to_vec());
                Ok(())
            }
            None => Err(StoreError::NotFound(folder.clone())),
        }
    }
}
