// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory filesystem.
///
/// Directories exist implicitly as ancestors of added files, or explicitly
/// via [`MockFileSystem::add_dir`]. Clones share the same storage, so a
/// test can keep a handle and inspect what a flow wrote.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    dirs: Arc<Mutex<BTreeSet<PathBuf>>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.files.lock().unwrap().insert(path, content.into());
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut dirs = self.dirs.lock().unwrap();
        for ancestor in path.as_ref().ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }

    /// Make every subsequent `write` fail, to exercise internal-error paths.
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    /// Paths of all files currently stored, sorted.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }
}

impl FileSystem for MockFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(content) => Ok(content.clone()),
            None if self.is_dir(path) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(anyhow!("write refused by mock: {:?}", path));
        }
        self.add_file(path, contents);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().contains(path)
    }
}
