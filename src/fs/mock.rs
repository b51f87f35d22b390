// src/fs/mock.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::Storage;

/// In-memory storage for tests: a path exists iff it has been added and not
/// removed since. Clones share the same set.
#[derive(Debug, Clone, Default)]
pub struct MockStorage {
    paths: Arc<Mutex<HashSet<PathBuf>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_path(&self, path: impl AsRef<Path>) {
        let mut paths = self.paths.lock().unwrap();
        paths.insert(path.as_ref().to_path_buf());
    }

    pub fn remove_path(&self, path: impl AsRef<Path>) {
        let mut paths = self.paths.lock().unwrap();
        paths.remove(path.as_ref());
    }
}

impl Storage for MockStorage {
    fn exists(&self, path: &Path) -> bool {
        let paths = self.paths.lock().unwrap();
        paths.contains(path)
    }
}
