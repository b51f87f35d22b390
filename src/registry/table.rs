// src/registry/table.rs

//! Pure subscription table.
//!
//! Maps each watched path to the observers registered for it, in
//! registration order. It has no channels, no Tokio types and performs no
//! IO; keeping the notifier in sync with it is the event loop's job.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::observer::Observer;

/// Observers registered for one path, in registration order. Duplicates are
/// kept.
pub type ObserverList = Vec<Arc<dyn Observer>>;

#[derive(Default)]
pub struct SubscriptionTable {
    entries: HashMap<PathBuf, ObserverList>,
}

impl SubscriptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Append an observer to an existing entry.
    ///
    /// Returns the observer back if `path` has no entry yet, so the caller can
    /// register the path with the notifier before calling [`Self::insert`].
    pub fn append(
        &mut self,
        path: &Path,
        observer: Arc<dyn Observer>,
    ) -> Result<(), Arc<dyn Observer>> {
        match self.entries.get_mut(path) {
            Some(list) => {
                list.push(observer);
                Ok(())
            }
            None => Err(observer),
        }
    }

    /// Create a single-element entry for a path that is now being watched.
    pub fn insert(&mut self, path: PathBuf, observer: Arc<dyn Observer>) {
        self.entries.entry(path).or_default().push(observer);
    }

    /// Drop a path and all of its observers.
    pub fn remove(&mut self, path: &Path) -> Option<ObserverList> {
        self.entries.remove(path)
    }

    pub fn observers(&self, path: &Path) -> Option<&[Arc<dyn Observer>]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub fn observer_count(&self, path: &Path) -> usize {
        self.entries.get(path).map_or(0, Vec::len)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for SubscriptionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(path, list)| (path, list.len())))
            .finish()
    }
}
