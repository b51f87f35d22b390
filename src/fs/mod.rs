// src/fs/mod.rs

//! Storage probe used by the event loop to tell a real delete apart from a
//! rename/replace cycle that the backend reports as a delete.

use std::fmt::Debug;
use std::path::Path;

pub mod mock;

pub use mock::MockStorage;

/// Abstract storage interface.
pub trait Storage: Send + Sync + Debug {
    /// Whether something currently exists at `path`.
    fn exists(&self, path: &Path) -> bool;
}

/// Implementation that asks the local file system.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl Storage for LocalStorage {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
