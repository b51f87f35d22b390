use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use pathwatch::{ChangeMask, Observer};

/// An observer that records every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    seen: Mutex<Vec<(PathBuf, ChangeMask)>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notifications(&self) -> Vec<(PathBuf, ChangeMask)> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Number of notifications for `path` whose mask contains `flag`.
    pub fn count_with(&self, path: impl AsRef<Path>, flag: ChangeMask) -> usize {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, mask)| p == path.as_ref() && mask.contains(flag))
            .count()
    }
}

impl Observer for RecordingObserver {
    fn notify(&self, path: &Path, mask: ChangeMask) {
        self.seen.lock().unwrap().push((path.to_path_buf(), mask));
    }
}
