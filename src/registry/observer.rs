// src/registry/observer.rs

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::types::ChangeMask;

/// Receives change notifications for the paths it was subscribed to.
///
/// `notify` runs on tokio's blocking pool, one call per (event, observer)
/// pair, so implementations may block without stalling the registry. Calls
/// for the same observer may overlap.
pub trait Observer: Send + Sync + 'static {
    fn notify(&self, path: &Path, mask: ChangeMask);
}

/// Wraps a plain callback as an [`Observer`].
pub struct FnObserver<F> {
    callback: F,
}

impl<F> FnObserver<F>
where
    F: Fn(&Path, ChangeMask) + Send + Sync + 'static,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> Observer for FnObserver<F>
where
    F: Fn(&Path, ChangeMask) + Send + Sync + 'static,
{
    fn notify(&self, path: &Path, mask: ChangeMask) {
        (self.callback)(path, mask)
    }
}

impl<F> fmt::Debug for FnObserver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObserver").finish_non_exhaustive()
    }
}

/// Convenience: wrap a callback into a shareable observer.
pub fn observer_fn<F>(callback: F) -> Arc<dyn Observer>
where
    F: Fn(&Path, ChangeMask) + Send + Sync + 'static,
{
    Arc::new(FnObserver::new(callback))
}
