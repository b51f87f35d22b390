// src/notifier/notify_backend.rs

use std::fmt::Debug;
use std::path::Path;
use std::time::Duration;

use notify::{Config, Event, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::debug;

use crate::config::ConfigFile;
use crate::errors::{PathwatchError, Result};
use crate::types::NotifierBackendKind;

use super::backend::{stream_pair, Notifier, NotifierFactory, NotifierParts};

/// Default interval for the polling backend.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Production notifier factory backed by `notify`.
#[derive(Debug, Clone)]
pub struct NotifyFactory {
    backend: NotifierBackendKind,
    poll_interval: Duration,
}

impl Default for NotifyFactory {
    fn default() -> Self {
        Self::new(NotifierBackendKind::Recommended, DEFAULT_POLL_INTERVAL)
    }
}

impl NotifyFactory {
    pub fn new(backend: NotifierBackendKind, poll_interval: Duration) -> Self {
        Self {
            backend,
            poll_interval,
        }
    }

    /// Build a factory from the `[notifier]` section.
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self::new(
            cfg.notifier.backend,
            Duration::from_millis(cfg.notifier.poll_interval_ms),
        )
    }

    pub fn backend(&self) -> NotifierBackendKind {
        self.backend
    }
}

impl NotifierFactory for NotifyFactory {
    fn create(&self) -> Result<NotifierParts> {
        let (sinks, streams) = stream_pair();

        // Called synchronously on the backend's thread for every event.
        let handler = move |res: notify::Result<Event>| sinks.forward(res);

        let notifier: Box<dyn Notifier> = match self.backend {
            NotifierBackendKind::Recommended => {
                let watcher = RecommendedWatcher::new(handler, Config::default())
                    .map_err(PathwatchError::NotifierSetup)?;
                Box::new(WatcherNotifier { watcher })
            }
            NotifierBackendKind::Poll => {
                let config = Config::default().with_poll_interval(self.poll_interval);
                let watcher =
                    PollWatcher::new(handler, config).map_err(PathwatchError::NotifierSetup)?;
                Box::new(WatcherNotifier { watcher })
            }
        };

        debug!(backend = ?self.backend, "created notify watcher");
        Ok(NotifierParts { notifier, streams })
    }
}

/// Adapts any `notify::Watcher` to the single-path [`Notifier`] contract.
#[derive(Debug)]
struct WatcherNotifier<W> {
    watcher: W,
}

impl<W> Notifier for WatcherNotifier<W>
where
    W: Watcher + Send + Debug + 'static,
{
    fn watch(&mut self, path: &Path) -> notify::Result<()> {
        self.watcher.watch(path, RecursiveMode::NonRecursive)
    }

    fn unwatch(&mut self, path: &Path) -> notify::Result<()> {
        self.watcher.unwatch(path)
    }

    fn close(self: Box<Self>) {
        // Dropping the watcher stops the backend thread and its callback.
        debug!("closing notify watcher");
        drop(self);
    }
}
