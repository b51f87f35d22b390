// src/registry/mod.rs

//! Path subscription registry.
//!
//! A [`WatchRegistry`] multiplexes one underlying notifier across any number
//! of (path, observer) subscriptions:
//! - the pure path -> observers mapping lives in [`table`],
//! - the task that owns it and the notifier lives in [`event_loop`],
//! - per-observer delivery lives in [`dispatch`].
//!
//! The loop is started lazily by the first `subscribe` and retires itself
//! (closing the notifier) once its last path is removed. The next
//! `subscribe` starts a fresh loop with a fresh notifier.

pub mod dispatch;
pub mod event_loop;
pub mod observer;
pub mod table;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc::error::SendError;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info, warn};

use crate::config::ConfigFile;
use crate::errors::{PathwatchError, Result};
use crate::fs::{LocalStorage, Storage};
use crate::notifier::{NotifierFactory, NotifierParts, NotifyFactory};

use dispatch::Dispatcher;
use event_loop::{AddRequest, EventLoop, LoopHandle, LoopSetup, RemoveRequest};

pub use observer::{observer_fn, FnObserver, Observer};
pub use table::{ObserverList, SubscriptionTable};

/// Whether a registry currently has a running event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopLifecycle {
    NotRunning,
    Running,
}

/// Tunables for a [`WatchRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Capacity of each request queue into the event loop (>= 1). Callers
    /// still wait for the loop to take their request; this only bounds how
    /// many callers can be queued at once.
    pub request_buffer: usize,
    /// Optional cap on concurrently running observer notifications.
    pub max_concurrent_dispatch: Option<usize>,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            request_buffer: 1,
            max_concurrent_dispatch: None,
        }
    }
}

impl RegistryOptions {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            request_buffer: cfg.registry.request_buffer,
            max_concurrent_dispatch: cfg.registry.max_concurrent_dispatch,
        }
    }
}

/// Shared between the registry and its current event loop.
///
/// Callers hold it across "start a loop if needed, then hand off the
/// request"; the loop only ever `try_lock`s it when retiring.
#[derive(Debug, Default)]
pub(crate) struct LifecycleSlot {
    handle: Option<LoopHandle>,
    generations: u64,
}

/// Registry of path subscriptions backed by a single notifier.
///
/// Dropping the registry stops its event loop and releases the notifier.
/// Must be used from within a Tokio runtime.
pub struct WatchRegistry {
    factory: Arc<dyn NotifierFactory>,
    storage: Arc<dyn Storage>,
    options: RegistryOptions,
    dispatcher: Dispatcher,
    slot: Arc<Mutex<LifecycleSlot>>,
}

impl fmt::Debug for WatchRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchRegistry")
            .field("factory", &self.factory)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for WatchRegistry {
    fn default() -> Self {
        Self::new(RegistryOptions::default())
    }
}

impl WatchRegistry {
    /// Registry using the platform's recommended `notify` backend and the
    /// local file system.
    pub fn new(options: RegistryOptions) -> Self {
        Self::with_backends(
            Arc::new(NotifyFactory::default()),
            Arc::new(LocalStorage),
            options,
        )
    }

    /// Registry configured from a validated config file.
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self::with_backends(
            Arc::new(NotifyFactory::from_config(cfg)),
            Arc::new(LocalStorage),
            RegistryOptions::from_config(cfg),
        )
    }

    /// Registry with injected collaborators (used by tests).
    pub fn with_backends(
        factory: Arc<dyn NotifierFactory>,
        storage: Arc<dyn Storage>,
        options: RegistryOptions,
    ) -> Self {
        Self {
            factory,
            storage,
            dispatcher: Dispatcher::from_limit(options.max_concurrent_dispatch),
            options,
            slot: Arc::new(Mutex::new(LifecycleSlot::default())),
        }
    }

    /// Register `observer` for changes to `path`.
    ///
    /// Starts the event loop (and creates the notifier) if none is running;
    /// that creation is the only failure reported here. Returns once the loop
    /// has taken the request, so a later `unsubscribe` from the same caller
    /// is always applied after it. Whether the path could actually be
    /// watched is not reported.
    pub async fn subscribe(
        &self,
        path: impl Into<PathBuf>,
        observer: Arc<dyn Observer>,
    ) -> Result<()> {
        let path = path.into();
        let (taken, taken_rx) = oneshot::channel();

        {
            let mut slot = self.slot.lock().await;

            let handle = match slot.handle.take() {
                Some(handle) if handle.is_open() => handle,
                _ => self.start_loop(&mut slot)?,
            };

            debug!(?path, generation = handle.generation, "queueing subscription");
            let request = AddRequest {
                path,
                observer,
                taken,
            };
            if let Err(SendError(request)) = handle.add_tx.send(request).await {
                warn!(path = ?request.path, "watch event loop vanished before subscription was delivered");
                return Err(PathwatchError::LoopStopped);
            }
            slot.handle = Some(handle);
        }

        taken_rx.await.map_err(|_| PathwatchError::LoopStopped)
    }

    /// Drop every observer registered for `path`.
    ///
    /// A no-op when nothing is running; unknown paths are ignored by the loop.
    /// Like [`Self::subscribe`], returns once the loop has taken the request.
    pub async fn unsubscribe(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let (taken, taken_rx) = oneshot::channel();

        {
            let slot = self.slot.lock().await;

            let Some(handle) = slot.handle.as_ref().filter(|h| h.is_open()) else {
                debug!(?path, "no watch event loop running; nothing to unsubscribe");
                return;
            };

            debug!(?path, generation = handle.generation, "queueing unsubscribe");
            let request = RemoveRequest { path, taken };
            if let Err(SendError(request)) = handle.remove_tx.send(request).await {
                debug!(path = ?request.path, "watch event loop stopped before unsubscribe was delivered");
                return;
            }
        }

        if taken_rx.await.is_err() {
            debug!("watch event loop stopped before taking the unsubscribe");
        }
    }

    pub async fn lifecycle(&self) -> LoopLifecycle {
        let slot = self.slot.lock().await;
        if slot.handle.as_ref().is_some_and(LoopHandle::is_open) {
            LoopLifecycle::Running
        } else {
            LoopLifecycle::NotRunning
        }
    }

    pub async fn is_running(&self) -> bool {
        self.lifecycle().await == LoopLifecycle::Running
    }

    /// Number of event loops this registry has started so far.
    pub async fn generations(&self) -> u64 {
        self.slot.lock().await.generations
    }

    fn start_loop(&self, slot: &mut LifecycleSlot) -> Result<LoopHandle> {
        let NotifierParts { notifier, streams } = self.factory.create()?;

        slot.generations += 1;
        let generation = slot.generations;

        let (event_loop, handle) = EventLoop::new(LoopSetup {
            generation,
            notifier,
            streams,
            request_buffer: self.options.request_buffer.max(1),
            storage: Arc::clone(&self.storage),
            dispatcher: self.dispatcher.clone(),
            slot: Arc::downgrade(&self.slot),
        });
        tokio::spawn(event_loop.run());

        info!(generation, "spawned watch event loop");
        Ok(handle)
    }
}
