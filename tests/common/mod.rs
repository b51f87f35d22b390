#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pathwatch::fs::MockStorage;
use pathwatch::{observer_fn, Observer, RegistryOptions, WatchRegistry};

pub use pathwatch_test_utils::{
    eventually, init_tracing, settle, with_timeout, FakeNotifierFactory, RecordingObserver,
};

/// A registry wired to a fake notifier and in-memory storage, with handles
/// on both so tests can drive and inspect them.
pub struct Harness {
    pub registry: WatchRegistry,
    pub notifier: FakeNotifierFactory,
    pub storage: MockStorage,
    flushes: AtomicUsize,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_options(RegistryOptions::default())
    }

    pub fn with_options(options: RegistryOptions) -> Self {
        let notifier = FakeNotifierFactory::new();
        let storage = MockStorage::new();
        let registry = WatchRegistry::with_backends(
            Arc::new(notifier.clone()),
            Arc::new(storage.clone()),
            options,
        );
        Self {
            registry,
            notifier,
            storage,
            flushes: AtomicUsize::new(0),
        }
    }

    /// Subscribe to a path nobody watches yet and wait until the loop has
    /// registered it with the notifier.
    pub async fn subscribe_new(&self, path: &str, observer: Arc<dyn Observer>) {
        let before = self.notifier.watch_calls(path);
        self.registry
            .subscribe(path, observer)
            .await
            .expect("subscribe failed");
        eventually("path to be watched", || {
            self.notifier.watch_calls(path) > before
        })
        .await;
    }

    /// Unsubscribe and wait until the loop has released the watch.
    pub async fn unsubscribe_and_wait(&self, path: &str) {
        let before = self.notifier.unwatch_calls(path);
        self.registry.unsubscribe(path).await;
        eventually("path to be unwatched", || {
            self.notifier.unwatch_calls(path) > before
        })
        .await;
    }

    /// Wait until every add request queued so far has been processed.
    ///
    /// Adds are FIFO, so once a fresh sentinel path shows up at the notifier
    /// everything queued before it has been applied. The sentinel stays
    /// subscribed.
    pub async fn flush_adds(&self) {
        let n = self.flushes.fetch_add(1, Ordering::SeqCst);
        let sentinel = format!("/__flush/{n}");
        self.subscribe_new(&sentinel, observer_fn(|_, _| {})).await;
    }
}
