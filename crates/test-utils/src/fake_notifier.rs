use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use notify::EventKind;
use pathwatch::errors::{PathwatchError, Result};
use pathwatch::notifier::{
    stream_pair, Notifier, NotifierFactory, NotifierParts, NotifierSinks, RawEvent,
};

#[derive(Debug, Default)]
struct FakeState {
    generation: u64,
    creates: usize,
    closes: usize,
    open: usize,
    max_open: usize,
    fail_create: bool,
    rejected: HashSet<PathBuf>,
    watching: HashSet<PathBuf>,
    watch_calls: Vec<PathBuf>,
    unwatch_calls: Vec<PathBuf>,
    sinks: Option<NotifierSinks>,
}

/// A notifier factory that never touches the file system:
/// - records every create/close and watch/unwatch call,
/// - lets the test inject raw events and errors into the live handle,
/// - can be told to fail creation or to reject specific paths.
///
/// Clones share state, so a test keeps one clone and hands another to the
/// registry.
#[derive(Debug, Clone, Default)]
pub struct FakeNotifierFactory {
    state: Arc<Mutex<FakeState>>,
}

impl FakeNotifierFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.state.lock().unwrap().fail_create = fail;
    }

    /// Make `watch(path)` fail from now on.
    pub fn reject_path(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.rejected.insert(path.as_ref().to_path_buf());
    }

    /// Inject a raw event into the live notifier. Returns `false` when no
    /// notifier is open.
    pub fn emit(&self, path: impl AsRef<Path>, kind: EventKind) -> bool {
        let state = self.state.lock().unwrap();
        match state.sinks.as_ref() {
            Some(sinks) => sinks.send_event(RawEvent::new(path.as_ref(), kind)),
            None => false,
        }
    }

    /// Inject a backend error into the live notifier.
    pub fn emit_error(&self, message: &str) -> bool {
        let state = self.state.lock().unwrap();
        match state.sinks.as_ref() {
            Some(sinks) => sinks.send_error(notify::Error::generic(message)),
            None => false,
        }
    }

    pub fn create_count(&self) -> usize {
        self.state.lock().unwrap().creates
    }

    pub fn close_count(&self) -> usize {
        self.state.lock().unwrap().closes
    }

    /// Highest number of handles that were open at the same time.
    pub fn max_open(&self) -> usize {
        self.state.lock().unwrap().max_open
    }

    /// Whether a notifier handle is currently open.
    pub fn is_open(&self) -> bool {
        self.state.lock().unwrap().sinks.is_some()
    }

    /// Whether the live notifier is watching `path`.
    pub fn is_watching(&self, path: impl AsRef<Path>) -> bool {
        self.state.lock().unwrap().watching.contains(path.as_ref())
    }

    /// Number of `watch` calls for `path`, across all handles.
    pub fn watch_calls(&self, path: impl AsRef<Path>) -> usize {
        let state = self.state.lock().unwrap();
        state.watch_calls.iter().filter(|p| *p == path.as_ref()).count()
    }

    /// Number of `unwatch` calls for `path`, across all handles.
    pub fn unwatch_calls(&self, path: impl AsRef<Path>) -> usize {
        let state = self.state.lock().unwrap();
        state.unwatch_calls.iter().filter(|p| *p == path.as_ref()).count()
    }
}

impl NotifierFactory for FakeNotifierFactory {
    fn create(&self) -> Result<NotifierParts> {
        let mut state = self.state.lock().unwrap();
        if state.fail_create {
            return Err(PathwatchError::NotifierSetup(notify::Error::generic(
                "fake notifier creation failed",
            )));
        }

        state.creates += 1;
        state.open += 1;
        state.max_open = state.max_open.max(state.open);
        state.generation += 1;
        state.watching.clear();

        let (sinks, streams) = stream_pair();
        state.sinks = Some(sinks);

        let notifier = FakeNotifier {
            generation: state.generation,
            state: Arc::clone(&self.state),
        };
        Ok(NotifierParts {
            notifier: Box::new(notifier),
            streams,
        })
    }
}

#[derive(Debug)]
struct FakeNotifier {
    generation: u64,
    state: Arc<Mutex<FakeState>>,
}

impl Notifier for FakeNotifier {
    fn watch(&mut self, path: &Path) -> notify::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.watch_calls.push(path.to_path_buf());

        if state.rejected.contains(path) {
            return Err(notify::Error::generic("fake notifier rejected path")
                .add_path(path.to_path_buf()));
        }
        if state.generation == self.generation {
            state.watching.insert(path.to_path_buf());
        }
        Ok(())
    }

    fn unwatch(&mut self, path: &Path) -> notify::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.unwatch_calls.push(path.to_path_buf());
        if state.generation == self.generation {
            state.watching.remove(path);
        }
        Ok(())
    }

    fn close(self: Box<Self>) {
        let mut state = self.state.lock().unwrap();
        state.closes += 1;
        state.open -= 1;
        // A newer handle may already be live; only tear down our own.
        if state.generation == self.generation {
            state.sinks = None;
            state.watching.clear();
        }
    }
}
