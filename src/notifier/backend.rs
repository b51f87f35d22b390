// src/notifier/backend.rs

//! Pluggable notifier abstraction.
//!
//! The event loop owns exactly one `Notifier` handle for its whole lifetime
//! and drains the matching `NotifierStreams`. Production code builds both
//! from `notify` (see [`super::notify_backend`]); tests provide a factory
//! whose events are injected by hand.

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use notify::{Event, EventKind};
use tokio::sync::mpsc;

use crate::errors::Result;

/// A single raw change reported by the backend for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub path: PathBuf,
    pub kind: EventKind,
}

impl RawEvent {
    pub fn new(path: impl Into<PathBuf>, kind: EventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Handle on the underlying notification primitive.
pub trait Notifier: Send + Debug {
    /// Start delivering events for `path`.
    fn watch(&mut self, path: &Path) -> notify::Result<()>;

    /// Stop delivering events for `path`.
    fn unwatch(&mut self, path: &Path) -> notify::Result<()>;

    /// Release the handle. Called exactly once, when the owning event loop
    /// retires.
    fn close(self: Box<Self>);
}

/// Receiving halves of a notifier, consumable independently of each other.
#[derive(Debug)]
pub struct NotifierStreams {
    pub events: mpsc::UnboundedReceiver<RawEvent>,
    pub errors: mpsc::UnboundedReceiver<notify::Error>,
}

/// Sending halves matching a [`NotifierStreams`].
///
/// Backend callbacks run on the backend's own thread, so the channels are
/// unbounded and sending never blocks.
#[derive(Debug, Clone)]
pub struct NotifierSinks {
    events: mpsc::UnboundedSender<RawEvent>,
    errors: mpsc::UnboundedSender<notify::Error>,
}

impl NotifierSinks {
    /// Send one raw event. Returns `false` once the event loop has gone.
    pub fn send_event(&self, event: RawEvent) -> bool {
        self.events.send(event).is_ok()
    }

    /// Send one backend error. Returns `false` once the event loop has gone.
    pub fn send_error(&self, error: notify::Error) -> bool {
        self.errors.send(error).is_ok()
    }

    /// Forward a `notify` callback result, splitting multi-path events into
    /// one [`RawEvent`] per path.
    pub fn forward(&self, res: notify::Result<Event>) {
        match res {
            Ok(event) => {
                let kind = event.kind;
                for path in event.paths {
                    if !self.send_event(RawEvent { path, kind }) {
                        return;
                    }
                }
            }
            Err(err) => {
                self.send_error(err);
            }
        }
    }
}

/// Create a connected sink/stream pair.
pub fn stream_pair() -> (NotifierSinks, NotifierStreams) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (error_tx, error_rx) = mpsc::unbounded_channel();
    (
        NotifierSinks {
            events: event_tx,
            errors: error_tx,
        },
        NotifierStreams {
            events: event_rx,
            errors: error_rx,
        },
    )
}

/// Everything a freshly created notifier hands to its event loop.
#[derive(Debug)]
pub struct NotifierParts {
    pub notifier: Box<dyn Notifier>,
    pub streams: NotifierStreams,
}

/// Creates a new notifier handle for each event-loop generation.
pub trait NotifierFactory: Send + Sync + Debug {
    /// Build a new handle. Failure here is the only error that reaches a
    /// subscriber.
    fn create(&self) -> Result<NotifierParts>;
}
