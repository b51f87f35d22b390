// src/registry/event_loop.rs

//! The single task that owns the subscription table and the notifier handle.
//!
//! Every mutation and every delivery goes through here. Callers reach the
//! loop only through the two request queues:
//! - add: "register this observer for this path",
//! - remove: "forget this path and all of its observers".
//!
//! Each request carries a one-shot `taken` signal that the loop fires as it
//! picks the request up. Callers wait for it before returning, so the
//! requests of one caller are applied in the order they were made even
//! though they travel on different queues.
//!
//! The loop retires itself once the table is empty, closing the notifier on
//! the way out. See [`EventLoop::try_retire`] for the hand-off with callers
//! that race a retirement.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, Mutex, OwnedMutexGuard};
use tracing::{debug, info, trace, warn};

use crate::fs::Storage;
use crate::notifier::{change_mask_for, Notifier, NotifierStreams, RawEvent};
use crate::types::ChangeMask;

use super::dispatch::Dispatcher;
use super::observer::Observer;
use super::table::SubscriptionTable;
use super::LifecycleSlot;

/// How long a loop with an empty table waits before retrying retirement
/// when the lifecycle slot was busy.
const RETIRE_RETRY: Duration = Duration::from_millis(10);

/// "Register `observer` for `path`."
pub(crate) struct AddRequest {
    pub path: PathBuf,
    pub observer: Arc<dyn Observer>,
    pub taken: oneshot::Sender<()>,
}

impl fmt::Debug for AddRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddRequest")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// "Forget `path` and every observer registered for it."
#[derive(Debug)]
pub(crate) struct RemoveRequest {
    pub path: PathBuf,
    pub taken: oneshot::Sender<()>,
}

/// Sending side of the request queues, held by the registry while the loop
/// runs.
#[derive(Debug)]
pub(crate) struct LoopHandle {
    pub generation: u64,
    pub add_tx: mpsc::Sender<AddRequest>,
    pub remove_tx: mpsc::Sender<RemoveRequest>,
}

impl LoopHandle {
    pub fn is_open(&self) -> bool {
        !self.add_tx.is_closed() && !self.remove_tx.is_closed()
    }
}

enum Retirement {
    /// Someone may still talk to this loop; keep running.
    Postponed,
    /// The registry is gone.
    Orphaned,
    /// The slot was cleared and is held until shutdown completes.
    Ready(OwnedMutexGuard<LifecycleSlot>),
}

pub(crate) struct EventLoop {
    generation: u64,
    table: SubscriptionTable,
    notifier: Box<dyn Notifier>,
    streams: NotifierStreams,
    add_rx: mpsc::Receiver<AddRequest>,
    remove_rx: mpsc::Receiver<RemoveRequest>,
    storage: Arc<dyn Storage>,
    dispatcher: Dispatcher,
    slot: Weak<Mutex<LifecycleSlot>>,
    retire_pending: bool,
}

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("generation", &self.generation)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

/// Everything the registry hands over when it starts a new loop.
pub(crate) struct LoopSetup {
    pub generation: u64,
    pub notifier: Box<dyn Notifier>,
    pub streams: NotifierStreams,
    pub request_buffer: usize,
    pub storage: Arc<dyn Storage>,
    pub dispatcher: Dispatcher,
    pub slot: Weak<Mutex<LifecycleSlot>>,
}

impl EventLoop {
    /// Build a loop and the handle used to feed it.
    pub fn new(setup: LoopSetup) -> (Self, LoopHandle) {
        let (add_tx, add_rx) = mpsc::channel(setup.request_buffer);
        let (remove_tx, remove_rx) = mpsc::channel(setup.request_buffer);

        let handle = LoopHandle {
            generation: setup.generation,
            add_tx,
            remove_tx,
        };
        let event_loop = Self {
            generation: setup.generation,
            table: SubscriptionTable::new(),
            notifier: setup.notifier,
            streams: setup.streams,
            add_rx,
            remove_rx,
            storage: setup.storage,
            dispatcher: setup.dispatcher,
            slot: setup.slot,
            retire_pending: false,
        };
        (event_loop, handle)
    }

    /// Main loop.
    ///
    /// Waits on four sources and handles exactly one ready source per
    /// iteration. `select!` picks randomly among ready branches, so no source
    /// can starve the others.
    pub async fn run(mut self) {
        info!(generation = self.generation, "watch event loop started");
        let mut retired_slot = None;

        loop {
            tokio::select! {
                Some(event) = self.streams.events.recv() => {
                    self.handle_raw_event(event);
                }
                Some(err) = self.streams.errors.recv() => {
                    debug!(generation = self.generation, error = %err, "discarding notifier error");
                }
                request = self.remove_rx.recv() => {
                    let Some(RemoveRequest { path, taken }) = request else {
                        debug!(generation = self.generation, "registry dropped; stopping");
                        break;
                    };
                    let _ = taken.send(());
                    self.handle_remove(&path);
                }
                request = self.add_rx.recv() => {
                    let Some(AddRequest { path, observer, taken }) = request else {
                        debug!(generation = self.generation, "registry dropped; stopping");
                        break;
                    };
                    let _ = taken.send(());
                    self.handle_add(path, observer);
                }
                _ = tokio::time::sleep(RETIRE_RETRY), if self.retire_pending => {}
            }

            if self.table.is_empty() {
                match self.try_retire() {
                    Retirement::Postponed => self.retire_pending = true,
                    Retirement::Orphaned => break,
                    Retirement::Ready(guard) => {
                        retired_slot = Some(guard);
                        break;
                    }
                }
            } else {
                self.retire_pending = false;
            }
        }

        // The slot stays locked until the notifier is closed, so a new loop
        // never opens its notifier while this one is still live.
        self.shutdown();
        drop(retired_slot);
    }

    fn handle_raw_event(&mut self, event: RawEvent) {
        let RawEvent { path, kind } = event;

        // Events for a path that was just removed may still be in flight.
        let Some(observers) = self.table.observers(&path) else {
            trace!(?path, ?kind, "no observers for event path; ignoring");
            return;
        };
        let observers = observers.to_vec();

        let mask = change_mask_for(&kind);
        if mask.is_empty() {
            trace!(?path, ?kind, "event carries no change; ignoring");
            return;
        }

        if mask.contains(ChangeMask::DELETED) {
            self.reconcile_delete(&path);
        }

        debug!(?path, %mask, observers = observers.len(), "change detected");
        self.dispatcher.dispatch(&path, mask, observers);
    }

    /// A backend delete may really be a rename/replace cycle (editors that
    /// save via a temp file do this). If something is back at the path the
    /// watch is re-armed; otherwise the path is dropped as if unsubscribed.
    fn reconcile_delete(&mut self, path: &Path) {
        if !self.storage.exists(path) {
            debug!(?path, "watched path is gone; removing subscription");
            self.handle_remove(path);
            return;
        }

        if let Err(err) = self.notifier.unwatch(path) {
            trace!(?path, error = %err, "unwatch before re-watch failed");
        }
        match self.notifier.watch(path) {
            Ok(()) => debug!(?path, "path replaced in place; watch re-established"),
            Err(err) => {
                warn!(?path, error = %err, "failed to re-watch replaced path; removing subscription");
                self.table.remove(path);
            }
        }
    }

    fn handle_remove(&mut self, path: &Path) {
        let Some(observers) = self.table.remove(path) else {
            trace!(?path, "remove request for unknown path; ignoring");
            return;
        };

        if let Err(err) = self.notifier.unwatch(path) {
            debug!(?path, error = %err, "unwatch failed");
        }
        debug!(?path, dropped = observers.len(), "path unsubscribed");
    }

    fn handle_add(&mut self, path: PathBuf, observer: Arc<dyn Observer>) {
        let observer = match self.table.append(&path, observer) {
            Ok(()) => {
                debug!(?path, observers = self.table.observer_count(&path), "observer added");
                return;
            }
            Err(observer) => observer,
        };

        match self.notifier.watch(&path) {
            Ok(()) => {
                debug!(?path, "started watching path");
                self.table.insert(path, observer);
            }
            Err(err) => {
                warn!(?path, error = %err, "failed to watch path; subscription dropped");
            }
        }
    }

    /// Try to hand the registry back to the NotRunning state.
    ///
    /// Callers hold the lifecycle slot for the whole "start loop if needed,
    /// then send" sequence. If the slot is busy, or a request is already
    /// queued, the loop stays up and retries on its next iteration (at the
    /// latest after [`RETIRE_RETRY`]). Otherwise the slot is cleared and
    /// handed back still locked; it must stay locked until the notifier is
    /// closed.
    fn try_retire(&mut self) -> Retirement {
        let Some(slot) = self.slot.upgrade() else {
            return Retirement::Orphaned;
        };
        let Ok(mut guard) = slot.try_lock_owned() else {
            trace!(generation = self.generation, "lifecycle slot busy; postponing retirement");
            return Retirement::Postponed;
        };

        if !self.add_rx.is_empty() || !self.remove_rx.is_empty() {
            return Retirement::Postponed;
        }

        if guard
            .handle
            .as_ref()
            .is_some_and(|handle| handle.generation == self.generation)
        {
            guard.handle = None;
        }
        Retirement::Ready(guard)
    }

    fn shutdown(self) {
        let Self {
            generation,
            table,
            notifier,
            ..
        } = self;

        if !table.is_empty() {
            debug!(generation, remaining = table.len(), "stopping with live subscriptions");
        }
        notifier.close();
        info!(generation, "watch event loop stopped; notifier released");
    }
}
