// src/registry/dispatch.rs

//! Fire-and-forget delivery of notifications to observers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{trace, warn};

use crate::types::ChangeMask;

use super::observer::Observer;

/// Spawns one independent unit of work per (event, observer) pair.
///
/// Spawning happens in observer-list order, but nothing is awaited: the
/// event loop moves on immediately and completions may land in any order.
/// With a concurrency limit, permits are acquired inside the spawned task so
/// the loop itself never waits on a slow observer.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    limit: Option<Arc<Semaphore>>,
}

impl Dispatcher {
    pub fn unbounded() -> Self {
        Self { limit: None }
    }

    /// At most `max_concurrent` notifications in flight. A limit of 0 would
    /// never hand out a permit, so it is raised to 1.
    pub fn bounded(max_concurrent: usize) -> Self {
        Self {
            limit: Some(Arc::new(Semaphore::new(max_concurrent.max(1)))),
        }
    }

    pub fn from_limit(limit: Option<usize>) -> Self {
        match limit {
            Some(max) => Self::bounded(max),
            None => Self::unbounded(),
        }
    }

    pub fn dispatch(&self, path: &Path, mask: ChangeMask, observers: Vec<Arc<dyn Observer>>) {
        trace!(?path, %mask, observers = observers.len(), "dispatching notification");

        for observer in observers {
            let path = path.to_path_buf();
            let limit = self.limit.clone();
            tokio::spawn(async move {
                let _permit = match limit {
                    Some(semaphore) => match semaphore.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        Err(_) => return,
                    },
                    None => None,
                };
                notify_one(observer, path, mask).await;
            });
        }
    }
}

async fn notify_one(observer: Arc<dyn Observer>, path: PathBuf, mask: ChangeMask) {
    let shown = path.clone();
    let outcome = tokio::task::spawn_blocking(move || observer.notify(&path, mask)).await;
    if let Err(err) = outcome {
        warn!(path = ?shown, %mask, error = %err, "observer failed while handling notification");
    }
}
