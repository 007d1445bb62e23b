//! Reload Coordinator - single-flight reload actor
//!
//! # States
//!
//! ```text
//!            first request
//!   Idle ---------------------> Loading --+ more requests join the queue
//!    ^                             |  ^   |
//!    |      pass finished          |  +---+
//!    +-----------------------------+
//!      publish (on success), answer every waiter in join order
//! ```
//!
//! The actor runs on its own thread and owns every loader invocation, so at
//! most one pass walks the stores at any time. Each pass runs on a worker
//! thread so the actor keeps accepting waiters while it loads.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread;

use crossbeam::channel::{self, Receiver, Sender};

use crate::error::{LoadError, ReloadResult};
use crate::view::{Loader, ViewCache};

/// One-shot reply channel of a waiting caller.
type Responder = Sender<ReloadResult>;

/// Handle to the reload actor. Clones share the same actor.
///
/// The actor stops once every handle is dropped.
#[derive(Clone)]
pub struct ReloadCoordinator {
    requests: Sender<Responder>,
}

impl ReloadCoordinator {
    /// Start the actor thread.
    pub fn spawn(loader: Arc<Loader>, cache: Arc<ViewCache>) -> Result<Self, LoadError> {
        let (requests, inbox) = channel::unbounded::<Responder>();
        thread::Builder::new()
            .name("view-reload".into())
            .spawn(move || run(inbox, loader, cache))
            .map_err(LoadError::Spawn)?;
        Ok(Self { requests })
    }

    /// Request a reload and block until the batch serving it completes.
    ///
    /// Callers joining while a pass is in flight share its outcome; the
    /// error, if any, is the same `Arc` for all of them.
    pub fn reload(&self) -> ReloadResult {
        let (tx, rx) = channel::bounded(1);
        self.requests
            .send(tx)
            .map_err(|_| Arc::new(LoadError::Stopped))?;
        rx.recv().unwrap_or_else(|_| Err(Arc::new(LoadError::Stopped)))
    }
}

/// Actor loop: Idle while `waiters` is empty, Loading otherwise.
fn run(inbox: Receiver<Responder>, loader: Arc<Loader>, cache: Arc<ViewCache>) {
    let (done_tx, done_rx) = channel::bounded::<ReloadResult>(1);
    let mut waiters: Vec<Responder> = Vec::new();

    loop {
        channel::select! {
            recv(inbox) -> msg => {
                // All handles dropped; nobody can be waiting on us
                let Ok(responder) = msg else { break };
                if waiters.is_empty() {
                    start_pass(&loader, &cache, &done_tx);
                }
                waiters.push(responder);
            }
            recv(done_rx) -> result => {
                let Ok(result) = result else { break };
                crate::debug!("reload"; "batch done, answering {} waiter(s)", waiters.len());
                for waiter in waiters.drain(..) {
                    // A waiter that gave up is fine
                    let _ = waiter.send(result.clone());
                }
            }
        }
    }

    crate::debug!("reload"; "coordinator stopped");
}

/// Run one loader pass on a worker thread; its result lands in `done`.
fn start_pass(loader: &Arc<Loader>, cache: &Arc<ViewCache>, done: &Sender<ReloadResult>) {
    let loader = Arc::clone(loader);
    let cache = Arc::clone(cache);
    let tx = done.clone();

    let spawned = thread::Builder::new()
        .name("view-loader".into())
        .spawn(move || {
            // Covers publish too: every pass must answer `done`
            let result = catch_unwind(AssertUnwindSafe(|| load_and_publish(&loader, &cache)))
                .unwrap_or_else(|_| Err(Arc::new(LoadError::Panicked)));
            let _ = tx.send(result);
        });

    if let Err(err) = spawned {
        // Channel is empty: no pass was in flight
        let _ = done.send(Err(Arc::new(LoadError::Spawn(err))));
    }
}

fn load_and_publish(loader: &Loader, cache: &ViewCache) -> ReloadResult {
    match loader.load() {
        Ok(set) => {
            let count = set.len();
            let generation = cache.publish(set);
            crate::debug!("reload"; "published {} views (generation {})", count, generation);
            Ok(())
        }
        Err(err) => {
            crate::debug!("reload"; "load failed, keeping generation {}: {}", cache.generation(), err);
            Err(Arc::new(err))
        }
    }
}
