//! Coordinator owning one poller per resource and their latest snapshots.
//!
//! Snapshots live in a [`SnapshotStore`] behind a single lock that is held for
//! one key update or read at a time, never across I/O. Success hooks write to
//! it; the presentation layer only reads.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use growlab_poller::{FailureFn, Fetch, FetchError, Poller, SuccessFn};
use growlab_protocol::{ResourceDescriptor, Snapshot};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::store::{ResourceSlot, SnapshotStore};
use crate::types::{CoordinatorState, FetchFailure, SyncError, SyncEvent};

/// Capacity of the event channel handed out by [`Coordinator::take_events`].
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Synchronization coordinator.
///
/// Each instance owns its own store and event channel, so independent
/// coordinators can run side by side.
pub struct Coordinator {
    fetcher: Arc<dyn Fetch>,
    store: Arc<RwLock<SnapshotStore>>,
    /// `None` while idle.
    pollers: Mutex<Option<Vec<Poller>>>,
    events_tx: mpsc::Sender<SyncEvent>,
    events_rx: Mutex<Option<mpsc::Receiver<SyncEvent>>>,
}

impl Coordinator {
    /// Creates an idle coordinator that fetches through `fetcher`.
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            fetcher,
            store: Arc::new(RwLock::new(SnapshotStore::new())),
            pollers: Mutex::new(None),
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
        }
    }

    /// Takes the event receiver. Can only be called once.
    ///
    /// Events are best-effort: when the receiver falls behind by more than
    /// the channel capacity, new events are dropped. Failures are always
    /// logged regardless.
    pub fn take_events(&self) -> Option<mpsc::Receiver<SyncEvent>> {
        lock(&self.events_rx).take()
    }

    /// Starts one poller per descriptor. Each fetches immediately, then on
    /// its own interval.
    ///
    /// Must be called from within a tokio runtime.
    pub fn activate(&self, descriptors: Vec<ResourceDescriptor>) -> Result<(), SyncError> {
        let mut pollers = lock(&self.pollers);
        if pollers.is_some() {
            return Err(SyncError::AlreadyActive);
        }

        let mut seen = HashSet::new();
        for descriptor in &descriptors {
            if !seen.insert(descriptor.name()) {
                return Err(SyncError::DuplicateResource(descriptor.name().to_owned()));
            }
        }

        {
            let mut store = write(&self.store);
            for descriptor in &descriptors {
                store.register(descriptor);
            }
        }

        let count = descriptors.len();
        let started: Vec<Poller> = descriptors
            .into_iter()
            .map(|descriptor| {
                let poller = Poller::new(Arc::clone(&self.fetcher));
                poller.start(descriptor, self.success_hook(), self.failure_hook());
                poller
            })
            .collect();
        *pollers = Some(started);

        info!(resources = count, "coordinator activated");
        Ok(())
    }

    /// Stops every poller.
    ///
    /// Once this returns no snapshot changes and no event is emitted, even
    /// for requests that were in flight. Snapshots already received stay
    /// readable. Calling it while idle does nothing.
    pub fn deactivate(&self) {
        let pollers = lock(&self.pollers).take();
        if let Some(pollers) = pollers {
            for poller in &pollers {
                poller.stop();
            }
            info!(resources = pollers.len(), "coordinator deactivated");
        }
    }

    /// The latest snapshot of a resource, or `None` if none has arrived yet.
    ///
    /// Never blocks on I/O and never triggers a fetch.
    pub fn snapshot(&self, name: &str) -> Option<Snapshot> {
        read(&self.store).snapshot(name).cloned()
    }

    /// The full slot of a resource, including its staleness.
    pub fn slot(&self, name: &str) -> Option<ResourceSlot> {
        read(&self.store).get(name).cloned()
    }

    /// Names of every resource this coordinator has tracked, sorted.
    pub fn resources(&self) -> Vec<String> {
        read(&self.store)
            .names()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    pub fn state(&self) -> CoordinatorState {
        if lock(&self.pollers).is_some() {
            CoordinatorState::Active
        } else {
            CoordinatorState::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == CoordinatorState::Active
    }

    /// Hook that replaces the resource's snapshot and announces it.
    fn success_hook(&self) -> SuccessFn {
        let store = Arc::clone(&self.store);
        let events_tx = self.events_tx.clone();

        Arc::new(move |descriptor: &ResourceDescriptor, snapshot: Snapshot| {
            write(&store).replace(descriptor, snapshot);
            emit(
                &events_tx,
                SyncEvent::SnapshotUpdated {
                    resource: descriptor.name().to_owned(),
                },
            );
        })
    }

    /// Hook that reports a failed cycle without touching the store.
    fn failure_hook(&self) -> FailureFn {
        let events_tx = self.events_tx.clone();

        Arc::new(move |descriptor: &ResourceDescriptor, error: &FetchError| {
            warn!(
                resource = %descriptor.name(),
                kind = %error.kind(),
                error = %error,
                "fetch failed"
            );
            emit(
                &events_tx,
                SyncEvent::FetchFailed(FetchFailure {
                    resource: descriptor.name().to_owned(),
                    kind: error.kind(),
                    reason: error.to_string(),
                }),
            );
        })
    }
}

fn emit(events_tx: &mpsc::Sender<SyncEvent>, event: SyncEvent) {
    if let Err(e) = events_tx.try_send(event) {
        debug!("dropping sync event: {e}");
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read(store: &RwLock<SnapshotStore>) -> RwLockReadGuard<'_, SnapshotStore> {
    store.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(store: &RwLock<SnapshotStore>) -> RwLockWriteGuard<'_, SnapshotStore> {
    store.write().unwrap_or_else(PoisonError::into_inner)
}
