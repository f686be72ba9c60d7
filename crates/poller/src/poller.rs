//! Interval-driven fetch loop for a single resource.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use growlab_protocol::{ResourceDescriptor, Snapshot};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::error::FetchError;
use crate::fetch::Fetch;

/// Hook invoked with each successfully decoded snapshot.
pub type SuccessFn = Arc<dyn Fn(&ResourceDescriptor, Snapshot) + Send + Sync + 'static>;

/// Hook invoked once per failed cycle.
pub type FailureFn = Arc<dyn Fn(&ResourceDescriptor, &FetchError) + Send + Sync + 'static>;

/// Fetches one resource on a fixed cadence.
///
/// Every tick spawns its own cycle task, so a slow request never delays or
/// swallows the next tick. Failed cycles are reported through the failure
/// hook and the loop carries on; only [`stop`](Self::stop) ends it.
///
/// Hooks run synchronously on a runtime worker and must not call `stop` on
/// the poller that invoked them.
pub struct Poller {
    fetcher: Arc<dyn Fetch>,
    active: Mutex<Option<ActiveLoop>>,
}

struct ActiveLoop {
    descriptor: Arc<ResourceDescriptor>,
    cancel: CancellationToken,
    fence: Arc<RwLock<()>>,
}

/// Everything one cycle needs, cloned into each spawned task.
#[derive(Clone)]
struct Cycle {
    fetcher: Arc<dyn Fetch>,
    descriptor: Arc<ResourceDescriptor>,
    on_success: SuccessFn,
    on_failure: FailureFn,
    cancel: CancellationToken,
    /// Hooks run under the read side; `stop` takes the write side.
    fence: Arc<RwLock<()>>,
}

impl Poller {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            fetcher,
            active: Mutex::new(None),
        }
    }

    /// Starts polling `descriptor`. The first fetch is issued immediately,
    /// then one every `descriptor.interval()`.
    ///
    /// A poller that is already running is stopped first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, descriptor: ResourceDescriptor, on_success: SuccessFn, on_failure: FailureFn) {
        let previous = lock(&self.active).take();
        if let Some(previous) = previous {
            previous.shutdown();
        }

        let descriptor = Arc::new(descriptor);
        let cancel = CancellationToken::new();
        let fence = Arc::new(RwLock::new(()));

        let cycle = Cycle {
            fetcher: Arc::clone(&self.fetcher),
            descriptor: Arc::clone(&descriptor),
            on_success,
            on_failure,
            cancel: cancel.clone(),
            fence: Arc::clone(&fence),
        };
        tokio::spawn(poll_loop(cycle));

        info!(
            resource = %descriptor.name(),
            path = %descriptor.path(),
            interval = ?descriptor.interval(),
            "poller started"
        );

        let replaced = lock(&self.active).replace(ActiveLoop {
            descriptor,
            cancel,
            fence,
        });
        if let Some(replaced) = replaced {
            replaced.shutdown();
        }
    }

    /// Stops polling.
    ///
    /// Future ticks are cancelled immediately. A request still in flight is
    /// abandoned, and once this returns no hook is running or will run for
    /// this loop. Calling it again, or before `start`, does nothing.
    pub fn stop(&self) {
        let active = lock(&self.active).take();
        if let Some(active) = active {
            active.shutdown();
            info!(resource = %active.descriptor.name(), "poller stopped");
        }
    }

    /// Returns `true` while a loop is running.
    pub fn is_running(&self) -> bool {
        lock(&self.active).is_some()
    }

    /// The descriptor of the running loop, if any.
    pub fn descriptor(&self) -> Option<ResourceDescriptor> {
        lock(&self.active)
            .as_ref()
            .map(|a| ResourceDescriptor::clone(&a.descriptor))
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

impl ActiveLoop {
    fn shutdown(&self) {
        self.cancel.cancel();
        // Wait out hooks that passed their cancellation check before the cancel.
        drop(self.fence.write().unwrap_or_else(PoisonError::into_inner));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Tick loop. The first tick of a tokio interval completes immediately.
async fn poll_loop(cycle: Cycle) {
    let mut ticker = tokio::time::interval(cycle.descriptor.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cycle.cancel.cancelled() => break,
            _ = ticker.tick() => {
                tokio::spawn(run_cycle(cycle.clone()));
            }
        }
    }

    debug!(resource = %cycle.descriptor.name(), "poll loop exited");
}

/// One fetch-and-deliver cycle.
async fn run_cycle(cycle: Cycle) {
    let name = cycle.descriptor.name();

    let result = tokio::select! {
        _ = cycle.cancel.cancelled() => {
            trace!(resource = %name, "in-flight fetch abandoned after stop");
            return;
        }
        result = cycle.fetcher.fetch(cycle.descriptor.path()) => result,
    };

    let _fence = cycle.fence.read().unwrap_or_else(PoisonError::into_inner);
    if cycle.cancel.is_cancelled() {
        trace!(resource = %name, "discarding fetch result after stop");
        return;
    }

    match result {
        Ok(snapshot) => {
            debug!(resource = %name, fields = snapshot.len(), "fetch succeeded");
            (cycle.on_success)(&cycle.descriptor, snapshot);
        }
        Err(e) => {
            debug!(resource = %name, kind = %e.kind(), "fetch failed");
            (cycle.on_failure)(&cycle.descriptor, &e);
        }
    }
}
