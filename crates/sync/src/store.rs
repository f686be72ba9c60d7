use std::collections::HashMap;
use std::time::Duration;

use growlab_protocol::{ResourceDescriptor, Snapshot};
use tokio::time::Instant;

/// A slot is stale once this many intervals pass without a successful fetch.
const STALE_INTERVALS: u32 = 3;

/// Latest known state of one resource.
#[derive(Debug, Clone)]
pub struct ResourceSlot {
    latest: Option<Snapshot>,
    last_received: Option<Instant>,
    interval: Duration,
    updates: u64,
}

impl ResourceSlot {
    /// Create an empty slot for a resource polled every `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            latest: None,
            last_received: None,
            interval,
            updates: 0,
        }
    }

    /// Replace the snapshot wholesale. Fields absent from `snapshot` are gone
    /// afterwards, nothing is merged.
    pub fn replace(&mut self, snapshot: Snapshot) {
        self.latest = Some(snapshot);
        self.last_received = Some(Instant::now());
        self.updates += 1;
    }

    /// The most recent snapshot, or `None` before the first successful fetch.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    /// Whether the snapshot has stopped refreshing.
    ///
    /// A slot that never received data is not stale; it is still loading.
    /// An interval too large to scale never goes stale.
    pub fn is_stale(&self) -> bool {
        let Some(limit) = self.interval.checked_mul(STALE_INTERVALS) else {
            return false;
        };
        self.last_received.is_some_and(|t| t.elapsed() > limit)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of successful fetches applied to this slot.
    pub fn updates(&self) -> u64 {
        self.updates
    }
}

/// Latest snapshot of every tracked resource, keyed by resource name.
///
/// Only successful fetches write here. All methods are synchronous.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    slots: HashMap<String, ResourceSlot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a slot exists for `descriptor`. An existing slot keeps its
    /// snapshot and picks up the descriptor's interval.
    pub fn register(&mut self, descriptor: &ResourceDescriptor) {
        self.slots
            .entry(descriptor.name().to_owned())
            .and_modify(|slot| slot.interval = descriptor.interval())
            .or_insert_with(|| ResourceSlot::new(descriptor.interval()));
    }

    /// Store a freshly fetched snapshot for `descriptor`, replacing the old one.
    pub fn replace(&mut self, descriptor: &ResourceDescriptor, snapshot: Snapshot) {
        self.slots
            .entry(descriptor.name().to_owned())
            .or_insert_with(|| ResourceSlot::new(descriptor.interval()))
            .replace(snapshot);
    }

    /// Look up the slot for a resource.
    pub fn get(&self, name: &str) -> Option<&ResourceSlot> {
        self.slots.get(name)
    }

    /// The latest snapshot for a resource, if one has arrived.
    pub fn snapshot(&self, name: &str) -> Option<&Snapshot> {
        self.slots.get(name).and_then(ResourceSlot::latest)
    }

    /// Tracked resource names, sorted alphabetically.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.slots.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Forget every resource.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
