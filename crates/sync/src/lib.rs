//! Synchronization coordinator for the Growlab dashboard.
//!
//! The [`Coordinator`] owns one [`Poller`](growlab_poller::Poller) per
//! tracked resource and the latest snapshot each of them delivered. The
//! presentation layer reads snapshots from it and listens for
//! [`SyncEvent`]s to know when to re-render.

pub mod coordinator;
pub mod store;
pub mod types;

pub use coordinator::Coordinator;
pub use store::{ResourceSlot, SnapshotStore};
pub use types::{CoordinatorState, FetchFailure, SyncError, SyncEvent};
