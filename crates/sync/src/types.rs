//! Public types for the synchronization coordinator.

use growlab_poller::FailureKind;

/// Lifecycle state of a [`Coordinator`](crate::Coordinator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    /// No pollers running.
    Idle,
    /// One poller per resource is running.
    Active,
}

/// Diagnostic for one failed fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub resource: String,
    pub kind: FailureKind,
    pub reason: String,
}

/// Events emitted by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A resource's snapshot was replaced.
    SnapshotUpdated { resource: String },
    /// A fetch cycle failed; the previous snapshot is untouched.
    FetchFailed(FetchFailure),
}

/// Errors from coordinator lifecycle calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("coordinator is already active")]
    AlreadyActive,

    #[error("resource {0} is listed more than once")]
    DuplicateResource(String),
}
