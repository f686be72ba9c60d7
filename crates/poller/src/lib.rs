//! Resource poller for the Growlab controller.
//!
//! A [`Poller`] fetches one JSON resource on a fixed cadence and hands each
//! decoded [`Snapshot`](growlab_protocol::Snapshot) to a success hook. Failed
//! cycles are reported to a failure hook and never stop the loop.

pub mod error;
pub mod fetch;
pub mod poller;

pub use error::{FailureKind, FetchError};
pub use fetch::{Fetch, FetchFuture, HttpFetcher};
pub use poller::{FailureFn, Poller, SuccessFn};
