//! Data model shared by the Growlab dashboard crates.
//!
//! A [`ResourceDescriptor`] names one pollable endpoint on the controller and
//! the cadence it is fetched at; a [`Snapshot`] is the decoded JSON object the
//! controller returned for it.

pub mod constants;
pub mod resource;
pub mod snapshot;

// Re-export primary types for convenience.
pub use constants::resolve_base_url;
pub use resource::{DescriptorError, ResourceDescriptor};
pub use snapshot::Snapshot;
