use std::time::Duration;

use crate::constants::{
    REGISTRATION, REGISTRATION_FETCH_INTERVAL, REGISTRATION_PATH, TELEMETRY,
    TELEMETRY_FETCH_INTERVAL, TELEMETRY_PATH,
};

/// Errors from building a [`ResourceDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    #[error("resource name must not be empty")]
    EmptyName,

    #[error("resource {0}: path must not be empty")]
    EmptyPath(String),

    #[error("resource {0}: fetch interval must be greater than zero")]
    ZeroInterval(String),
}

/// Static description of one pollable resource.
///
/// Immutable once built: a poller keeps the descriptor it was started with
/// for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceDescriptor {
    name: String,
    path: String,
    interval: Duration,
}

impl ResourceDescriptor {
    /// Creates a descriptor, normalizing `path` to start with `/`.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        interval: Duration,
    ) -> Result<Self, DescriptorError> {
        let name = name.into();
        let path = path.into();

        if name.trim().is_empty() {
            return Err(DescriptorError::EmptyName);
        }
        let trimmed = path.trim().trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(DescriptorError::EmptyPath(name));
        }
        if interval.is_zero() {
            return Err(DescriptorError::ZeroInterval(name));
        }

        Ok(Self {
            path: format!("/{trimmed}"),
            name,
            interval,
        })
    }

    /// Live telemetry, fetched every 10 seconds.
    pub fn telemetry() -> Self {
        Self {
            name: TELEMETRY.into(),
            path: TELEMETRY_PATH.into(),
            interval: TELEMETRY_FETCH_INTERVAL,
        }
    }

    /// Device registration, fetched every minute.
    pub fn registration() -> Self {
        Self {
            name: REGISTRATION.into(),
            path: REGISTRATION_PATH.into(),
            interval: REGISTRATION_FETCH_INTERVAL,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Endpoint path relative to the API base, always with a leading `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
