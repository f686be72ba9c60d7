//! Error types for a single fetch cycle.

use std::fmt;

/// Why one fetch of a resource produced no snapshot.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP error {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Coarse failure category reported in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Connection refused, DNS failure, timeout.
    Transport,
    /// Non-2xx response status.
    Http,
    /// Body was not a JSON object.
    Decode,
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) | Self::Timeout => FailureKind::Transport,
            Self::Status { .. } => FailureKind::Http,
            Self::Decode(_) => FailureKind::Decode,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Transport => "transport",
            Self::Http => "http",
            Self::Decode => "decode",
        })
    }
}
