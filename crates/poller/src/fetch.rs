//! Fetch transport.
//!
//! [`Fetch`] is the seam between the poll loop and the network. The
//! production implementation, [`HttpFetcher`], issues plain `GET` requests
//! with `reqwest` and decodes the body into a [`Snapshot`].

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use growlab_protocol::Snapshot;
use growlab_protocol::constants::{REQUEST_TIMEOUT, join_url};

use crate::error::FetchError;

/// Boxed future returned by [`Fetch::fetch`].
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Snapshot, FetchError>> + Send + 'a>>;

/// Retrieves one resource and decodes it.
pub trait Fetch: Send + Sync + 'static {
    /// Fetches the resource at `path`, relative to the fetcher's base URL.
    fn fetch<'a>(&'a self, path: &'a str) -> FetchFuture<'a>;
}

/// HTTP transport for the controller's JSON API.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// Creates a fetcher rooted at `base_url` using the default request
    /// timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Creates a fetcher whose requests fail with [`FetchError::Timeout`]
    /// after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Full request URL for a resource path.
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Performs the GET and decodes the body.
    async fn get(&self, path: &str) -> Result<Snapshot, FetchError> {
        let url = self.url_for(path);
        let resp = self.http.get(&url).send().await?;
        let status = resp.status();

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let body = resp.bytes().await?;
        Ok(Snapshot::from_slice(&body)?)
    }
}

impl Fetch for HttpFetcher {
    fn fetch<'a>(&'a self, path: &'a str) -> FetchFuture<'a> {
        Box::pin(self.get(path))
    }
}
