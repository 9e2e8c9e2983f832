use tracing::debug;

use super::{DownloadError, Error};

/// Fetches one URL into a UTF-8 body.
///
/// The library issues at most one call per operation and never retries;
/// implementations must be shareable across threads so entities holding a
/// transport handle stay `Send + Sync`.
pub trait FeedTransport: Send + Sync {
    /// Performs a single blocking GET and returns the response body.
    fn fetch(&self, url: &str) -> Result<String, Error>;
}

/// The reqwest-backed transport used outside of tests.
pub struct FeedClient {
    http: reqwest::blocking::Client,
}

impl FeedClient {
    pub fn new() -> Result<Self, Error> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("nextbus/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DownloadError::Http)?;
        Ok(Self { http })
    }
}

impl FeedTransport for FeedClient {
    fn fetch(&self, url: &str) -> Result<String, Error> {
        debug!(%url, "requesting feed document");
        let response = self
            .http
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(DownloadError::Http)?;
        let body = response.text().map_err(DownloadError::Http)?;
        Ok(body)
    }
}
