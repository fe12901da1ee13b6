//! Page download for the save-a-URL pipeline. Compiled under the `fetch`
//! feature; the rest of the crate works without network access.

use std::time::Duration;

use tokio::runtime::Runtime;
use tracing::debug;

use crate::types::errors::FetchError;

/// Request timeout. Slow origins fail the save rather than hanging it.
const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// HTTP client wrapper that fetches page HTML synchronously for callers;
/// the async client runs on an owned current-thread runtime.
pub struct PageFetcher {
    client: reqwest::Client,
    runtime: Runtime,
}

impl PageFetcher {
    /// Builds the fetcher. Fails only if the runtime or TLS client cannot
    /// be constructed.
    pub fn new() -> Result<Self, FetchError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("readstash/", env!("CARGO_PKG_VERSION")))
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;
        Ok(Self { client, runtime })
    }

    /// Downloads the page at `url` and returns its body as text.
    pub fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        debug!(url, "fetching page");
        self.runtime.block_on(async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| FetchError::NetworkError(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::BadStatus(status.as_u16()));
            }

            response
                .text()
                .await
                .map_err(|e| FetchError::NotReadable(e.to_string()))
        })
    }
}
