//! HTTP access to the arXiv search API.
//!
//! One run makes exactly one request: a GET of the URL built by
//! [`crate::query::SearchQuery::to_url`]. There is no retry and no timeout
//! override; any transport error or non-success status aborts the run so
//! that a partial digest is never sent.

use crate::error::AlertError;
use crate::utils::truncate_for_log;
use std::time::Instant;
use tracing::{error, info, instrument};
use url::Url;

/// `User-Agent` sent with every request.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client for the arXiv Atom API.
#[derive(Debug, Clone)]
pub struct ArxivClient {
    /// Internal web client used to connect to the API.
    client: reqwest::Client,
}

impl ArxivClient {
    /// Create a client with the crate's `User-Agent`.
    pub fn new() -> Result<Self, AlertError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Fetch the feed at `url` and return the response body.
    ///
    /// # Errors
    ///
    /// - [`AlertError::Http`] if the request or body read fails
    /// - [`AlertError::Status`] if the API answers with a non-2xx status
    #[instrument(level = "info", skip_all, fields(url = %url))]
    pub async fn fetch_feed(&self, url: &Url) -> Result<String, AlertError> {
        let t0 = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;
        let elapsed_ms = t0.elapsed().as_millis() as u64;

        if !status.is_success() {
            error!(
                %status,
                elapsed_ms,
                body_preview = %truncate_for_log(&body, 300),
                "arXiv API returned an error status"
            );
            return Err(AlertError::Status {
                status,
                url: url.to_string(),
            });
        }

        info!(%status, bytes = body.len(), elapsed_ms, "Fetched arXiv feed");
        Ok(body)
    }
}
