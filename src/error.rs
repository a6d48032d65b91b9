//! Errors raised while fetching and parsing the arXiv feed.
//!
//! Every variant here is fatal for a run: when the feed cannot be fetched or
//! understood, no digest is rendered and no email is sent. Configuration and
//! delivery failures have their own types in [`crate::config`] and
//! [`crate::mailer`].

use thiserror::Error;

/// A fatal failure in the fetch or parse stage of the pipeline.
#[derive(Debug, Error)]
pub enum AlertError {
    /// The HTTP request could not be completed (DNS, TLS, connection, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The search API answered with a non-success status code.
    #[error("arXiv API returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// The response body was not a well-formed Atom feed.
    #[error("failed to parse Atom feed: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// An entry carried a `published` value not in `YYYY-MM-DDTHH:MM:SSZ` form.
    #[error("invalid published timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
