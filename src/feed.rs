//! Atom feed parsing for arXiv API responses.
//!
//! XML decoding is done by `quick-xml`'s serde deserializer into the raw
//! shapes in [`crate::models`]; this module turns those into [`Paper`]s by
//! applying placeholder defaults and validating `published`.
//!
//! Parsing is all-or-nothing: one malformed timestamp fails the whole feed,
//! since a digest with silently dropped papers is worse than no digest.

use crate::error::AlertError;
use crate::models::{
    Feed, FeedEntry, Paper, NO_SUMMARY, NO_TITLE, UNKNOWN_AUTHOR, UNKNOWN_CATEGORY,
};
use crate::utils::normalize_whitespace;
use chrono::NaiveDateTime;
use tracing::{debug, info, instrument};

/// Timestamp layout used by arXiv for `<published>`.
pub const PUBLISHED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse an Atom payload into papers, preserving feed order.
///
/// # Errors
///
/// Returns [`AlertError::Xml`] when the payload is not a feed the
/// deserializer understands (including an entry without `<published>`), and
/// [`AlertError::Timestamp`] when a `published` value has the wrong layout.
#[instrument(level = "info", skip_all, fields(bytes = body.len()))]
pub fn parse_feed(body: &str) -> Result<Vec<Paper>, AlertError> {
    let feed: Feed = quick_xml::de::from_str(body)?;
    let papers = feed
        .entries
        .into_iter()
        .map(Paper::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    info!(count = papers.len(), "Parsed feed entries");
    Ok(papers)
}

/// Parse an arXiv `published` timestamp.
pub fn parse_published(value: &str) -> Result<NaiveDateTime, AlertError> {
    NaiveDateTime::parse_from_str(value.trim(), PUBLISHED_FORMAT).map_err(|source| {
        AlertError::Timestamp {
            value: value.to_string(),
            source,
        }
    })
}

/// Normalized text of an optional element, treating blank as absent.
fn text_or(value: Option<&str>, default: &str) -> String {
    value
        .map(normalize_whitespace)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl TryFrom<FeedEntry> for Paper {
    type Error = AlertError;

    fn try_from(entry: FeedEntry) -> Result<Self, Self::Error> {
        let published = parse_published(&entry.published)?;
        let pdf_link = entry.pdf_link();
        let paper = Paper {
            title: text_or(entry.title.as_deref(), NO_TITLE),
            summary: text_or(entry.summary.as_deref(), NO_SUMMARY),
            published,
            authors: entry
                .authors
                .iter()
                .map(|a| text_or(a.name.as_deref(), UNKNOWN_AUTHOR))
                .collect(),
            categories: entry
                .categories
                .iter()
                .map(|c| text_or(c.term.as_deref(), UNKNOWN_CATEGORY))
                .collect(),
            pdf_link,
        };
        debug!(title = %paper.title, %published, "Parsed entry");
        Ok(paper)
    }
}
