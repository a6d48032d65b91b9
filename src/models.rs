//! Data models for the arXiv Atom feed and the papers rendered from it.
//!
//! This module defines two layers:
//! - [`Feed`], [`FeedEntry`], [`FeedAuthor`], [`FeedLink`], [`FeedCategory`]:
//!   the raw Atom shapes as deserialized by `quick-xml`. Every field except
//!   `published` is optional, because the feed may omit any of them.
//! - [`Paper`]: one entry with all defaults applied, ready for rendering.
//!
//! Attribute fields use the `@` prefix that `quick-xml`'s serde support
//! expects for XML attributes.

use chrono::NaiveDateTime;
use serde::Deserialize;

/// Title shown when an entry has no `<title>`.
pub const NO_TITLE: &str = "No Title Available";
/// Abstract shown when an entry has no `<summary>`.
pub const NO_SUMMARY: &str = "No Summary Available";
/// Name shown for an `<author>` without a `<name>`.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
/// Term shown for a `<category>` without a `term` attribute.
pub const UNKNOWN_CATEGORY: &str = "Unknown Category";
/// Link target used when an entry has no PDF link.
pub const MISSING_LINK: &str = "#";

/// The `title` attribute arXiv puts on an entry's PDF link.
const PDF_LINK_TITLE: &str = "pdf";

/// Root `<feed>` element of an arXiv API response.
#[derive(Debug, Default, Deserialize)]
pub struct Feed {
    /// Entries in the order the API returned them.
    #[serde(rename = "entry", default)]
    pub entries: Vec<FeedEntry>,
}

/// One `<entry>` element, i.e. one paper.
#[derive(Debug, Deserialize)]
pub struct FeedEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// Submission timestamp, `YYYY-MM-DDTHH:MM:SSZ`. Required.
    pub published: String,
    #[serde(rename = "author", default)]
    pub authors: Vec<FeedAuthor>,
    #[serde(rename = "link", default)]
    pub links: Vec<FeedLink>,
    #[serde(rename = "category", default)]
    pub categories: Vec<FeedCategory>,
}

/// An `<author>` element.
#[derive(Debug, Deserialize)]
pub struct FeedAuthor {
    #[serde(default)]
    pub name: Option<String>,
}

/// A `<link>` element. arXiv emits an `alternate` link to the abstract page
/// and a `related` link titled `pdf`.
#[derive(Debug, Deserialize)]
pub struct FeedLink {
    #[serde(rename = "@href", default)]
    pub href: Option<String>,
    #[serde(rename = "@title", default)]
    pub title: Option<String>,
}

/// A `<category>` element carrying a taxonomy `term` such as `cs.LG`.
#[derive(Debug, Deserialize)]
pub struct FeedCategory {
    #[serde(rename = "@term", default)]
    pub term: Option<String>,
}

impl FeedEntry {
    /// The href of the first link titled `pdf`, or [`MISSING_LINK`].
    pub fn pdf_link(&self) -> String {
        self.links
            .iter()
            .find(|link| link.title.as_deref() == Some(PDF_LINK_TITLE))
            .and_then(|link| link.href.clone())
            .unwrap_or_else(|| MISSING_LINK.to_string())
    }
}

/// A paper ready to be rendered into the digest.
///
/// Built from a [`FeedEntry`] by [`crate::feed::parse_feed`], which applies
/// the placeholder defaults and validates the timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Paper {
    pub title: String,
    pub summary: String,
    pub published: NaiveDateTime,
    pub authors: Vec<String>,
    pub categories: Vec<String>,
    pub pdf_link: String,
}
