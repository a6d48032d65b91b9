//! HTML digest rendering.
//!
//! The digest is a fixed preamble (doctype, inline styles, heading), one
//! `<div class="entry">` per paper in feed order, and a fixed closing tag.
//! Inline CSS only, since most mail clients strip `<link>` stylesheets.
//!
//! All feed text and link targets are escaped before insertion.

use crate::models::Paper;
use crate::utils::format_day;
use itertools::Itertools;
use quick_xml::escape::escape;
use std::fmt::Write;
use tracing::{info, instrument};

const HEADER: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<style>
    body { font-family: Arial, sans-serif; line-height: 1.6; padding: 20px; }
    h1 { color: #333; }
    .entry { margin-bottom: 20px; padding: 10px; border: 1px solid #ddd; border-radius: 5px; background: #f9f9f9; }
    .entry h2 { margin: 0; font-size: 18px; color: #007BFF; }
    .entry p { margin: 5px 0; }
</style>
</head>
<body>
<h1>ArXiv Alert</h1>
<p>Latest papers on your topics of interest:</p>
"#;

const FOOTER: &str = "</body></html>";

/// Render the full digest document for `papers`.
///
/// An empty slice yields just the preamble and closing tag.
#[instrument(level = "info", skip_all, fields(count = papers.len()))]
pub fn render_digest(papers: &[Paper]) -> String {
    let mut html = String::from(HEADER);
    for paper in papers {
        write_entry(&mut html, paper);
    }
    html.push_str(FOOTER);
    info!(bytes = html.len(), "Rendered HTML digest");
    html
}

fn write_entry(html: &mut String, paper: &Paper) {
    let authors = paper.authors.iter().map(|a| escape(a.as_str())).join(", ");
    let categories = paper.categories.iter().map(|c| escape(c.as_str())).join(", ");

    writeln!(html, r#"<div class="entry">"#).unwrap();
    writeln!(
        html,
        r#"    <a href="{}"><h2>{}</h2></a>"#,
        escape(paper.pdf_link.as_str()),
        escape(paper.title.as_str())
    )
    .unwrap();
    writeln!(
        html,
        "    <p><strong>Published:</strong> {}</p>",
        format_day(paper.published.date())
    )
    .unwrap();
    writeln!(html, "    <p><strong>Authors:</strong> {authors}</p>").unwrap();
    writeln!(html, "    <p><strong>Categories:</strong> {categories}</p>").unwrap();
    writeln!(
        html,
        "    <p><strong>Abstract:</strong> {}</p>",
        escape(paper.summary.as_str())
    )
    .unwrap();
    writeln!(html, "</div>").unwrap();
}
