//! Boolean search query construction for the arXiv API.
//!
//! A query is a list of [`Clause`]s. Each clause is an OR-group over one or
//! more search fields and a list of terms; clauses are AND-ed together:
//!
//! ```text
//! (cat:cs.LG OR cat:cs.AI) AND (ti:"quantum computing" OR ti:"AI" OR abs:"quantum computing" OR abs:"AI") AND (au:"Ada Lovelace")
//! ```
//!
//! The expression is built as plain text and percent-encoded exactly once,
//! by `url`'s `application/x-www-form-urlencoded` serializer, when the
//! request URL is assembled (spaces become `+`, quotes `%22`, parentheses
//! `%28`/`%29`).

use crate::config::SearchFilters;
use itertools::Itertools;
use url::Url;

/// Default arXiv search endpoint.
pub const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

/// An arXiv search field prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Category,
    Title,
    Abstract,
    Author,
}

impl Field {
    fn prefix(self) -> &'static str {
        match self {
            Field::Category => "cat",
            Field::Title => "ti",
            Field::Abstract => "abs",
            Field::Author => "au",
        }
    }
}

/// One parenthesized OR-group.
///
/// Terms are expanded field-major: every term against the first field, then
/// every term against the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    fields: Vec<Field>,
    terms: Vec<String>,
}

impl Clause {
    /// Build a clause, or `None` when there are no terms to match.
    pub fn new(fields: &[Field], terms: Vec<String>) -> Option<Self> {
        if terms.is_empty() || fields.is_empty() {
            return None;
        }
        Some(Self {
            fields: fields.to_vec(),
            terms,
        })
    }

    /// Render the clause as `(f:t1 OR f:t2 ...)`.
    pub fn expression(&self) -> String {
        let alternatives = self
            .fields
            .iter()
            .flat_map(|field| {
                self.terms
                    .iter()
                    .map(move |term| format!("{}:{}", field.prefix(), term))
            })
            .join(" OR ");
        format!("({alternatives})")
    }
}

/// Format a keyword or author name for matching.
///
/// Multi-word phrases are quoted so they match as an exact phrase; single
/// words are left bare. Blank input yields `None`.
pub fn format_phrase(phrase: &str) -> Option<String> {
    let phrase = phrase.trim();
    if phrase.is_empty() {
        None
    } else if phrase.contains(char::is_whitespace) {
        Some(format!("\"{phrase}\""))
    } else {
        Some(phrase.to_string())
    }
}

/// Wrap a formatted term in double quotes unless it already is a quoted
/// phrase, so every term ends up quoted exactly once.
fn quote_once(term: String) -> String {
    if term.len() >= 2 && term.starts_with('"') && term.ends_with('"') {
        term
    } else {
        format!("\"{term}\"")
    }
}

/// Keyword and author terms, each quoted for the `ti`/`abs`/`au` fields.
fn phrases(values: &[String]) -> Vec<String> {
    values
        .iter()
        .filter_map(|v| format_phrase(v))
        .map(quote_once)
        .collect()
}

fn categories(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// A complete search request: AND-ed clauses plus the result limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    clauses: Vec<Clause>,
    max_results: u32,
}

impl SearchQuery {
    /// Build the query for the configured categories, keywords and authors.
    ///
    /// Keywords are matched against both titles and abstracts. Empty lists
    /// contribute no clause; when all three are empty the query is
    /// unfiltered and simply asks for the newest `max_results` papers.
    pub fn from_filters(filters: &SearchFilters) -> Self {
        let clauses = [
            Clause::new(&[Field::Category], categories(&filters.categories)),
            Clause::new(&[Field::Title, Field::Abstract], phrases(&filters.keywords)),
            Clause::new(&[Field::Author], phrases(&filters.authors)),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self {
            clauses,
            max_results: filters.max_results,
        }
    }

    /// The unencoded boolean expression; empty for an unfiltered query.
    pub fn expression(&self) -> String {
        self.clauses.iter().map(Clause::expression).join(" AND ")
    }

    /// The full request URL on `base`, sorted newest submission first.
    ///
    /// Any query string already on `base` is replaced.
    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("search_query", &self.expression())
            .append_pair("start", "0")
            .append_pair("max_results", &self.max_results.to_string())
            .append_pair("sortBy", "submittedDate")
            .append_pair("sortOrder", "descending");
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(categories: &[&str], keywords: &[&str], authors: &[&str]) -> SearchFilters {
        let owned = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        SearchFilters {
            categories: owned(categories),
            keywords: owned(keywords),
            authors: owned(authors),
            max_results: 10,
        }
    }

    fn base() -> Url {
        Url::parse(ARXIV_API_URL).unwrap()
    }

    #[test]
    fn test_format_phrase_quotes_multi_word() {
        assert_eq!(
            format_phrase("quantum computing").as_deref(),
            Some("\"quantum computing\"")
        );
    }

    #[test]
    fn test_format_phrase_single_word_is_bare() {
        assert_eq!(format_phrase("AI").as_deref(), Some("AI"));
        assert_eq!(format_phrase("  AI  ").as_deref(), Some("AI"));
    }

    #[test]
    fn test_format_phrase_blank() {
        assert_eq!(format_phrase("   "), None);
        assert_eq!(format_phrase(""), None);
    }

    #[test]
    fn test_categories_only() {
        let q = SearchQuery::from_filters(&filters(&["cs.AI", "cs.LG"], &[], &[]));
        assert_eq!(q.expression(), "(cat:cs.AI OR cat:cs.LG)");
    }

    #[test]
    fn test_keywords_match_title_then_abstract() {
        let q = SearchQuery::from_filters(&filters(&[], &["quantum computing", "AI"], &[]));
        assert_eq!(
            q.expression(),
            "(ti:\"quantum computing\" OR ti:\"AI\" OR abs:\"quantum computing\" OR abs:\"AI\")"
        );
    }

    #[test]
    fn test_all_fields_and_joined_in_order() {
        let q = SearchQuery::from_filters(&filters(
            &["cs.LG"],
            &["transformer"],
            &["Ada Lovelace", "Turing"],
        ));
        assert_eq!(
            q.expression(),
            "(cat:cs.LG) AND (ti:\"transformer\" OR abs:\"transformer\") AND (au:\"Ada Lovelace\" OR au:\"Turing\")"
        );
    }

    #[test]
    fn test_authors_without_categories_has_no_leading_and() {
        let q = SearchQuery::from_filters(&filters(&[], &[], &["Hinton"]));
        assert_eq!(q.expression(), "(au:\"Hinton\")");
    }

    #[test]
    fn test_empty_filters_produce_empty_expression() {
        let q = SearchQuery::from_filters(&filters(&[], &[], &[]));
        assert_eq!(q.expression(), "");
        let url = q.to_url(&base());
        assert!(url.as_str().contains("search_query=&start=0"), "{url}");
    }

    #[test]
    fn test_blank_terms_are_skipped() {
        let q = SearchQuery::from_filters(&filters(&[" ", "cs.CL"], &[""], &["  "]));
        assert_eq!(q.expression(), "(cat:cs.CL)");
    }

    #[test]
    fn test_url_encoding() {
        let q = SearchQuery::from_filters(&filters(&["cs.AI"], &["quantum computing"], &[]));
        let url = q.to_url(&base());
        let s = url.as_str();
        assert!(s.starts_with("http://export.arxiv.org/api/query?search_query=%28cat"));
        assert!(s.contains("%22quantum+computing%22"), "{s}");
        assert!(s.contains("%29+AND+%28"), "{s}");
        assert!(!s.contains(' '));
    }

    #[test]
    fn test_url_parameters() {
        let mut f = filters(&["cs.AI"], &[], &[]);
        f.max_results = 25;
        let url = SearchQuery::from_filters(&f).to_url(&base());
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("search_query".to_string(), "(cat:cs.AI)".to_string()),
                ("start".to_string(), "0".to_string()),
                ("max_results".to_string(), "25".to_string()),
                ("sortBy".to_string(), "submittedDate".to_string()),
                ("sortOrder".to_string(), "descending".to_string()),
            ]
        );
    }

    #[test]
    fn test_to_url_replaces_existing_query() {
        let base = Url::parse("http://localhost:8080/api/query?stale=1").unwrap();
        let url = SearchQuery::from_filters(&filters(&[], &[], &[])).to_url(&base);
        assert!(!url.as_str().contains("stale"));
        assert_eq!(url.path(), "/api/query");
    }

    #[test]
    fn test_single_word_terms_quoted_in_clauses() {
        let q = SearchQuery::from_filters(&filters(&["cs.AI"], &["AI"], &["Hinton"]));
        assert_eq!(
            q.expression(),
            "(cat:cs.AI) AND (ti:\"AI\" OR abs:\"AI\") AND (au:\"Hinton\")"
        );
        let url = q.to_url(&base());
        assert!(url.as_str().contains("ti%3A%22AI%22"), "{url}");
        assert!(url.as_str().contains("au%3A%22Hinton%22"), "{url}");
        assert!(url.as_str().contains("cat%3Acs.AI"), "{url}");
    }

    #[test]
    fn test_phrases_are_not_double_quoted() {
        let q = SearchQuery::from_filters(&filters(&[], &[], &["Ada Lovelace"]));
        assert_eq!(q.expression(), "(au:\"Ada Lovelace\")");
        assert!(!q.expression().contains("\"\""));
    }

    #[test]
    fn test_clause_requires_terms() {
        assert!(Clause::new(&[Field::Author], vec![]).is_none());
    }
}
