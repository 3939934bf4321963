//! Documentation page search.
//!
//! Matching follows the command-palette convention: substring matches on
//! title, keywords and category, then a loose in-order character match on
//! the title so `dtpk` still finds "Date Picker".

use std::cmp::Reverse;
use std::fs;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DocsError;

/// Score for a title equal to the query.
pub const SCORE_EXACT: u32 = 100;
/// Score for a title starting with the query.
pub const SCORE_PREFIX: u32 = 80;
/// Score for a title containing the query.
pub const SCORE_TITLE: u32 = 60;
/// Score for a keyword containing the query.
pub const SCORE_KEYWORD: u32 = 40;
/// Score for a category containing the query.
pub const SCORE_CATEGORY: u32 = 30;
/// Score for query characters appearing in order in the title.
pub const SCORE_FUZZY: u32 = 10;

/// One searchable documentation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocEntry {
    /// Page title, e.g. "Date Picker".
    pub title: String,
    /// Page URL path.
    pub href: String,
    /// Sidebar section, e.g. "Components".
    pub category: String,
    /// Extra search terms.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A matching entry and its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    /// The matched page.
    pub entry: &'a DocEntry,
    /// Match strength; higher is better.
    pub score: u32,
}

/// Loads a JSON array of [`DocEntry`] values.
///
/// # Errors
///
/// Returns [`DocsError::Io`] if the file cannot be read or
/// [`DocsError::Parse`] if it is not a valid index.
pub fn load_index(path: &Utf8Path) -> Result<Vec<DocEntry>, DocsError> {
    let contents = fs::read_to_string(path).map_err(|err| DocsError::io(path, err))?;
    let entries: Vec<DocEntry> =
        serde_json::from_str(&contents).map_err(|err| DocsError::parse(path, err))?;
    debug!(path = %path, entries = entries.len(), "Loaded search index");
    Ok(entries)
}

/// Scores one entry against a lowercased, trimmed query.
///
/// Returns `None` if the entry does not match.
#[must_use]
pub fn score(entry: &DocEntry, query: &str) -> Option<u32> {
    let title = entry.title.to_lowercase();

    if title == query {
        Some(SCORE_EXACT)
    } else if title.starts_with(query) {
        Some(SCORE_PREFIX)
    } else if title.contains(query) {
        Some(SCORE_TITLE)
    } else if entry
        .keywords
        .iter()
        .any(|keyword| keyword.to_lowercase().contains(query))
    {
        Some(SCORE_KEYWORD)
    } else if entry.category.to_lowercase().contains(query) {
        Some(SCORE_CATEGORY)
    } else if is_subsequence(query, &title) {
        Some(SCORE_FUZZY)
    } else {
        None
    }
}

/// Returns up to `limit` matching entries, best first.
///
/// Ties are ordered by title. An empty or blank query matches nothing.
///
/// # Examples
///
/// ```
/// use ud_docs::{DocEntry, search};
///
/// let entry = |title: &str| DocEntry {
///     title: title.to_owned(),
///     href: format!("/docs/{}", title.to_lowercase().replace(' ', "-")),
///     category: "Components".to_owned(),
///     keywords: Vec::new(),
/// };
/// let entries = [entry("Date Picker"), entry("Calendar"), entry("Data Table")];
///
/// let hits = search(&entries, "da", 10);
/// let titles: Vec<_> = hits.iter().map(|hit| hit.entry.title.as_str()).collect();
/// assert_eq!(titles, ["Data Table", "Date Picker", "Calendar"]);
/// ```
#[must_use]
pub fn search<'a>(entries: &'a [DocEntry], query: &str, limit: usize) -> Vec<SearchHit<'a>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit<'a>> = entries
        .iter()
        .filter_map(|entry| score(entry, &query).map(|score| SearchHit { entry, score }))
        .collect();
    hits.sort_by(|a, b| {
        (Reverse(a.score), &a.entry.title).cmp(&(Reverse(b.score), &b.entry.title))
    });
    hits.truncate(limit);
    hits
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut chars = haystack.chars();
    needle.chars().all(|nc| chars.any(|hc| hc == nc))
}
