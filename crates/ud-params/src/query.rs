//! Query-string representations.
//!
//! The binder never owns navigation. It reads a [`RawQueryParams`] mapping
//! supplied by the URL layer and emits a [`QueryUpdate`] for that layer to
//! apply. [`QueryString`] is a minimal URL layer: it parses and renders
//! `application/x-www-form-urlencoded` strings and applies updates with
//! merge-with-existing semantics.

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashMap;
use serde::Serialize;

/// Query text of an explicit null.
///
/// Coercion reads it back as null only for fields declared nullable; for
/// other fields it is ordinary text.
pub const NULL_MARKER: &str = "null";

/// Query text of an empty list.
///
/// Array coercion splits it on the comma and drops both empty segments.
pub const EMPTY_LIST_MARKER: &str = ",";

/// The raw value(s) of one query key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// The key appeared once.
    Single(String),
    /// The key was repeated; values are in order of appearance.
    Multiple(Vec<String>),
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        Self::Single(s.to_owned())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        Self::Single(s)
    }
}

impl<S: Into<String>> From<Vec<S>> for QueryValue {
    fn from(values: Vec<S>) -> Self {
        Self::Multiple(values.into_iter().map(Into::into).collect())
    }
}

/// Query parameters keyed by name, as produced by the URL layer.
pub type RawQueryParams = FxHashMap<String, QueryValue>;

/// How one field should appear in the query string after a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryParam {
    /// An explicit null, written as [`NULL_MARKER`].
    Null,
    /// A single value.
    Scalar(String),
    /// Repeated values; an empty list is written as [`EMPTY_LIST_MARKER`].
    List(Vec<String>),
}

/// The query parameters emitted by a successful write.
///
/// Contains every defined field of the new state. Fields that are
/// undefined are absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct QueryUpdate {
    params: BTreeMap<String, QueryParam>,
}

impl QueryUpdate {
    pub(crate) const fn new(params: BTreeMap<String, QueryParam>) -> Self {
        Self { params }
    }

    /// Returns the parameter for a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&QueryParam> {
        self.params.get(name)
    }

    /// Iterates over parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryParam)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// An ordered list of decoded query pairs.
///
/// # Examples
///
/// ```
/// use ud_params::{QueryString, QueryValue};
///
/// let qs = QueryString::parse("?page=2&tag=a&tag=b&q=hello+world");
/// let raw = qs.to_raw();
/// assert_eq!(raw.get("page"), Some(&QueryValue::Single("2".to_owned())));
/// assert_eq!(raw.get("tag"), Some(&QueryValue::from(vec!["a", "b"])));
/// assert_eq!(qs.to_string(), "page=2&tag=a&tag=b&q=hello+world");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    /// Creates an empty query string.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string, with or without the leading `?`.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.strip_prefix('?').unwrap_or(input);
        Self {
            pairs: form_urlencoded::parse(input.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// Returns the decoded pairs in order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Groups the pairs by key.
    #[must_use]
    pub fn to_raw(&self) -> RawQueryParams {
        let mut raw = RawQueryParams::default();
        for (key, value) in &self.pairs {
            match raw.remove(key) {
                None => {
                    raw.insert(key.clone(), QueryValue::Single(value.clone()));
                }
                Some(QueryValue::Single(first)) => {
                    raw.insert(key.clone(), QueryValue::Multiple(vec![first, value.clone()]));
                }
                Some(QueryValue::Multiple(mut values)) => {
                    values.push(value.clone());
                    raw.insert(key.clone(), QueryValue::Multiple(values));
                }
            }
        }
        raw
    }

    /// Applies a write's update, keeping keys it does not mention.
    ///
    /// A replaced key keeps the position of its first occurrence; new keys
    /// are appended. `Null` is written as `key=null` and an empty list as
    /// `key=,` so both survive the next read.
    pub fn apply(&mut self, update: &QueryUpdate) {
        for (key, param) in update.iter() {
            let position = self.pairs.iter().position(|(k, _)| k == key);
            self.pairs.retain(|(k, _)| k != key);

            let replacement: Vec<(String, String)> = match param {
                QueryParam::Null => vec![(key.to_owned(), NULL_MARKER.to_owned())],
                QueryParam::Scalar(value) => vec![(key.to_owned(), value.clone())],
                QueryParam::List(values) if values.is_empty() => {
                    vec![(key.to_owned(), EMPTY_LIST_MARKER.to_owned())]
                }
                QueryParam::List(values) => values
                    .iter()
                    .map(|value| (key.to_owned(), value.clone()))
                    .collect(),
            };

            let at = position.unwrap_or(self.pairs.len()).min(self.pairs.len());
            self.pairs.splice(at..at, replacement);
        }
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish();
        f.write_str(&encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(pairs: &[(&str, QueryParam)]) -> QueryUpdate {
        QueryUpdate::new(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_parse_decodes_percent_and_plus() {
        let qs = QueryString::parse("q=a%2Cb+c&empty=");
        assert_eq!(
            qs.pairs(),
            &[
                ("q".to_owned(), "a,b c".to_owned()),
                ("empty".to_owned(), String::new()),
            ]
        );
    }

    #[test]
    fn test_to_raw_groups_repeated_keys() {
        let raw = QueryString::parse("t=a&t=b&t=c&p=1").to_raw();
        assert_eq!(raw.get("t"), Some(&QueryValue::from(vec!["a", "b", "c"])));
        assert_eq!(raw.get("p"), Some(&QueryValue::from("1")));
        assert_eq!(raw.len(), 2);
    }

    #[test]
    fn test_apply_merges_with_existing() {
        let mut qs = QueryString::parse("ref=home&page=1&tag=x");
        qs.apply(&update(&[
            ("page", QueryParam::Scalar("2".to_owned())),
            ("tag", QueryParam::List(vec!["a".to_owned(), "b".to_owned()])),
            ("sort", QueryParam::Scalar("date".to_owned())),
        ]));
        assert_eq!(qs.to_string(), "ref=home&page=2&tag=a&tag=b&sort=date");
    }

    #[test]
    fn test_apply_writes_null_and_empty_list_markers() {
        let mut qs = QueryString::parse("from=2024&tag=a&tag=b&keep=1");
        qs.apply(&update(&[
            ("from", QueryParam::Null),
            ("tag", QueryParam::List(Vec::new())),
            ("to", QueryParam::Null),
        ]));
        assert_eq!(qs.to_string(), "from=null&tag=%2C&keep=1&to=null");

        let raw = QueryString::parse(&qs.to_string()).to_raw();
        assert_eq!(raw.get("from"), Some(&QueryValue::from(NULL_MARKER)));
        assert_eq!(raw.get("tag"), Some(&QueryValue::from(EMPTY_LIST_MARKER)));
        assert_eq!(raw.get("keep"), Some(&QueryValue::from("1")));
    }

    #[test]
    fn test_display_encodes() {
        let mut qs = QueryString::new();
        qs.apply(&update(&[("q", QueryParam::Scalar("a&b c".to_owned()))]));
        insta::assert_snapshot!(qs.to_string(), @"q=a%26b+c");
    }
}
