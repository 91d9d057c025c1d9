//! Case-insensitive literal matching of the query text

use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};

/// Matches the literal query text anywhere in a string, ignoring case
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    query: String,
    pattern: Regex,
}

impl QueryMatcher {
    pub fn new(query: &str) -> Result<Self> {
        let pattern = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
            .map_err(|error| Error::InvalidInput(format!("unusable query text: {error}")))?;
        Ok(Self {
            query: query.to_string(),
            pattern,
        })
    }

    /// The query as given
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Byte range of the first match
    pub fn find(&self, text: &str) -> Option<Range<usize>> {
        self.pattern.find(text).map(|m| m.range())
    }

    /// Byte ranges of every non-overlapping match
    pub fn find_iter<'t>(&'t self, text: &'t str) -> impl Iterator<Item = Range<usize>> + 't {
        self.pattern.find_iter(text).map(|m| m.range())
    }

    /// Character index of the first match, or -1 when there is none
    pub fn char_position(&self, text: &str) -> i64 {
        self.find(text).map_or(-1, |range| {
            i64::try_from(text[..range.start].chars().count()).unwrap_or(i64::MAX)
        })
    }
}

impl PartialEq for QueryMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.query == other.query
    }
}

impl Eq for QueryMatcher {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_ignoring_case() {
        let matcher = QueryMatcher::new("Quick").unwrap();
        assert!(matcher.is_match("the QUICK fox"));
        assert_eq!(matcher.find("the quick fox"), Some(4..9));
        assert!(!matcher.is_match("the slow fox"));
    }

    #[test]
    fn treats_query_literally() {
        let matcher = QueryMatcher::new("a.b (c)").unwrap();
        assert!(matcher.is_match("see A.B (C) here"));
        assert!(!matcher.is_match("axb (c)"));
    }

    #[test]
    fn char_position_counts_characters() {
        let matcher = QueryMatcher::new("fox").unwrap();
        assert_eq!(matcher.char_position("h\u{e9}llo fox"), 6);
        assert_eq!(matcher.char_position("no match"), -1);
    }

    #[test]
    fn find_iter_returns_all_matches() {
        let matcher = QueryMatcher::new("ab").unwrap();
        let ranges = matcher.find_iter("ab AB aB").collect::<Vec<_>>();
        assert_eq!(ranges, vec![0..2, 3..5, 6..8]);
    }
}
