//! Result ordering

use std::cmp::Ordering;

use super::matcher::QueryMatcher;
use crate::models::{ContentItem, SortKey};

/// How a store should order a result set before paging it.
///
/// Relevance ranks title hits first, then body hits, then the earliest body
/// hit, then title. `descending` reverses every key, including the body
/// position, and the title and id tie-breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub key: SortKey,
    pub descending: bool,
    /// Query used by relevance ranking
    pub matcher: Option<QueryMatcher>,
}

impl OrderBy {
    pub const fn new(key: SortKey, descending: bool, matcher: Option<QueryMatcher>) -> Self {
        Self {
            key,
            descending,
            matcher,
        }
    }

    /// Total order over items; ties are broken by title, then id
    pub fn compare(&self, a: &ContentItem, b: &ContentItem) -> Ordering {
        let primary = match self.key {
            SortKey::Timestamp => a.timestamp.cmp(&b.timestamp),
            SortKey::Title => Ordering::Equal,
            SortKey::Relevance => self.matcher.as_ref().map_or(Ordering::Equal, |matcher| {
                relevance_key(matcher, a).cmp(&relevance_key(matcher, b))
            }),
        };

        let ordering = primary
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.id.cmp(&b.id));

        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }

    /// Sort in place
    pub fn sort(&self, items: &mut [ContentItem]) {
        items.sort_by(|a, b| self.compare(a, b));
    }
}

/// `(misses title, misses body, body position)`; smaller ranks first
fn relevance_key(matcher: &QueryMatcher, item: &ContentItem) -> (bool, bool, i64) {
    let position = matcher.char_position(&item.markdown);
    (!matcher.is_match(&item.title), position < 0, position)
}
