//! Filter clauses and their AND-composition.
//!
//! A `Predicate` is a flat conjunction of `Clause`s. Each clause is
//! independently optional: the engine adds only the ones a request asks for.
//! Stores either evaluate the predicate in memory through [`Predicate::matches`]
//! or walk [`Predicate::clauses`] and lower them to their own query language.

use super::filter::FilterList;
use super::matcher::QueryMatcher;
use super::visibility::is_visible;
use crate::models::{ContentItem, Identity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Item is not soft-deleted
    NotDeleted,
    /// Title contains the query, or body does unless `title_only`
    Text {
        matcher: QueryMatcher,
        title_only: bool,
    },
    /// Domain equality; `None` matches only un-domained items
    Domain(Option<String>),
    /// Lowercased namespace is one of these (entries are lowercase)
    NamespaceIn(Vec<String>),
    /// Lowercased namespace is none of these (entries are lowercase)
    NamespaceNotIn(Vec<String>),
    OwnerIn(Vec<String>),
    OwnerNotIn(Vec<String>),
    UploaderIn(Vec<String>),
    UploaderNotIn(Vec<String>),
    /// Item is visible to this caller (`None` = anonymous)
    VisibleTo(Option<Identity>),
}

impl Clause {
    pub fn matches(&self, item: &ContentItem) -> bool {
        match self {
            Self::NotDeleted => !item.is_deleted,
            Self::Text {
                matcher,
                title_only,
            } => matcher.is_match(&item.title) || (!title_only && matcher.is_match(&item.markdown)),
            Self::Domain(domain) => item.domain.as_deref() == domain.as_deref(),
            Self::NamespaceIn(names) => names.contains(&item.namespace.to_lowercase()),
            Self::NamespaceNotIn(names) => !names.contains(&item.namespace.to_lowercase()),
            Self::OwnerIn(ids) => member_of(item.owner.as_deref(), ids),
            Self::OwnerNotIn(ids) => !member_of(item.owner.as_deref(), ids),
            Self::UploaderIn(ids) => member_of(item.uploader.as_deref(), ids),
            Self::UploaderNotIn(ids) => !member_of(item.uploader.as_deref(), ids),
            Self::VisibleTo(identity) => is_visible(item, identity.as_ref()),
        }
    }
}

fn member_of(value: Option<&str>, ids: &[String]) -> bool {
    value.is_some_and(|v| ids.iter().any(|id| id == v))
}

/// Conjunction of clauses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub const fn new() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    #[must_use]
    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// AND the clause in when there is one
    #[must_use]
    pub fn and_maybe(self, clause: Option<Clause>) -> Self {
        match clause {
            Some(clause) => self.and(clause),
            None => self,
        }
    }

    /// AND in both halves of a filter list; empty halves add nothing
    #[must_use]
    pub fn and_filter(
        self,
        list: &FilterList,
        included: fn(Vec<String>) -> Clause,
        excluded: fn(Vec<String>) -> Clause,
    ) -> Self {
        let include = (!list.included.is_empty()).then(|| included(list.included.clone()));
        let exclude = (!list.excluded.is_empty()).then(|| excluded(list.excluded.clone()));
        self.and_maybe(include).and_maybe(exclude)
    }

    /// Combine two predicates; AND is associative so order is irrelevant
    #[must_use]
    pub fn and_all(mut self, other: Self) -> Self {
        self.clauses.extend(other.clauses);
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Every clause holds; the empty predicate matches everything
    pub fn matches(&self, item: &ContentItem) -> bool {
        self.clauses.iter().all(|clause| clause.matches(item))
    }
}
