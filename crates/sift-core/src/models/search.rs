//! Search request and result models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{ContentTier, ItemId};
use crate::util::normalize_text_option;

/// Page size used when a request does not name one
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// How hits are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SortKey {
    /// Title hits, then body hits, then earliest body hit, then title
    #[default]
    Relevance,
    /// Creation/edit timestamp
    Timestamp,
    /// Title, alphabetically
    Title,
}

impl SortKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Timestamp => "timestamp",
            Self::Title => "title",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    /// Anything other than `timestamp` or `title` means relevance
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Ok(if key.eq_ignore_ascii_case("timestamp") {
            Self::Timestamp
        } else if key.eq_ignore_ascii_case("title") {
            Self::Title
        } else {
            Self::Relevance
        })
    }
}

impl From<String> for SortKey {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_default()
    }
}

/// A structured search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    /// Text to look for in titles and bodies
    pub query: String,
    /// Restrict to a single domain; `None` searches un-domained content
    pub domain: Option<String>,
    /// `;`-separated namespaces, `!` prefix excludes
    pub namespace: Option<String>,
    /// `;`-separated owner ids, `!` prefix excludes
    pub owner: Option<String>,
    /// `;`-separated uploader ids, `!` prefix excludes (files only)
    pub uploader: Option<String>,
    pub sort: SortKey,
    pub descending: bool,
    /// 1-based page number
    pub page_number: u32,
    pub page_size: u32,
    /// Only match the query against titles
    pub title_match_only: bool,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            domain: None,
            namespace: None,
            owner: None,
            uploader: None,
            sort: SortKey::Relevance,
            descending: false,
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            title_match_only: false,
        }
    }
}

impl SearchRequest {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    #[must_use]
    pub fn with_uploader(mut self, uploader: impl Into<String>) -> Self {
        self.uploader = Some(uploader.into());
        self
    }

    #[must_use]
    pub const fn with_sort(mut self, sort: SortKey, descending: bool) -> Self {
        self.sort = sort;
        self.descending = descending;
        self
    }

    #[must_use]
    pub const fn with_page(mut self, page_number: u32, page_size: u32) -> Self {
        self.page_number = page_number;
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub const fn title_only(mut self) -> Self {
        self.title_match_only = true;
        self
    }

    /// Copy with trimmed text, blank filters dropped and positive paging.
    #[must_use]
    pub fn normalized(&self, default_page_size: u32) -> Self {
        let default_page_size = if default_page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            default_page_size
        };
        Self {
            query: self.query.trim().to_string(),
            domain: normalize_text_option(self.domain.clone()),
            namespace: normalize_text_option(self.namespace.clone()),
            owner: normalize_text_option(self.owner.clone()),
            uploader: normalize_text_option(self.uploader.clone()),
            sort: self.sort,
            descending: self.descending,
            page_number: self.page_number.max(1),
            page_size: if self.page_size == 0 {
                default_page_size
            } else {
                self.page_size
            },
            title_match_only: self.title_match_only,
        }
    }

    /// True when there is nothing to search for at all
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
            && [&self.domain, &self.namespace, &self.owner, &self.uploader]
                .into_iter()
                .all(|field| field.as_deref().map_or(true, |v| v.trim().is_empty()))
    }
}

/// One page of an ordered result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page_number: u32,
    pub page_size: u32,
    /// Total matches across all pages, `None` when the store cannot tell
    pub total_count: Option<u64>,
}

impl<T> PagedList<T> {
    #[must_use]
    pub const fn new(
        items: Vec<T>,
        page_number: u32,
        page_size: u32,
        total_count: Option<u64>,
    ) -> Self {
        Self {
            items,
            page_number,
            page_size,
            total_count,
        }
    }

    #[must_use]
    pub const fn empty(page_number: u32, page_size: u32) -> Self {
        Self::new(Vec::new(), page_number, page_size, Some(0))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Convert the items, keeping paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_count: self.total_count,
        }
    }
}

/// A single search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ItemId,
    pub tier: ContentTier,
    pub title: String,
    pub namespace: String,
    pub domain: Option<String>,
    /// Title with domain and namespace prefixes
    pub full_title: String,
    /// HTML-safe text window with highlighted matches (articles and categories)
    pub excerpt: Option<String>,
}

/// Search results along with the normalized request they answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    pub descending: bool,
    pub sort: SortKey,
    pub domain: Option<String>,
    pub namespace: Option<String>,
    pub owner: Option<String>,
    pub uploader: Option<String>,
    pub hits: PagedList<SearchHit>,
}

impl SearchResult {
    /// A result with no hits echoing `request`
    #[must_use]
    pub fn empty(request: &SearchRequest) -> Self {
        Self::with_hits(
            request,
            PagedList::empty(request.page_number, request.page_size),
        )
    }

    #[must_use]
    pub fn with_hits(request: &SearchRequest, hits: PagedList<SearchHit>) -> Self {
        Self {
            query: request.query.clone(),
            descending: request.descending,
            sort: request.sort,
            domain: request.domain.clone(),
            namespace: request.namespace.clone(),
            owner: request.owner.clone(),
            uploader: request.uploader.clone(),
            hits,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
