//! Document store abstraction
//!
//! The engine never reads items directly; it hands a [`StoreQuery`] to a
//! [`DocumentStore`] and gets back one ordered page.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ContentItem, ContentTier, PagedList};
use crate::search::{OrderBy, Predicate};

/// One paged, ordered query against a single tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreQuery {
    pub tier: ContentTier,
    pub filter: Predicate,
    pub order: OrderBy,
    /// 1-based
    pub page_number: u32,
    pub page_size: u32,
}

impl StoreQuery {
    /// Number of items to skip before the requested page
    pub fn offset(&self) -> usize {
        self.page_number.saturating_sub(1) as usize * self.page_size as usize
    }

    pub const fn limit(&self) -> usize {
        self.page_size as usize
    }
}

/// Read-only access to stored content items
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Items of `query.tier` matching `query.filter`, ordered and paged
    async fn query(&self, query: &StoreQuery) -> Result<PagedList<ContentItem>>;
}
