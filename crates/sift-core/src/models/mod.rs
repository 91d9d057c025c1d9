//! Data models for Sift

mod identity;
mod item;
mod search;

pub use identity::{Identity, Permission};
pub use item::{
    full_title, ContentItem, ContentTier, ItemId, CATEGORY_NAMESPACE, DEFAULT_NAMESPACE,
    FILE_NAMESPACE,
};
pub use search::{
    PagedList, SearchHit, SearchRequest, SearchResult, SortKey, DEFAULT_PAGE_SIZE,
};
