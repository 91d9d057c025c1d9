//! In-memory document store

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DocumentStore, StoreQuery};
use crate::error::Result;
use crate::models::{ContentItem, PagedList};

/// Keeps every item in a vector and filters with [`crate::search::Predicate::matches`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<Vec<ContentItem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<ContentItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    pub async fn insert(&self, item: ContentItem) {
        self.items.write().await.push(item);
    }

    pub async fn extend(&self, items: impl IntoIterator<Item = ContentItem>) {
        self.items.write().await.extend(items);
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query(&self, query: &StoreQuery) -> Result<PagedList<ContentItem>> {
        let mut matched = {
            let items = self.items.read().await;
            items
                .iter()
                .filter(|item| item.tier == query.tier && query.filter.matches(item))
                .cloned()
                .collect::<Vec<_>>()
        };
        query.order.sort(&mut matched);

        let total = matched.len() as u64;
        let page = matched
            .into_iter()
            .skip(query.offset())
            .take(query.limit())
            .collect();

        Ok(PagedList::new(
            page,
            query.page_number,
            query.page_size,
            Some(total),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentTier, SortKey};
    use crate::search::{Clause, OrderBy, Predicate};

    fn query(tier: ContentTier, filter: Predicate, page: u32, size: u32) -> StoreQuery {
        StoreQuery {
            tier,
            filter,
            order: OrderBy::new(SortKey::Title, false, None),
            page_number: page,
            page_size: size,
        }
    }

    #[tokio::test]
    async fn filters_by_tier_and_predicate() {
        let store = MemoryStore::new();
        store
            .extend([
                ContentItem::article("a", ""),
                ContentItem::article("b", "").deleted(),
                ContentItem::category("c", ""),
            ])
            .await;
        assert_eq!(store.len().await, 3);

        let page = store
            .query(&query(
                ContentTier::Article,
                Predicate::new().and(Clause::NotDeleted),
                1,
                10,
            ))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.items[0].title, "a");
        assert_eq!(page.total_count, Some(1));
    }

    #[tokio::test]
    async fn pages_after_sorting() {
        let store = MemoryStore::from_items(vec![
            ContentItem::article("c", ""),
            ContentItem::article("a", ""),
            ContentItem::article("b", ""),
        ]);

        let page = store
            .query(&query(ContentTier::Article, Predicate::new(), 2, 2))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "c");
        assert_eq!(page.total_count, Some(3));
        assert_eq!(page.page_number, 2);
    }
}
