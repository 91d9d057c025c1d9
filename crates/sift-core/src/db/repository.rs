//! Content item repository implementation

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Error, Result};
use crate::models::{ContentItem, ContentTier, ItemId};

/// Columns in the order [`SqliteItemRepository::parse_item`] reads them
pub(crate) const ITEM_COLUMNS: &str = "id, tier, title, namespace, domain, markdown, owner, \
     allowed_editors, allowed_viewers, uploader, is_deleted, timestamp";

/// Trait for content item storage operations
pub trait ItemRepository {
    /// Store a new item
    fn create(&self, item: ContentItem) -> Result<ContentItem>;

    /// Get a live (not deleted) item by ID
    fn get(&self, id: &ItemId) -> Result<Option<ContentItem>>;

    /// List live items, newest first, optionally restricted to one tier
    fn list(&self, tier: Option<ContentTier>, limit: usize, offset: usize)
        -> Result<Vec<ContentItem>>;

    /// Replace an item's content and bump its timestamp
    fn update(&self, item: &ContentItem) -> Result<ContentItem>;

    /// Soft delete an item
    fn delete(&self, id: &ItemId) -> Result<()>;

    /// Insert or replace a batch of items in one transaction
    fn import(&self, items: &[ContentItem]) -> Result<usize>;
}

/// `SQLite` implementation of `ItemRepository`
pub struct SqliteItemRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteItemRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse an item from a row selected with [`ITEM_COLUMNS`]
    pub(crate) fn parse_item(row: &Row<'_>) -> rusqlite::Result<ContentItem> {
        let id: String = row.get(0)?;
        let tier: String = row.get(1)?;
        Ok(ContentItem {
            id: id.parse().map_err(|e: uuid::Error| conversion_failure(0, e))?,
            tier: tier.parse().map_err(|e: Error| conversion_failure(1, e))?,
            title: row.get(2)?,
            namespace: row.get(3)?,
            domain: row.get(4)?,
            markdown: row.get(5)?,
            owner: row.get(6)?,
            allowed_editors: parse_json_list(row, 7)?,
            allowed_viewers: parse_json_list(row, 8)?,
            uploader: row.get(9)?,
            is_deleted: row.get::<_, i32>(10)? != 0,
            timestamp: row.get(11)?,
        })
    }

    fn write(&self, verb: &str, item: &ContentItem) -> Result<()> {
        self.conn.execute(
            &format!(
                "{verb} INTO items ({ITEM_COLUMNS})
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
            ),
            params![
                item.id.as_str(),
                item.tier.as_str(),
                item.title,
                item.namespace,
                item.domain,
                item.markdown,
                item.owner,
                to_json_list(item.allowed_editors.as_deref())?,
                to_json_list(item.allowed_viewers.as_deref())?,
                item.uploader,
                i32::from(item.is_deleted),
                item.timestamp,
            ],
        )?;
        Ok(())
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn create(&self, item: ContentItem) -> Result<ContentItem> {
        if item.title.trim().is_empty() {
            return Err(Error::InvalidInput("Item title cannot be empty".into()));
        }
        self.write("INSERT", &item)?;
        Ok(item)
    }

    fn get(&self, id: &ItemId) -> Result<Option<ContentItem>> {
        let item = self
            .conn
            .query_row(
                &format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ? AND is_deleted = 0"),
                params![id.as_str()],
                Self::parse_item,
            )
            .optional()?;
        Ok(item)
    }

    fn list(
        &self,
        tier: Option<ContentTier>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ContentItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS}
             FROM items
             WHERE is_deleted = 0 AND (?1 IS NULL OR tier = ?1)
             ORDER BY timestamp DESC, id DESC
             LIMIT ?2 OFFSET ?3"
        ))?;

        let items = stmt
            .query_map(
                params![
                    tier.map(ContentTier::as_str),
                    i64::try_from(limit).unwrap_or(i64::MAX),
                    i64::try_from(offset).unwrap_or(i64::MAX),
                ],
                Self::parse_item,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(items)
    }

    fn update(&self, item: &ContentItem) -> Result<ContentItem> {
        let now = chrono::Utc::now().timestamp_millis();

        let rows = self.conn.execute(
            "UPDATE items
             SET title = ?, namespace = ?, domain = ?, markdown = ?, owner = ?,
                 allowed_editors = ?, allowed_viewers = ?, uploader = ?, timestamp = ?
             WHERE id = ? AND is_deleted = 0",
            params![
                item.title,
                item.namespace,
                item.domain,
                item.markdown,
                item.owner,
                to_json_list(item.allowed_editors.as_deref())?,
                to_json_list(item.allowed_viewers.as_deref())?,
                item.uploader,
                now,
                item.id.as_str(),
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(item.id.to_string()));
        }

        self.get(&item.id)?
            .ok_or_else(|| Error::NotFound(item.id.to_string()))
    }

    fn delete(&self, id: &ItemId) -> Result<()> {
        let now = chrono::Utc::now().timestamp_millis();

        let rows = self.conn.execute(
            "UPDATE items SET is_deleted = 1, timestamp = ? WHERE id = ? AND is_deleted = 0",
            params![now, id.as_str()],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn import(&self, items: &[ContentItem]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        for item in items {
            self.write("INSERT OR REPLACE", item)?;
        }
        tx.commit()?;
        Ok(items.len())
    }
}

fn to_json_list(list: Option<&[String]>) -> Result<Option<String>> {
    Ok(list.map(serde_json::to_string).transpose()?)
}

fn parse_json_list(row: &Row<'_>, index: usize) -> rusqlite::Result<Option<Vec<String>>> {
    let raw: Option<String> = row.get(index)?;
    raw.map(|raw| serde_json::from_str(&raw).map_err(|e| conversion_failure(index, e)))
        .transpose()
}

fn conversion_failure(
    index: usize,
    error: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use pretty_assertions::assert_eq;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let db = setup();
        let repo = SqliteItemRepository::new(db.connection());

        let item = repo
            .create(
                ContentItem::article("Hello", "world")
                    .with_domain("lab")
                    .with_owner("alice")
                    .with_allowed_viewers(["bob", "staff"]),
            )
            .unwrap();

        let fetched = repo.get(&item.id).unwrap().unwrap();
        assert_eq!(fetched, item);
    }

    #[test]
    fn test_create_rejects_blank_title() {
        let db = setup();
        let repo = SqliteItemRepository::new(db.connection());

        let err = repo.create(ContentItem::article("  ", "")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_list_by_tier_newest_first() {
        let db = setup();
        let repo = SqliteItemRepository::new(db.connection());

        repo.create(ContentItem::article("Old", "").with_timestamp(1))
            .unwrap();
        repo.create(ContentItem::article("New", "").with_timestamp(2))
            .unwrap();
        repo.create(ContentItem::category("Cat", "").with_timestamp(3))
            .unwrap();

        let articles = repo.list(Some(ContentTier::Article), 10, 0).unwrap();
        let titles: Vec<_> = articles.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Old"]);

        assert_eq!(repo.list(None, 10, 0).unwrap().len(), 3);
        assert_eq!(repo.list(None, 1, 1).unwrap()[0].title, "New");
    }

    #[test]
    fn test_list_clamps_oversized_paging() {
        let db = setup();
        let repo = SqliteItemRepository::new(db.connection());
        repo.create(ContentItem::article("Only", "")).unwrap();

        assert_eq!(repo.list(None, usize::MAX, 0).unwrap().len(), 1);
        assert!(repo.list(None, usize::MAX, usize::MAX).unwrap().is_empty());
    }

    #[test]
    fn test_update() {
        let db = setup();
        let repo = SqliteItemRepository::new(db.connection());

        let mut item = repo
            .create(ContentItem::article("Original", "").with_timestamp(0))
            .unwrap();
        item.markdown = "Updated body".into();
        item.allowed_editors = Some(vec!["carol".into()]);

        let updated = repo.update(&item).unwrap();
        assert_eq!(updated.markdown, "Updated body");
        assert_eq!(updated.allowed_editors, Some(vec!["carol".to_string()]));
        assert!(updated.timestamp > 0);
    }

    #[test]
    fn test_update_missing_item() {
        let db = setup();
        let repo = SqliteItemRepository::new(db.connection());

        let err = repo.update(&ContentItem::article("Ghost", "")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_delete() {
        let db = setup();
        let repo = SqliteItemRepository::new(db.connection());

        let item = repo.create(ContentItem::article("To delete", "")).unwrap();
        repo.delete(&item.id).unwrap();

        assert!(repo.get(&item.id).unwrap().is_none());
        assert!(repo.list(None, 10, 0).unwrap().is_empty());
        assert!(matches!(repo.delete(&item.id), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_import_replaces_existing() {
        let db = setup();
        let repo = SqliteItemRepository::new(db.connection());

        let item = repo.create(ContentItem::article("First", "")).unwrap();
        let mut replacement = item.clone();
        replacement.title = "Second".into();

        let count = repo
            .import(&[replacement, ContentItem::file("a.png", "", "alice")])
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(repo.get(&item.id).unwrap().unwrap().title, "Second");
        assert_eq!(repo.list(Some(ContentTier::File), 10, 0).unwrap().len(), 1);
    }
}
