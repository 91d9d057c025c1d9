//! [`DocumentStore`] over the `SQLite` items table
//!
//! Predicates and orderings are lowered to SQL so filtering, sorting and
//! paging all happen inside `SQLite`. Text matching folds case with the
//! connection's `unicode_lower` function, so it agrees with `MemoryStore`.
//! Queries run on the blocking thread pool.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::params_from_iter;
use rusqlite::types::Value;

use super::connection::UNICODE_LOWER;
use super::repository::{SqliteItemRepository, ITEM_COLUMNS};
use super::Database;
use crate::error::{Error, Result};
use crate::models::{ContentItem, Identity, PagedList, SortKey};
use crate::search::{Clause, OrderBy};
use crate::store::{DocumentStore, StoreQuery};

/// Search store backed by a single `SQLite` connection
pub struct SqliteStore {
    db: Arc<Mutex<Database>>,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Run `f` with a repository over the store's connection
    pub fn with_repository<T>(
        &self,
        f: impl FnOnce(&SqliteItemRepository<'_>) -> Result<T>,
    ) -> Result<T> {
        let db = lock(&self.db)?;
        f(&SqliteItemRepository::new(db.connection()))
    }
}

fn lock(db: &Mutex<Database>) -> Result<MutexGuard<'_, Database>> {
    db.lock()
        .map_err(|_| Error::Store("database mutex poisoned".into()))
}

/// SQLite integers are signed; anything past `i64::MAX` is clamped
fn sql_integer(value: usize) -> Value {
    Value::Integer(i64::try_from(value).unwrap_or(i64::MAX))
}

fn run(db: &Mutex<Database>, query: &StoreQuery) -> Result<PagedList<ContentItem>> {
    let sql = SqlQuery::lower(query);
    let db = lock(db)?;
    let conn = db.connection();

    let total: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM items WHERE {}", sql.where_clause),
        params_from_iter(sql.where_params.iter()),
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS} FROM items WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
        sql.where_clause, sql.order_clause
    ))?;
    let params = sql
        .where_params
        .iter()
        .chain(&sql.order_params)
        .cloned()
        .chain([
            sql_integer(query.limit()),
            sql_integer(query.offset()),
        ]);
    let items = stmt
        .query_map(params_from_iter(params), SqliteItemRepository::parse_item)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(PagedList::new(
        items,
        query.page_number,
        query.page_size,
        u64::try_from(total).ok(),
    ))
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn query(&self, query: &StoreQuery) -> Result<PagedList<ContentItem>> {
        let db = Arc::clone(&self.db);
        let query = query.clone();
        tokio::task::spawn_blocking(move || run(&db, &query))
            .await
            .map_err(|e| Error::Store(format!("query task failed: {e}")))?
    }
}

/// A [`StoreQuery`] lowered to SQL fragments with positional parameters
#[derive(Debug, Default)]
struct SqlQuery {
    where_clause: String,
    where_params: Vec<Value>,
    order_clause: String,
    order_params: Vec<Value>,
}

impl SqlQuery {
    fn lower(query: &StoreQuery) -> Self {
        let mut sql = Self::default();
        let mut conditions = vec!["tier = ?".to_string()];
        sql.where_params.push(text(query.tier.as_str()));

        for clause in query.filter.clauses() {
            conditions.push(sql.lower_clause(clause));
        }
        sql.where_clause = conditions.join(" AND ");
        sql.lower_order(&query.order);
        sql
    }

    fn lower_clause(&mut self, clause: &Clause) -> String {
        match clause {
            Clause::NotDeleted => "is_deleted = 0".into(),
            Clause::Text {
                matcher,
                title_only,
            } => {
                let needle = matcher.query().to_lowercase();
                self.where_params.push(text(&needle));
                if *title_only {
                    format!("instr({UNICODE_LOWER}(title), ?) > 0")
                } else {
                    self.where_params.push(text(&needle));
                    format!(
                        "(instr({UNICODE_LOWER}(title), ?) > 0 \
                         OR instr({UNICODE_LOWER}(markdown), ?) > 0)"
                    )
                }
            }
            Clause::Domain(None) => "domain IS NULL".into(),
            Clause::Domain(Some(domain)) => {
                self.where_params.push(text(domain));
                "domain = ?".into()
            }
            Clause::NamespaceIn(names) => {
                format!("{UNICODE_LOWER}(namespace) IN ({})", self.list(names))
            }
            Clause::NamespaceNotIn(names) => {
                format!("{UNICODE_LOWER}(namespace) NOT IN ({})", self.list(names))
            }
            Clause::OwnerIn(ids) => format!("owner IN ({})", self.list(ids)),
            Clause::OwnerNotIn(ids) => {
                format!("(owner IS NULL OR owner NOT IN ({}))", self.list(ids))
            }
            Clause::UploaderIn(ids) => format!("uploader IN ({})", self.list(ids)),
            Clause::UploaderNotIn(ids) => {
                format!("(uploader IS NULL OR uploader NOT IN ({}))", self.list(ids))
            }
            Clause::VisibleTo(identity) => self.lower_visibility(identity.as_ref()),
        }
    }

    fn lower_visibility(&mut self, identity: Option<&Identity>) -> String {
        const UNRESTRICTED: &str = "owner IS NULL OR allowed_viewers IS NULL";

        let Some(user) = identity else {
            return format!("(is_deleted = 0 AND ({UNRESTRICTED}))");
        };
        if user.is_admin {
            return "is_deleted = 0".into();
        }

        let principals: Vec<String> = user.principals().map(str::to_string).collect();
        let mut allowed = vec![
            UNRESTRICTED.to_string(),
            format!("owner IN ({})", self.list(&principals)),
        ];
        for column in ["allowed_viewers", "allowed_editors"] {
            allowed.push(format!(
                "EXISTS (SELECT 1 FROM json_each(items.{column}) WHERE json_each.value IN ({}))",
                self.list(&principals)
            ));
        }
        let granted: Vec<String> = user
            .allowed_view_items
            .iter()
            .chain(&user.allowed_edit_items)
            .map(ToString::to_string)
            .collect();
        if !granted.is_empty() {
            allowed.push(format!("id IN ({})", self.list(&granted)));
        }

        format!("(is_deleted = 0 AND ({}))", allowed.join(" OR "))
    }

    fn lower_order(&mut self, order: &OrderBy) {
        let dir = if order.descending { "DESC" } else { "ASC" };
        let mut keys = Vec::new();

        match (order.key, order.matcher.as_ref()) {
            (SortKey::Relevance, Some(matcher)) => {
                let needle = matcher.query().to_lowercase();
                for _ in 0..3 {
                    self.order_params.push(text(&needle));
                }
                keys.push(format!("(instr({UNICODE_LOWER}(title), ?) = 0) {dir}"));
                keys.push(format!("(instr({UNICODE_LOWER}(markdown), ?) = 0) {dir}"));
                keys.push(format!("(instr({UNICODE_LOWER}(markdown), ?) - 1) {dir}"));
            }
            (SortKey::Relevance, None) | (SortKey::Title, _) => {}
            (SortKey::Timestamp, _) => keys.push(format!("timestamp {dir}")),
        }
        keys.push(format!("title {dir}"));
        keys.push(format!("id {dir}"));

        self.order_clause = keys.join(", ");
    }

    /// Push `values` as where parameters and return matching placeholders
    fn list(&mut self, values: &[String]) -> String {
        self.where_params
            .extend(values.iter().map(|value| text(value)));
        vec!["?"; values.len()].join(", ")
    }
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}
