//! `SQLite` persistence for content items

mod connection;
mod migrations;
mod repository;
mod store;

pub use connection::Database;
pub use repository::{ItemRepository, SqliteItemRepository};
pub use store::SqliteStore;
