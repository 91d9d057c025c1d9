//! sift-core - Permission-aware wiki search
//!
//! This crate contains the content models, the tiered search engine, the
//! document stores it runs against (in-memory and `SQLite`), and the
//! supporting markdown, permission and configuration plumbing used by the
//! `sift` CLI.

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod permissions;
pub mod render;
pub mod search;
pub mod store;
pub mod util;

pub use config::SearchConfig;
pub use error::{Error, Result};
pub use models::{
    ContentItem, ContentTier, Identity, ItemId, Permission, SearchHit, SearchRequest,
    SearchResult, SortKey,
};
pub use search::SearchEngine;
