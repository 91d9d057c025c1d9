//! Search: request filters, matching, visibility, ordering and excerpts,
//! tied together by [`SearchEngine`].

mod engine;
mod excerpt;
mod filter;
mod matcher;
mod order;
mod predicate;
mod visibility;

pub use engine::SearchEngine;
pub use excerpt::{excerpt_window, highlight, ExcerptBuilder};
pub use filter::FilterList;
pub use matcher::QueryMatcher;
pub use order::OrderBy;
pub use predicate::{Clause, Predicate};
pub use visibility::is_visible;
