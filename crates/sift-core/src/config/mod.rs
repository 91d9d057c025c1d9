//! Search engine configuration.
//!
//! A single `SearchConfig` carries the tunables shared by the engine, the
//! excerpt builder and the CLI. Every field has a default, so a config file
//! only needs to name what it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{CATEGORY_NAMESPACE, DEFAULT_NAMESPACE, DEFAULT_PAGE_SIZE, FILE_NAMESPACE};
use crate::util::normalize_text_option;

const DEFAULT_EXCERPT_CHARS: usize = 128;
const DEFAULT_HIGHLIGHT_OPEN: &str = "<strong class=\"wiki-search-hit\">";
const DEFAULT_HIGHLIGHT_CLOSE: &str = "</strong>";
const DEFAULT_ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Page size used when a request leaves it at zero
    pub default_page_size: u32,
    /// Approximate excerpt window length in characters
    pub excerpt_chars: usize,
    /// Markup placed before each highlighted match
    pub highlight_open: String,
    /// Markup placed after each highlighted match
    pub highlight_close: String,
    /// Appended when an excerpt stops before the end of the body
    pub ellipsis: String,
    /// Namespace that gets no prefix in display titles
    pub default_namespace: String,
    /// Namespace that selects the category tier
    pub category_namespace: String,
    /// Namespace that selects the file tier
    pub file_namespace: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
            highlight_open: DEFAULT_HIGHLIGHT_OPEN.to_string(),
            highlight_close: DEFAULT_HIGHLIGHT_CLOSE.to_string(),
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            category_namespace: CATEGORY_NAMESPACE.to_string(),
            file_namespace: FILE_NAMESPACE.to_string(),
        }
    }
}

impl SearchConfig {
    /// Load a config from a JSON file. A missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    /// Parse and validate a JSON payload
    pub fn parse(payload: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(payload)?;
        config.validated()
    }

    /// Reject values the engine cannot work with; trim namespace names.
    pub fn validated(mut self) -> Result<Self> {
        if self.default_page_size == 0 {
            return Err(Error::InvalidInput(
                "default_page_size must be positive".into(),
            ));
        }
        if self.excerpt_chars == 0 {
            return Err(Error::InvalidInput("excerpt_chars must be positive".into()));
        }
        self.default_namespace = required_namespace(&self.default_namespace, "default_namespace")?;
        self.category_namespace =
            required_namespace(&self.category_namespace, "category_namespace")?;
        self.file_namespace = required_namespace(&self.file_namespace, "file_namespace")?;
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Private
// ---------------------------------------------------------------------------

fn required_namespace(raw: &str, field: &str) -> Result<String> {
    normalize_text_option(Some(raw.to_string()))
        .ok_or_else(|| Error::InvalidInput(format!("config field '{field}' is required")))
}
