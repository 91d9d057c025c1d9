//! Content item model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

/// Namespace of ordinary articles
pub const DEFAULT_NAMESPACE: &str = "Wiki";
/// Namespace of category pages
pub const CATEGORY_NAMESPACE: &str = "Category";
/// Namespace of uploaded files
pub const FILE_NAMESPACE: &str = "File";

/// A unique identifier for a content item, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Create a new unique item ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The kind of content an item is. Each tier is queried separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentTier {
    /// Ordinary wiki page
    #[default]
    Article,
    /// Category page
    Category,
    /// Uploaded file metadata
    File,
}

impl ContentTier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Category => "category",
            Self::File => "file",
        }
    }
}

impl fmt::Display for ContentTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "article" => Ok(Self::Article),
            "category" => Ok(Self::Category),
            "file" => Ok(Self::File),
            other => Err(Error::InvalidInput(format!("unknown content tier: {other}"))),
        }
    }
}

/// A searchable piece of wiki content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Unique identifier
    pub id: ItemId,
    /// Which tier this item is stored in
    pub tier: ContentTier,
    /// Title without namespace or domain prefix
    pub title: String,
    /// Namespace the title lives in
    pub namespace: String,
    /// Optional domain partition
    #[serde(default)]
    pub domain: Option<String>,
    /// Raw markdown body
    #[serde(default)]
    pub markdown: String,
    /// Owning user or group, `None` when unowned
    #[serde(default)]
    pub owner: Option<String>,
    /// Users/groups allowed to edit, `None` when unrestricted
    #[serde(default)]
    pub allowed_editors: Option<Vec<String>>,
    /// Users/groups allowed to view, `None` when unrestricted
    #[serde(default)]
    pub allowed_viewers: Option<Vec<String>>,
    /// Uploading user (file tier only)
    #[serde(default)]
    pub uploader: Option<String>,
    /// Soft delete flag
    #[serde(default)]
    pub is_deleted: bool,
    /// Creation or last edit timestamp (Unix ms)
    pub timestamp: i64,
}

impl ContentItem {
    /// Create a new item in the given tier and namespace
    #[must_use]
    pub fn new(
        tier: ContentTier,
        title: impl Into<String>,
        namespace: impl Into<String>,
        markdown: impl Into<String>,
    ) -> Self {
        Self {
            id: ItemId::new(),
            tier,
            title: title.into(),
            namespace: namespace.into(),
            domain: None,
            markdown: markdown.into(),
            owner: None,
            allowed_editors: None,
            allowed_viewers: None,
            uploader: None,
            is_deleted: false,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// An article in the default namespace
    #[must_use]
    pub fn article(title: impl Into<String>, markdown: impl Into<String>) -> Self {
        Self::new(ContentTier::Article, title, DEFAULT_NAMESPACE, markdown)
    }

    /// A category page
    #[must_use]
    pub fn category(title: impl Into<String>, markdown: impl Into<String>) -> Self {
        Self::new(ContentTier::Category, title, CATEGORY_NAMESPACE, markdown)
    }

    /// A file page uploaded by `uploader`
    #[must_use]
    pub fn file(
        title: impl Into<String>,
        markdown: impl Into<String>,
        uploader: impl Into<String>,
    ) -> Self {
        let mut item = Self::new(ContentTier::File, title, FILE_NAMESPACE, markdown);
        item.uploader = Some(uploader.into());
        item
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    #[must_use]
    pub fn with_allowed_viewers<I, S>(mut self, viewers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_viewers = Some(viewers.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_allowed_editors<I, S>(mut self, editors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_editors = Some(editors.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub const fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }

    /// Display title including domain and non-default namespace prefixes
    #[must_use]
    pub fn full_title(&self, default_namespace: &str) -> String {
        full_title(
            &self.title,
            &self.namespace,
            self.domain.as_deref(),
            default_namespace,
        )
    }
}

/// Build the display title for a page.
///
/// # Examples
///
/// ```
/// use sift_core::models::full_title;
///
/// assert_eq!(full_title("Rust", "Wiki", None, "Wiki"), "Rust");
/// assert_eq!(full_title("Rust", "Category", None, "Wiki"), "Category:Rust");
/// assert_eq!(full_title("Rust", "Wiki", Some("lab"), "Wiki"), "(lab):Rust");
/// ```
#[must_use]
pub fn full_title(
    title: &str,
    namespace: &str,
    domain: Option<&str>,
    default_namespace: &str,
) -> String {
    let mut out = String::with_capacity(title.len() + namespace.len() + 4);
    if let Some(domain) = domain.filter(|d| !d.is_empty()) {
        out.push('(');
        out.push_str(domain);
        out.push_str("):");
    }
    if !namespace.is_empty() && !namespace.eq_ignore_ascii_case(default_namespace) {
        out.push_str(namespace);
        out.push(':');
    }
    out.push_str(title);
    out
}
