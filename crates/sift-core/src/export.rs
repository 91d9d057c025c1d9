//! JSON import and export of content items.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{
    ContentItem, ContentTier, ItemId, CATEGORY_NAMESPACE, DEFAULT_NAMESPACE, FILE_NAMESPACE,
};

/// Hand-writable item record accepted by [`parse_json_import`].
///
/// Only `title` is required. A missing id or timestamp is generated, and a
/// missing namespace falls back to the conventional one for the tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportItem {
    #[serde(default)]
    pub id: Option<ItemId>,
    #[serde(default)]
    pub tier: ContentTier,
    pub title: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub markdown: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub allowed_editors: Option<Vec<String>>,
    #[serde(default)]
    pub allowed_viewers: Option<Vec<String>>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl ImportItem {
    fn into_item(self, now: i64) -> Result<ContentItem> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput("Imported item has an empty title".into()));
        }

        Ok(ContentItem {
            id: self.id.unwrap_or_default(),
            tier: self.tier,
            title: title.to_string(),
            namespace: self
                .namespace
                .filter(|ns| !ns.trim().is_empty())
                .unwrap_or_else(|| tier_namespace(self.tier).to_string()),
            domain: self.domain.filter(|d| !d.trim().is_empty()),
            markdown: self.markdown,
            owner: self.owner,
            allowed_editors: self.allowed_editors,
            allowed_viewers: self.allowed_viewers,
            uploader: self.uploader,
            is_deleted: self.is_deleted,
            timestamp: self.timestamp.unwrap_or(now),
        })
    }
}

const fn tier_namespace(tier: ContentTier) -> &'static str {
    match tier {
        ContentTier::Article => DEFAULT_NAMESPACE,
        ContentTier::Category => CATEGORY_NAMESPACE,
        ContentTier::File => FILE_NAMESPACE,
    }
}

/// Render items as pretty-printed JSON.
pub fn render_json_export(items: &[ContentItem]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(items)
}

/// Parse a JSON array of items, as written by [`render_json_export`] or by
/// hand.
pub fn parse_json_import(payload: &str) -> Result<Vec<ContentItem>> {
    let records: Vec<ImportItem> = serde_json::from_str(payload)?;
    let now = chrono::Utc::now().timestamp_millis();
    records
        .into_iter()
        .map(|record| record.into_item(now))
        .collect()
}

/// Build a deterministic default file name for export flows.
#[must_use]
pub fn suggested_export_file_name(timestamp_ms: i64) -> String {
    format!("sift-export-{timestamp_ms}.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn export_then_import_preserves_items() {
        let items = vec![
            ContentItem::article("Fox", "quick brown")
                .with_domain("lab")
                .with_owner("alice")
                .with_allowed_viewers(["bob"]),
            ContentItem::file("fox.png", "", "carol").deleted(),
        ];

        let json = render_json_export(&items).unwrap();
        assert_eq!(parse_json_import(&json).unwrap(), items);
    }

    #[test]
    fn minimal_records_get_defaults() {
        let items = parse_json_import(
            r#"[
                {"title": "Home"},
                {"title": "Birds", "tier": "category"},
                {"title": "logo.png", "tier": "file", "uploader": "alice", "namespace": " "}
            ]"#,
        )
        .unwrap();

        let namespaces: Vec<_> = items.iter().map(|i| i.namespace.as_str()).collect();
        assert_eq!(namespaces, vec!["Wiki", "Category", "File"]);
        assert_eq!(items[0].tier, ContentTier::Article);
        assert_ne!(items[0].id, items[1].id);
        assert!(items[0].timestamp > 0);
        assert_eq!(items[2].uploader.as_deref(), Some("alice"));
    }

    #[test]
    fn blank_titles_are_rejected() {
        let err = parse_json_import(r#"[{"title": "  "}]"#).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn unknown_tier_is_a_serialization_error() {
        let err = parse_json_import(r#"[{"title": "x", "tier": "page"}]"#).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn suggested_export_file_name_uses_timestamp() {
        assert_eq!(suggested_export_file_name(123), "sift-export-123.json");
    }
}
