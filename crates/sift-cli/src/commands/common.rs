use std::io::{self, IsTerminal, Read};
use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use sift_core::db::{ItemRepository, SqliteStore};
use sift_core::{ContentItem, ContentTier, Identity, ItemId, SearchRequest, SearchResult};

use crate::cli::SearchArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct ItemListItem {
    pub id: String,
    pub tier: String,
    pub full_title: String,
    pub preview: String,
    pub timestamp: i64,
    pub relative_time: String,
}

pub fn open_store(db_path: &Path) -> Result<SqliteStore, CliError> {
    Ok(SqliteStore::open(db_path)?)
}

pub fn list_items(
    store: &SqliteStore,
    tier: Option<ContentTier>,
    limit: usize,
) -> Result<Vec<ContentItem>, CliError> {
    Ok(store.with_repository(|repo| repo.list(tier, limit, 0))?)
}

pub fn list_all_items(store: &SqliteStore) -> Result<Vec<ContentItem>, CliError> {
    const PAGE_SIZE: usize = 500;

    let mut items = Vec::new();
    let mut offset = 0usize;

    loop {
        let batch = store.with_repository(|repo| repo.list(None, PAGE_SIZE, offset))?;
        let count = batch.len();
        items.extend(batch);

        if count < PAGE_SIZE {
            break;
        }
        offset += count;
    }

    Ok(items)
}

pub fn parse_item_id(id: &str) -> Result<ItemId, CliError> {
    let trimmed = id.trim();
    trimmed
        .parse()
        .map_err(|_| CliError::InvalidItemId(trimmed.to_string()))
}

/// The caller described by `--user`, `--group`, `--admin` and
/// `--view-domain`; `None` searches anonymously
pub fn identity_from_args(args: &SearchArgs) -> Option<Identity> {
    let user = args
        .user
        .as_deref()
        .map(str::trim)
        .filter(|user| !user.is_empty());
    let mut identity = match (user, args.admin) {
        (None, false) => return None,
        (None, true) => Identity::admin("admin"),
        (Some(user), true) => Identity::admin(user),
        (Some(user), false) => Identity::new(user),
    };
    identity = identity.with_groups(args.groups.iter().map(String::as_str));
    for domain in &args.view_domains {
        identity = identity.with_view_domain(domain.as_str());
    }
    Some(identity)
}

pub fn request_from_args(args: &SearchArgs) -> SearchRequest {
    SearchRequest {
        query: args.query.clone(),
        domain: args.domain.clone(),
        namespace: args.namespace.clone(),
        owner: args.owner.clone(),
        uploader: args.uploader.clone(),
        sort: args.sort.into(),
        descending: args.desc,
        page_number: args.page,
        page_size: args.page_size,
        title_match_only: args.title_only,
    }
}

pub fn format_item_lines(items: &[ContentItem], default_namespace: &str) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    items
        .iter()
        .map(|item| {
            let id = item.id.to_string();
            let short_id = id.chars().take(13).collect::<String>();
            let title = item.full_title(default_namespace);
            let relative_time = format_relative_time(item.timestamp, now_ms);
            format!(
                "{short_id:<13}  {:<8}  {title:<40}  {relative_time}",
                item.tier.as_str()
            )
        })
        .collect()
}

pub fn item_to_list_item(item: &ContentItem, default_namespace: &str) -> ItemListItem {
    let now_ms = Utc::now().timestamp_millis();
    ItemListItem {
        id: item.id.to_string(),
        tier: item.tier.to_string(),
        full_title: item.full_title(default_namespace),
        preview: item_preview(item, 80),
        timestamp: item.timestamp,
        relative_time: format_relative_time(item.timestamp, now_ms),
    }
}

pub fn format_result_lines(result: &SearchResult) -> Vec<String> {
    let mut lines = Vec::new();
    for hit in &result.hits.items {
        lines.push(format!("{}  [{}]", hit.full_title, hit.tier));
        if let Some(excerpt) = hit.excerpt.as_deref().filter(|e| !e.is_empty()) {
            lines.push(format!("    {excerpt}"));
        }
    }

    let total = result
        .hits
        .total_count
        .map_or_else(|| "?".to_string(), |total| total.to_string());
    lines.push(format!(
        "page {} ({} shown, {total} total)",
        result.hits.page_number,
        result.hits.len()
    ));
    lines
}

pub fn item_preview(item: &ContentItem, max_chars: usize) -> String {
    let first_line = item.markdown.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < month {
        format!("{}d ago", diff / day)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

/// Body text from the command line, else from piped stdin
pub fn resolve_body(parts: &[String]) -> Result<String, CliError> {
    if let Some(body) = normalize_content(&parts.join(" ")) {
        return Ok(body);
    }
    Ok(read_piped_stdin()?.unwrap_or_default())
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}
