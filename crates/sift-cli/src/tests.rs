use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use sift_core::db::{ItemRepository, SqliteStore};
use sift_core::{ContentItem, ContentTier, Permission, SortKey};
use tempfile::TempDir;

use crate::cli::{AddArgs, CompletionShell, SearchArgs, SortArg, TierArg};
use crate::commands::add::build_item;
use crate::commands::common::{
    format_relative_time, format_result_lines, identity_from_args, item_preview, list_all_items,
    normalize_content, parse_item_id, request_from_args,
};
use crate::commands::completions::render_completions;
use crate::commands::import::import_file;
use crate::commands::search::search_items;
use crate::config::{CliConfig, DomainGrant};
use crate::error::CliError;

fn temp_db() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sift.db");
    (dir, path)
}

fn seed(db_path: &Path, items: &[ContentItem]) {
    let store = SqliteStore::open(db_path).unwrap();
    store.with_repository(|repo| repo.import(items)).unwrap();
}

fn search(query: &str) -> SearchArgs {
    SearchArgs {
        query: query.to_string(),
        page: 1,
        ..SearchArgs::default()
    }
}

#[test]
fn normalize_content_trims_and_rejects_empty() {
    assert_eq!(normalize_content("  hello  "), Some("hello".to_string()));
    assert_eq!(normalize_content(" \n\t "), None);
}

#[test]
fn format_relative_time_units() {
    let now = 10_000_000_000;
    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
    assert_eq!(format_relative_time(now - 2 * 60 * 60_000, now), "2h ago");
    assert_eq!(format_relative_time(now - 3 * 24 * 60 * 60_000, now), "3d ago");
}

#[test]
fn item_preview_truncates_with_ellipsis() {
    let item = ContentItem::article(
        "Long",
        "This is a very long sentence that should be shortened\nsecond line",
    );
    assert_eq!(item_preview(&item, 20), "This is a very lo...");
}

#[test]
fn parse_item_id_rejects_garbage() {
    assert!(matches!(
        parse_item_id("not-an-id"),
        Err(CliError::InvalidItemId(id)) if id == "not-an-id"
    ));
    let id = ContentItem::article("x", "").id;
    assert_eq!(parse_item_id(&format!(" {id} ")).unwrap(), id);
}

#[test]
fn build_item_applies_flags() {
    let args = AddArgs {
        title: " Fox ".to_string(),
        namespace: Some("Help".to_string()),
        domain: Some("lab".to_string()),
        owner: Some("alice".to_string()),
        viewers: vec!["bob".to_string()],
        ..AddArgs::default()
    };

    let item = build_item(&args, "body".to_string()).unwrap();

    assert_eq!(item.title, "Fox");
    assert_eq!(item.tier, ContentTier::Article);
    assert_eq!(item.namespace, "Help");
    assert_eq!(item.domain.as_deref(), Some("lab"));
    assert_eq!(item.allowed_viewers, Some(vec!["bob".to_string()]));
    assert_eq!(item.allowed_editors, None);
    assert_eq!(item.markdown, "body");
}

#[test]
fn build_item_requires_title_and_file_uploader() {
    let blank = AddArgs {
        title: "  ".to_string(),
        ..AddArgs::default()
    };
    assert!(matches!(
        build_item(&blank, String::new()),
        Err(CliError::EmptyTitle)
    ));

    let file = AddArgs {
        title: "logo.png".to_string(),
        tier: TierArg::File,
        ..AddArgs::default()
    };
    assert!(matches!(
        build_item(&file, String::new()),
        Err(CliError::MissingUploader)
    ));

    let file = AddArgs {
        uploader: Some("alice".to_string()),
        ..file
    };
    let item = build_item(&file, String::new()).unwrap();
    assert_eq!(item.namespace, "File");
    assert_eq!(item.uploader.as_deref(), Some("alice"));
}

#[test]
fn identity_from_args_covers_anonymous_user_and_admin() {
    assert_eq!(identity_from_args(&search("fox")), None);

    let args = SearchArgs {
        user: Some("alice".to_string()),
        groups: vec!["staff".to_string()],
        view_domains: vec!["lab".to_string()],
        ..search("fox")
    };
    let alice = identity_from_args(&args).unwrap();
    assert_eq!(alice.id, "alice");
    assert!(!alice.is_admin);
    assert_eq!(alice.groups, vec!["staff".to_string()]);
    assert!(alice.allowed_view_domains.contains("lab"));

    let admin = identity_from_args(&SearchArgs {
        admin: true,
        ..search("fox")
    })
    .unwrap();
    assert!(admin.is_admin);
}

#[test]
fn request_from_args_maps_every_flag() {
    let args = SearchArgs {
        namespace: Some("Help;!Talk".to_string()),
        owner: Some("alice".to_string()),
        sort: SortArg::Timestamp,
        desc: true,
        page: 3,
        page_size: 5,
        title_only: true,
        ..search("fox")
    };

    let request = request_from_args(&args);

    assert_eq!(request.query, "fox");
    assert_eq!(request.namespace.as_deref(), Some("Help;!Talk"));
    assert_eq!(request.owner.as_deref(), Some("alice"));
    assert_eq!(request.sort, SortKey::Timestamp);
    assert!(request.descending);
    assert_eq!((request.page_number, request.page_size), (3, 5));
    assert!(request.title_match_only);
}

#[test]
fn config_parses_grants_and_search_overrides() {
    let config = CliConfig::parse(
        r#"{
            "db_path": "/tmp/wiki.db",
            "search": {"default_page_size": 20},
            "grants": [{"user": "alice", "domain": "lab", "permission": "read,write"}]
        }"#,
    )
    .unwrap();

    assert_eq!(config.search.default_page_size, 20);
    assert_eq!(config.search.excerpt_chars, 128);
    assert_eq!(
        config.resolve_db_path(Some(PathBuf::from("/explicit.db"))),
        PathBuf::from("/explicit.db")
    );
    assert_eq!(config.domain_permissions().unwrap().len(), 1);
}

#[test]
fn config_rejects_bad_grants() {
    let config = CliConfig {
        grants: vec![DomainGrant {
            user: "alice".to_string(),
            domain: "lab".to_string(),
            permission: "fly".to_string(),
        }],
        ..CliConfig::default()
    };
    assert!(matches!(
        config.domain_permissions(),
        Err(CliError::Config(_))
    ));
}

#[test]
fn config_rejects_invalid_search_section() {
    assert!(CliConfig::parse(r#"{"search": {"excerpt_chars": 0}}"#).is_err());
    assert!(CliConfig::parse(r#"{"search": {"colour": "red"}}"#).is_err());
}

#[test]
fn missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    assert!(matches!(
        CliConfig::load(Some(&missing)),
        Err(CliError::Config(_))
    ));
}

#[test]
fn completions_name_the_binary() {
    let script = String::from_utf8(render_completions(CompletionShell::Bash)).unwrap();
    assert!(script.contains("sift"));
}

#[test]
fn import_file_then_export_lists_items() {
    let (dir, db_path) = temp_db();
    let input = dir.path().join("items.json");
    std::fs::write(
        &input,
        r#"[
            {"title": "Home", "markdown": "welcome"},
            {"title": "Birds", "tier": "category"}
        ]"#,
    )
    .unwrap();

    assert_eq!(import_file(&input, &db_path).unwrap(), 2);

    let store = SqliteStore::open(&db_path).unwrap();
    let mut titles = list_all_items(&store)
        .unwrap()
        .into_iter()
        .map(|item| item.title)
        .collect::<Vec<_>>();
    titles.sort();
    assert_eq!(titles, vec!["Birds", "Home"]);
}

#[tokio::test(flavor = "current_thread")]
async fn search_items_applies_visibility() {
    let (_dir, db_path) = temp_db();
    seed(
        &db_path,
        &[
            ContentItem::article("Public fox", "the quick brown fox"),
            ContentItem::article("Secret fox", "")
                .with_owner("alice")
                .with_allowed_viewers(["alice"]),
        ],
    );
    let config = CliConfig::default();

    let anonymous = search_items(&search("fox"), &config, &db_path)
        .await
        .unwrap();
    assert_eq!(anonymous.hits.len(), 1);
    assert_eq!(anonymous.hits.items[0].title, "Public fox");

    let as_alice = SearchArgs {
        user: Some("alice".to_string()),
        sort: SortArg::Title,
        ..search("fox")
    };
    let result = search_items(&as_alice, &config, &db_path).await.unwrap();
    let titles = result
        .hits
        .items
        .iter()
        .map(|hit| hit.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["Public fox", "Secret fox"]);
}

#[tokio::test(flavor = "current_thread")]
async fn search_items_uses_configured_domain_grants() {
    let (_dir, db_path) = temp_db();
    seed(
        &db_path,
        &[ContentItem::article("Lab fox", "").with_domain("lab")],
    );
    let config = CliConfig {
        grants: vec![DomainGrant {
            user: "alice".to_string(),
            domain: "lab".to_string(),
            permission: Permission::READ.to_string(),
        }],
        ..CliConfig::default()
    };
    let args = |user: &str| SearchArgs {
        user: Some(user.to_string()),
        domain: Some("lab".to_string()),
        ..search("fox")
    };

    let denied = search_items(&args("bob"), &config, &db_path).await.unwrap();
    assert!(denied.is_empty());

    let allowed = search_items(&args("alice"), &config, &db_path)
        .await
        .unwrap();
    assert_eq!(allowed.hits.items[0].full_title, "(lab):Lab fox");

    let lines = format_result_lines(&allowed);
    assert_eq!(lines.first().map(String::as_str), Some("(lab):Lab fox  [article]"));
    assert_eq!(
        lines.last().map(String::as_str),
        Some("page 1 (1 shown, 1 total)")
    );
}
