use std::path::Path;

use sift_core::db::ItemRepository;
use sift_core::{ContentItem, ContentTier};

use crate::cli::AddArgs;
use crate::commands::common::{normalize_content, open_store, resolve_body};
use crate::error::CliError;

pub fn run_add(args: &AddArgs, db_path: &Path) -> Result<(), CliError> {
    let body = resolve_body(&args.body)?;
    let item = build_item(args, body)?;

    let store = open_store(db_path)?;
    let item = store.with_repository(|repo| repo.create(item))?;

    tracing::debug!("Added {} {}", item.tier, item.id);
    println!("{}", item.id);
    Ok(())
}

pub fn build_item(args: &AddArgs, body: String) -> Result<ContentItem, CliError> {
    let title = normalize_content(&args.title).ok_or(CliError::EmptyTitle)?;

    let mut item = match ContentTier::from(args.tier) {
        ContentTier::Article => ContentItem::article(title, body),
        ContentTier::Category => ContentItem::category(title, body),
        ContentTier::File => {
            let uploader = args
                .uploader
                .as_deref()
                .and_then(normalize_content)
                .ok_or(CliError::MissingUploader)?;
            ContentItem::file(title, body, uploader)
        }
    };

    if let Some(namespace) = args.namespace.as_deref().and_then(normalize_content) {
        item = item.with_namespace(namespace);
    }
    if let Some(domain) = args.domain.as_deref().and_then(normalize_content) {
        item = item.with_domain(domain);
    }
    if let Some(owner) = args.owner.as_deref().and_then(normalize_content) {
        item = item.with_owner(owner);
    }
    if !args.viewers.is_empty() {
        item = item.with_allowed_viewers(args.viewers.iter().map(String::as_str));
    }
    if !args.editors.is_empty() {
        item = item.with_allowed_editors(args.editors.iter().map(String::as_str));
    }
    Ok(item)
}
