use std::path::Path;

use sift_core::ContentTier;

use crate::commands::common::{
    format_item_lines, item_to_list_item, list_items, open_store, ItemListItem,
};
use crate::config::CliConfig;
use crate::error::CliError;

pub fn run_list(
    tier: Option<ContentTier>,
    limit: usize,
    as_json: bool,
    config: &CliConfig,
    db_path: &Path,
) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let items = list_items(&store, tier, limit)?;
    let default_namespace = &config.search.default_namespace;

    if as_json {
        let json_items = items
            .iter()
            .map(|item| item_to_list_item(item, default_namespace))
            .collect::<Vec<ItemListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_item_lines(&items, default_namespace) {
            println!("{line}");
        }
    }

    Ok(())
}
