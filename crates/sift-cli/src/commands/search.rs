use std::path::Path;
use std::sync::Arc;

use sift_core::{SearchEngine, SearchResult};

use crate::cli::SearchArgs;
use crate::commands::common::{
    format_result_lines, identity_from_args, open_store, request_from_args,
};
use crate::config::CliConfig;
use crate::error::CliError;

pub async fn run_search(
    args: &SearchArgs,
    config: &CliConfig,
    db_path: &Path,
) -> Result<(), CliError> {
    let result = search_items(args, config, db_path).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for line in format_result_lines(&result) {
            println!("{line}");
        }
    }

    Ok(())
}

pub async fn search_items(
    args: &SearchArgs,
    config: &CliConfig,
    db_path: &Path,
) -> Result<SearchResult, CliError> {
    let store = open_store(db_path)?;
    let engine = SearchEngine::new(Arc::new(store))
        .with_config(config.search.clone())
        .with_domain_permissions(Arc::new(config.domain_permissions()?));

    let request = request_from_args(args);
    let identity = identity_from_args(args);
    Ok(engine.search(&request, identity.as_ref()).await)
}
