use std::path::Path;

use sift_core::db::ItemRepository;
use sift_core::export::parse_json_import;

use crate::commands::common::open_store;
use crate::error::CliError;

pub fn run_import(input_path: &Path, db_path: &Path) -> Result<(), CliError> {
    let count = import_file(input_path, db_path)?;
    println!("Imported {count} items");
    Ok(())
}

pub fn import_file(input_path: &Path, db_path: &Path) -> Result<usize, CliError> {
    let payload = std::fs::read_to_string(input_path)?;
    let items = parse_json_import(&payload)?;

    let store = open_store(db_path)?;
    let count = store.with_repository(|repo| repo.import(&items))?;
    tracing::info!("Imported {count} items from {}", input_path.display());
    Ok(count)
}
