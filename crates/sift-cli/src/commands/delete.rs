use std::path::Path;

use sift_core::db::ItemRepository;

use crate::commands::common::{open_store, parse_item_id};
use crate::error::CliError;

pub fn run_delete(id: &str, db_path: &Path) -> Result<(), CliError> {
    let item_id = parse_item_id(id)?;
    let store = open_store(db_path)?;

    store.with_repository(|repo| repo.delete(&item_id))?;
    println!("{item_id}");
    Ok(())
}
