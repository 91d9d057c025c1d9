use std::path::Path;

use sift_core::export::render_json_export;

use crate::commands::common::{list_all_items, open_store};
use crate::error::CliError;

pub fn run_export(output_path: Option<&Path>, db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let items = list_all_items(&store)?;
    let rendered = render_json_export(&items)?;

    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}
