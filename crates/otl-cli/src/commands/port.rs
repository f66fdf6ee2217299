//! Import and export command handlers

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;

use otl_core::{snapshot, store, Forest, SnapshotStore};

use crate::output::Output;

use super::resolve_id;

/// Import items from a JSON file, regenerating every id
pub fn import(
    store_: &SnapshotStore,
    items: &Forest,
    file: PathBuf,
    under: Option<String>,
    output: &Output,
) -> Result<()> {
    let json =
        fs::read_to_string(&file).with_context(|| format!("Failed to read {:?}", file))?;
    let imported = snapshot::import_json(&json, Utc::now())
        .with_context(|| format!("Failed to parse {:?}", file))?;
    let count = store::collect_ids(&imported).len();

    let under_id = match under {
        Some(input) => Some(resolve_id(items, &input)?),
        None => None,
    };

    let merged = snapshot::attach(items, imported, under_id);
    if store::same_forest(&merged, items) {
        output.noop("Nothing imported.");
        return Ok(());
    }

    store_.save(&merged).context("Failed to save outline")?;
    output.success(&format!("Imported {} item(s)", count));
    Ok(())
}

/// Export the outline as JSON, to a file or stdout
pub fn export(items: &Forest, file: Option<PathBuf>, output: &Output) -> Result<()> {
    let json = snapshot::to_json(items).context("Failed to serialize outline")?;

    match file {
        Some(path) => {
            fs::write(&path, &json).with_context(|| format!("Failed to write {:?}", path))?;
            output.success(&format!("Exported to {}", path.display()));
        }
        None => println!("{}", json),
    }
    Ok(())
}
