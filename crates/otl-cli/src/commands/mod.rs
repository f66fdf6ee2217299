//! Command handlers

pub mod config;
pub mod item;
pub mod port;
pub mod search;
pub mod show;

use anyhow::{bail, Result};
use uuid::Uuid;

use otl_core::{store, Forest};

/// Resolve an item reference: a full UUID, or a unique hex prefix of one
pub fn resolve_id(items: &Forest, input: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(input) {
        if store::contains_id(items, id) {
            return Ok(id);
        }
        bail!("Item not found: {}", input);
    }

    let needle = input.to_lowercase();
    let matches: Vec<Uuid> = store::collect_ids(items)
        .into_iter()
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();

    match matches.len() {
        0 => bail!("Item not found: {}", input),
        1 => Ok(matches[0]),
        n => bail!("Ambiguous ID prefix '{}' ({} matches)", input, n),
    }
}

/// Short display form of an item id
pub fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}
