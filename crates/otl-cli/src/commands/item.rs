//! Item command handlers
//!
//! Each handler resolves its target, applies the engine mutator, and
//! persists the result. The engine reports structurally meaningless
//! requests by returning the tree unchanged; those surface here as a
//! "nothing to do" message rather than an error.

use anyhow::{Context, Result};
use uuid::Uuid;

use otl_core::{edit, store, ChangeEvent, Direction, Edit, Forest, ItemPatch, SnapshotStore};

use crate::output::Output;

use super::{resolve_id, short_id};

/// Persist an edit, skipping the write when the tree is unchanged
fn commit(
    store_: &SnapshotStore,
    before: &Forest,
    edit: Edit,
    output: &Output,
    message: &str,
) -> Result<()> {
    if store::same_forest(&edit.items, before) {
        output.noop("Nothing to do.");
        return Ok(());
    }

    store_.save(&edit.items).context("Failed to save outline")?;
    output.success(message);
    Ok(())
}

fn created_id(edit: &Edit) -> Option<Uuid> {
    edit.events.iter().find_map(|event| match event {
        ChangeEvent::Created(id) => Some(*id),
        _ => None,
    })
}

/// Add an item at the root, under a parent, or after a sibling
pub fn add(
    store_: &SnapshotStore,
    items: &Forest,
    text: String,
    under: Option<String>,
    after: Option<String>,
    output: &Output,
) -> Result<()> {
    let edit = match (under, after) {
        (Some(parent), _) => edit::add_child(items, resolve_id(items, &parent)?, text),
        (None, Some(sibling)) => edit::add_sibling(items, resolve_id(items, &sibling)?, text),
        (None, None) => edit::add_root(items, text),
    };

    let message = match created_id(&edit) {
        Some(id) => format!("Added item {}", short_id(id)),
        None => String::from("Added item"),
    };
    commit(store_, items, edit, output, &message)
}

/// Replace an item's text
pub fn edit(
    store_: &SnapshotStore,
    items: &Forest,
    id: String,
    text: String,
    output: &Output,
) -> Result<()> {
    let target = resolve_id(items, &id)?;
    let patch = ItemPatch {
        text: Some(text),
        ..ItemPatch::default()
    };
    let edit = edit::set_fields(items, target, patch);
    commit(
        store_,
        items,
        edit,
        output,
        &format!("Updated item {}", short_id(target)),
    )
}

/// Delete an item and its subtree
pub fn delete(store_: &SnapshotStore, items: &Forest, id: String, output: &Output) -> Result<()> {
    let target = resolve_id(items, &id)?;
    let edit = edit::delete(items, target);
    commit(
        store_,
        items,
        edit,
        output,
        &format!("Deleted item {}", short_id(target)),
    )
}

/// Indent an item under its previous sibling
pub fn indent(store_: &SnapshotStore, items: &Forest, id: String, output: &Output) -> Result<()> {
    let target = resolve_id(items, &id)?;
    let edit = edit::indent(items, target);
    commit(
        store_,
        items,
        edit,
        output,
        &format!("Indented item {}", short_id(target)),
    )
}

/// Outdent an item to its parent's level
pub fn outdent(store_: &SnapshotStore, items: &Forest, id: String, output: &Output) -> Result<()> {
    let target = resolve_id(items, &id)?;
    let edit = edit::outdent(items, target);
    commit(
        store_,
        items,
        edit,
        output,
        &format!("Outdented item {}", short_id(target)),
    )
}

/// Swap an item with its previous or next sibling
pub fn move_item(
    store_: &SnapshotStore,
    items: &Forest,
    id: String,
    direction: Direction,
    output: &Output,
) -> Result<()> {
    let target = resolve_id(items, &id)?;
    let edit = edit::move_item(items, target, direction);
    commit(
        store_,
        items,
        edit,
        output,
        &format!("Moved item {}", short_id(target)),
    )
}

/// Collapse or expand an item, optionally recursively
pub fn fold(
    store_: &SnapshotStore,
    items: &Forest,
    id: String,
    collapsed: bool,
    recursive: bool,
    output: &Output,
) -> Result<()> {
    let target = resolve_id(items, &id)?;
    let edit = if recursive {
        edit::fold_all(items, target, collapsed)
    } else {
        edit::set_fields(
            items,
            target,
            ItemPatch {
                is_collapsed: Some(collapsed),
                ..ItemPatch::default()
            },
        )
    };

    let verb = if collapsed { "Folded" } else { "Expanded" };
    commit(
        store_,
        items,
        edit,
        output,
        &format!("{} item {}", verb, short_id(target)),
    )
}
