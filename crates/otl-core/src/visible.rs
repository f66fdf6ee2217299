//! Visible-order traversal
//!
//! The flattened, collapse-respecting sequence of item ids over the current
//! zoom scope. All keyboard focus movement is defined as index arithmetic
//! over this sequence, never by tree shape directly.

use std::sync::Arc;

use uuid::Uuid;

use crate::models::Item;
use crate::store;

/// Pre-order ids of the scope, descending only into expanded non-empty
/// children
pub fn visible_ids(scope: &[Arc<Item>]) -> Vec<Uuid> {
    let mut ids = Vec::new();
    fn walk(items: &[Arc<Item>], out: &mut Vec<Uuid>) {
        for node in items {
            out.push(node.id);
            if !node.is_collapsed && node.has_children() {
                walk(&node.children, out);
            }
        }
    }
    walk(scope, &mut ids);
    ids
}

/// The id after `id` in visible order
pub fn next_visible(scope: &[Arc<Item>], id: Uuid) -> Option<Uuid> {
    let ids = visible_ids(scope);
    let i = ids.iter().position(|&x| x == id)?;
    ids.get(i + 1).copied()
}

/// The id before `id` in visible order
pub fn prev_visible(scope: &[Arc<Item>], id: Uuid) -> Option<Uuid> {
    let ids = visible_ids(scope);
    let i = ids.iter().position(|&x| x == id)?;
    i.checked_sub(1).map(|j| ids[j])
}

/// The parent of `id` within the scope only — an item's parent while zoomed
/// is never outside the zoomed subtree
pub fn parent_of(scope: &[Arc<Item>], id: Uuid) -> Option<Uuid> {
    store::locate(scope, id)?.parent.map(|p| p.id)
}

/// The first visible child of `id`: requires the item to be expanded
pub fn first_child(scope: &[Arc<Item>], id: Uuid) -> Option<Uuid> {
    let loc = store::locate(scope, id)?;
    if loc.node.is_collapsed {
        return None;
    }
    loc.node.children.first().map(|c| c.id)
}
