//! Node store: primitive reads and copy-on-write rebuilds
//!
//! Every mutation in the engine goes through `update_item` (field edits) or
//! a sibling-list rebuild in `edit`: clone the spine from the root to the
//! touched node, substitute fresh nodes along it, and return the original
//! `Arc` for everything else. Callers detect a no-op by pointer equality
//! over the returned root list (`same_forest`).

use std::sync::Arc;

use uuid::Uuid;

use crate::models::{Forest, Item};

/// Where an item lives: the node, its parent (none for roots), the sibling
/// list that owns it, and its index in that list.
pub struct Location<'a> {
    pub node: &'a Arc<Item>,
    pub parent: Option<&'a Arc<Item>>,
    pub siblings: &'a [Arc<Item>],
    pub index: usize,
}

/// Find an item anywhere in the forest
pub fn locate(items: &[Arc<Item>], id: Uuid) -> Option<Location<'_>> {
    locate_in(items, None, id)
}

fn locate_in<'a>(
    items: &'a [Arc<Item>],
    parent: Option<&'a Arc<Item>>,
    id: Uuid,
) -> Option<Location<'a>> {
    for (index, node) in items.iter().enumerate() {
        if node.id == id {
            return Some(Location {
                node,
                parent,
                siblings: items,
                index,
            });
        }
    }
    for node in items {
        if let Some(found) = locate_in(&node.children, Some(node), id) {
            return Some(found);
        }
    }
    None
}

/// Root-to-node path, inclusive of the node itself
///
/// Serves breadcrumbs and the read-only ancestor guard.
pub fn find_path(items: &[Arc<Item>], id: Uuid) -> Option<Vec<Arc<Item>>> {
    for node in items {
        if node.id == id {
            return Some(vec![Arc::clone(node)]);
        }
        if let Some(mut path) = find_path(&node.children, id) {
            path.insert(0, Arc::clone(node));
            return Some(path);
        }
    }
    None
}

/// Whether the forest contains an item with this id
pub fn contains_id(items: &[Arc<Item>], id: Uuid) -> bool {
    items
        .iter()
        .any(|node| node.id == id || contains_id(&node.children, id))
}

/// Collect every id in the forest, pre-order
pub fn collect_ids(items: &[Arc<Item>]) -> Vec<Uuid> {
    let mut ids = Vec::new();
    fn walk(items: &[Arc<Item>], out: &mut Vec<Uuid>) {
        for node in items {
            out.push(node.id);
            walk(&node.children, out);
        }
    }
    walk(items, &mut ids);
    ids
}

/// Whether an item may be edited: it exists and neither it nor any of its
/// ancestors is read-only
pub fn is_editable(items: &[Arc<Item>], id: Uuid) -> bool {
    match find_path(items, id) {
        Some(path) => path.iter().all(|node| !node.is_read_only),
        None => false,
    }
}

/// Rebuild the spine from the root to `id`, applying `f` to a clone of the
/// target node. Untouched subtrees keep their `Arc` identity. Returns `None`
/// when `id` is not in the forest.
pub fn update_item(items: &[Arc<Item>], id: Uuid, f: impl FnOnce(&mut Item)) -> Option<Forest> {
    let mut f = Some(f);
    update_with(items, id, &mut |item| {
        if let Some(f) = f.take() {
            f(item);
        }
    })
}

fn update_with(
    items: &[Arc<Item>],
    id: Uuid,
    f: &mut dyn FnMut(&mut Item),
) -> Option<Forest> {
    for (i, node) in items.iter().enumerate() {
        if node.id == id {
            let mut updated = (**node).clone();
            f(&mut updated);
            let mut out = items.to_vec();
            out[i] = Arc::new(updated);
            return Some(out);
        }
        if let Some(new_children) = update_with(&node.children, id, f) {
            let mut updated = (**node).clone();
            updated.children = new_children;
            let mut out = items.to_vec();
            out[i] = Arc::new(updated);
            return Some(out);
        }
    }
    None
}

/// Pointer equality over two forests: true when every root is the same `Arc`
pub fn same_forest(a: &[Arc<Item>], b: &[Arc<Item>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Arc::ptr_eq(x, y))
}
