//! Structural mutators
//!
//! Every operation is a pure value transformation: old forest + arguments in,
//! new forest out. Untouched subtrees keep their `Arc` identity. On any
//! failure — target not found, target read-only, structurally meaningless
//! request — the operation returns the input forest unchanged (pointer-equal
//! roots) and no error crosses the boundary.
//!
//! Successful mutations refresh `updated_at` on the touched item and, for
//! structural changes, on its immediate parent, and report what happened as
//! `ChangeEvent`s for outside observers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::events::ChangeEvent;
use crate::focus::{Caret, Focus};
use crate::models::{Forest, Item};
use crate::store;

/// Direction for sibling swaps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Partial field update for `set_fields`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub text: Option<String>,
    pub is_collapsed: Option<bool>,
    pub is_read_only: Option<bool>,
}

/// The result of one mutation: the new forest, an optional focus hint for
/// the caller, and the change events the operation produced.
#[derive(Debug, Clone)]
pub struct Edit {
    pub items: Forest,
    pub focus: Option<Focus>,
    pub events: Vec<ChangeEvent>,
}

impl Edit {
    /// A silent no-op: Arc-clones of the input, detectable by
    /// `store::same_forest`
    fn unchanged(items: &[Arc<Item>]) -> Self {
        Self {
            items: items.to_vec(),
            focus: None,
            events: Vec::new(),
        }
    }
}

/// Rebuild the spine down to the sibling list containing `id` and apply
/// `edit` to a mutable copy of that list. The immediate parent of that list
/// gets its `updated_at` refreshed; deeper ancestors are rebuilt but not
/// timestamped.
fn edit_list(
    items: &[Arc<Item>],
    id: Uuid,
    now: DateTime<Utc>,
    edit: &mut dyn FnMut(&mut Forest, usize),
) -> Option<Forest> {
    if let Some(i) = items.iter().position(|n| n.id == id) {
        let mut list = items.to_vec();
        edit(&mut list, i);
        return Some(list);
    }
    for (i, node) in items.iter().enumerate() {
        let direct_parent = node.children.iter().any(|c| c.id == id);
        if let Some(new_children) = edit_list(&node.children, id, now, edit) {
            let mut updated = (**node).clone();
            updated.children = new_children;
            if direct_parent {
                updated.updated_at = now;
            }
            let mut out = items.to_vec();
            out[i] = Arc::new(updated);
            return Some(out);
        }
    }
    None
}

/// Insert a new item immediately after `id` in the same sibling list
pub fn add_sibling(items: &[Arc<Item>], id: Uuid, text: impl Into<String>) -> Edit {
    if !store::is_editable(items, id) {
        debug!("add_sibling ignored: {id} not editable");
        return Edit::unchanged(items);
    }
    let now = Utc::now();
    let new_item = Arc::new(Item::new(text));
    let new_id = new_item.id;
    match edit_list(items, id, now, &mut |list, i| {
        list.insert(i + 1, Arc::clone(&new_item));
    }) {
        Some(forest) => Edit {
            items: forest,
            focus: Some(Focus::new(new_id, Caret::Start)),
            events: vec![ChangeEvent::Created(new_id)],
        },
        None => Edit::unchanged(items),
    }
}

/// Append a new item as the last child of `parent_id`
///
/// A collapsed leaf gaining its first child is unfolded, so the new item is
/// always visible.
pub fn add_child(items: &[Arc<Item>], parent_id: Uuid, text: impl Into<String>) -> Edit {
    if !store::is_editable(items, parent_id) {
        debug!("add_child ignored: {parent_id} not editable");
        return Edit::unchanged(items);
    }
    let child = Arc::new(Item::new(text));
    let child_id = child.id;
    match store::update_item(items, parent_id, |parent| {
        if parent.children.is_empty() {
            parent.is_collapsed = false;
        }
        parent.children.push(Arc::clone(&child));
        parent.updated_at = Utc::now();
    }) {
        Some(forest) => Edit {
            items: forest,
            focus: Some(Focus::new(child_id, Caret::Start)),
            events: vec![ChangeEvent::Created(child_id)],
        },
        None => Edit::unchanged(items),
    }
}

/// Append a new item at the end of the root list
pub fn add_root(items: &[Arc<Item>], text: impl Into<String>) -> Edit {
    let new_item = Arc::new(Item::new(text));
    let new_id = new_item.id;
    let mut forest = items.to_vec();
    forest.push(new_item);
    Edit {
        items: forest,
        focus: Some(Focus::new(new_id, Caret::Start)),
        events: vec![ChangeEvent::Created(new_id)],
    }
}

/// Split an item's text at `offset` (a byte offset on a char boundary):
/// the item keeps the head, a new sibling after it receives the remainder.
///
/// Children stay with the original item, so splitting a collapsed parent
/// never detaches hidden children.
pub fn split(items: &[Arc<Item>], id: Uuid, offset: usize) -> Edit {
    if !store::is_editable(items, id) {
        debug!("split ignored: {id} not editable");
        return Edit::unchanged(items);
    }
    let Some(loc) = store::locate(items, id) else {
        return Edit::unchanged(items);
    };
    let text = &loc.node.text;
    if offset > text.len() || !text.is_char_boundary(offset) {
        debug!("split ignored: offset {offset} invalid for {id}");
        return Edit::unchanged(items);
    }
    let remainder = text[offset..].to_string();
    let now = Utc::now();
    let new_item = Arc::new(Item::new(remainder));
    let new_id = new_item.id;
    match edit_list(items, id, now, &mut |list, i| {
        let mut head = (*list[i]).clone();
        head.text.truncate(offset);
        head.updated_at = now;
        list[i] = Arc::new(head);
        list.insert(i + 1, Arc::clone(&new_item));
    }) {
        Some(forest) => Edit {
            items: forest,
            focus: Some(Focus::new(new_id, Caret::Start)),
            events: vec![ChangeEvent::Changed(id), ChangeEvent::Created(new_id)],
        },
        None => Edit::unchanged(items),
    }
}

/// Remove an item (and its subtree) from its sibling list
///
/// The focus hint names the item that should receive focus next: the
/// previous sibling if one exists, else the parent, else none.
pub fn delete(items: &[Arc<Item>], id: Uuid) -> Edit {
    if !store::is_editable(items, id) {
        debug!("delete ignored: {id} not editable");
        return Edit::unchanged(items);
    }
    let Some(loc) = store::locate(items, id) else {
        return Edit::unchanged(items);
    };
    let focus = if loc.index > 0 {
        Some(Focus::new(loc.siblings[loc.index - 1].id, Caret::End))
    } else {
        loc.parent.map(|p| Focus::new(p.id, Caret::End))
    };
    let now = Utc::now();
    match edit_list(items, id, now, &mut |list, i| {
        list.remove(i);
    }) {
        Some(forest) => Edit {
            items: forest,
            focus,
            events: vec![ChangeEvent::Removed(id)],
        },
        None => Edit::unchanged(items),
    }
}

/// Move an item under its previous sibling, as that sibling's last child
///
/// The new parent is force-unfolded so the moved item stays visible.
/// No-op when the item is first in its list.
pub fn indent(items: &[Arc<Item>], id: Uuid) -> Edit {
    if !store::is_editable(items, id) {
        debug!("indent ignored: {id} not editable");
        return Edit::unchanged(items);
    }
    let Some(loc) = store::locate(items, id) else {
        return Edit::unchanged(items);
    };
    if loc.index == 0 {
        debug!("indent ignored: {id} is first in its list");
        return Edit::unchanged(items);
    }
    if loc.siblings[loc.index - 1].is_read_only {
        debug!("indent ignored: previous sibling of {id} is read-only");
        return Edit::unchanged(items);
    }
    let now = Utc::now();
    match edit_list(items, id, now, &mut |list, i| {
        let node = list.remove(i);
        let mut moved = (*node).clone();
        moved.updated_at = now;
        let mut parent = (*list[i - 1]).clone();
        parent.children.push(Arc::new(moved));
        parent.is_collapsed = false;
        parent.updated_at = now;
        list[i - 1] = Arc::new(parent);
    }) {
        Some(forest) => Edit {
            items: forest,
            focus: None,
            events: vec![ChangeEvent::Changed(id)],
        },
        None => Edit::unchanged(items),
    }
}

/// Move an item out of its parent, reinserting it immediately after the
/// parent in the grandparent's list
///
/// The item's following siblings come along as its own trailing children,
/// preserving their relative order. No-op at the root level.
pub fn outdent(items: &[Arc<Item>], id: Uuid) -> Edit {
    if !store::is_editable(items, id) {
        debug!("outdent ignored: {id} not editable");
        return Edit::unchanged(items);
    }
    let now = Utc::now();
    match outdent_in(items, id, now) {
        Some(forest) => Edit {
            items: forest,
            focus: None,
            events: vec![ChangeEvent::Changed(id)],
        },
        None => Edit::unchanged(items),
    }
}

fn outdent_in(items: &[Arc<Item>], id: Uuid, now: DateTime<Utc>) -> Option<Forest> {
    for (j, node) in items.iter().enumerate() {
        if let Some(i) = node.children.iter().position(|c| c.id == id) {
            let mut moved = (*node.children[i]).clone();
            let had_children = moved.has_children();
            moved.children.extend(node.children[i + 1..].iter().cloned());
            if !had_children && moved.has_children() {
                // a stale collapsed flag would hide the adopted siblings
                moved.is_collapsed = false;
            }
            moved.updated_at = now;

            let mut parent = (**node).clone();
            parent.children.truncate(i);
            parent.updated_at = now;

            let mut out = items.to_vec();
            out[j] = Arc::new(parent);
            out.insert(j + 1, Arc::new(moved));
            return Some(out);
        }
        if let Some(new_children) = outdent_in(&node.children, id, now) {
            let mut updated = (**node).clone();
            updated.children = new_children;
            if updated.children.iter().any(|c| c.id == id) {
                // this node is the grandparent that just adopted the item
                updated.updated_at = now;
            }
            let mut out = items.to_vec();
            out[j] = Arc::new(updated);
            return Some(out);
        }
    }
    None
}

/// Swap an item with its previous/next sibling; no-op at a list boundary
pub fn move_item(items: &[Arc<Item>], id: Uuid, direction: Direction) -> Edit {
    if !store::is_editable(items, id) {
        debug!("move ignored: {id} not editable");
        return Edit::unchanged(items);
    }
    let Some(loc) = store::locate(items, id) else {
        return Edit::unchanged(items);
    };
    let at_boundary = match direction {
        Direction::Up => loc.index == 0,
        Direction::Down => loc.index + 1 == loc.siblings.len(),
    };
    if at_boundary {
        debug!("move ignored: {id} at list boundary");
        return Edit::unchanged(items);
    }
    let now = Utc::now();
    match edit_list(items, id, now, &mut |list, i| {
        let j = match direction {
            Direction::Up => i - 1,
            Direction::Down => i + 1,
        };
        list.swap(i, j);
        let mut moved = (*list[j]).clone();
        moved.updated_at = now;
        list[j] = Arc::new(moved);
    }) {
        Some(forest) => Edit {
            items: forest,
            focus: None,
            events: vec![ChangeEvent::Changed(id)],
        },
        None => Edit::unchanged(items),
    }
}

/// Merge an item into its previous sibling: text is appended, children are
/// appended (unfolding the sibling if it becomes newly non-empty), and the
/// item is removed. The focus hint carries the caret offset where the two
/// texts join.
///
/// An item that is first in its list has no merge target; if it is blank,
/// delete-forward semantics apply instead (remove it, focus the parent).
pub fn merge(items: &[Arc<Item>], id: Uuid) -> Edit {
    if !store::is_editable(items, id) {
        debug!("merge ignored: {id} not editable");
        return Edit::unchanged(items);
    }
    let Some(loc) = store::locate(items, id) else {
        return Edit::unchanged(items);
    };
    let now = Utc::now();

    if loc.index == 0 {
        if !loc.node.is_blank() {
            debug!("merge ignored: {id} has no previous sibling");
            return Edit::unchanged(items);
        }
        let focus = loc.parent.map(|p| Focus::new(p.id, Caret::End));
        return match edit_list(items, id, now, &mut |list, i| {
            list.remove(i);
        }) {
            Some(forest) => Edit {
                items: forest,
                focus,
                events: vec![ChangeEvent::Removed(id)],
            },
            None => Edit::unchanged(items),
        };
    }

    let prev = &loc.siblings[loc.index - 1];
    if prev.is_read_only {
        debug!("merge ignored: previous sibling of {id} is read-only");
        return Edit::unchanged(items);
    }
    let prev_id = prev.id;
    let caret_offset = prev.text.len();
    match edit_list(items, id, now, &mut |list, i| {
        let node = list.remove(i);
        let mut merged = (*list[i - 1]).clone();
        let was_childless = merged.children.is_empty();
        merged.text.push_str(&node.text);
        merged.children.extend(node.children.iter().cloned());
        if was_childless && merged.has_children() {
            merged.is_collapsed = false;
        }
        merged.updated_at = now;
        list[i - 1] = Arc::new(merged);
    }) {
        Some(forest) => Edit {
            items: forest,
            focus: Some(Focus::new(prev_id, Caret::Offset(caret_offset))),
            events: vec![ChangeEvent::Changed(prev_id), ChangeEvent::Removed(id)],
        },
        None => Edit::unchanged(items),
    }
}

/// Set `is_collapsed` on an item and, recursively, on every read-write
/// descendant that itself has children
///
/// Fold state is navigation, so the target may be read-only — but the walk
/// never descends into read-only subtrees.
pub fn fold_all(items: &[Arc<Item>], id: Uuid, collapsed: bool) -> Edit {
    let now = Utc::now();
    match store::update_item(items, id, |node| fold_node(node, collapsed, now)) {
        Some(forest) => Edit {
            items: forest,
            focus: None,
            events: vec![ChangeEvent::Changed(id)],
        },
        None => {
            debug!("fold_all ignored: {id} not found");
            Edit::unchanged(items)
        }
    }
}

fn fold_node(item: &mut Item, collapsed: bool, now: DateTime<Utc>) {
    if item.is_collapsed != collapsed {
        item.is_collapsed = collapsed;
        item.updated_at = now;
    }
    item.children = item
        .children
        .iter()
        .map(|child| {
            if child.is_read_only || child.children.is_empty() {
                Arc::clone(child)
            } else {
                let mut folded = (**child).clone();
                fold_node(&mut folded, collapsed, now);
                Arc::new(folded)
            }
        })
        .collect();
}

/// Generic field patch with the read-only guard and timestamp refresh
///
/// A patch that only touches `is_collapsed` counts as navigation and is
/// allowed on read-only items; anything touching text or the read-only flag
/// requires an editable target.
pub fn set_fields(items: &[Arc<Item>], id: Uuid, patch: ItemPatch) -> Edit {
    let edits_content = patch.text.is_some() || patch.is_read_only.is_some();
    if edits_content && !store::is_editable(items, id) {
        debug!("set_fields ignored: {id} not editable");
        return Edit::unchanged(items);
    }
    match store::update_item(items, id, |node| {
        if let Some(text) = patch.text {
            node.text = text;
        }
        if let Some(collapsed) = patch.is_collapsed {
            node.is_collapsed = collapsed;
        }
        if let Some(read_only) = patch.is_read_only {
            node.is_read_only = read_only;
        }
        node.updated_at = Utc::now();
    }) {
        Some(forest) => Edit {
            items: forest,
            focus: None,
            events: vec![ChangeEvent::Changed(id)],
        },
        None => Edit::unchanged(items),
    }
}
