//! Focus controller
//!
//! Tracks which item is being edited and where the caret should land, and
//! applies the auto-prune rule: an item that is blank (empty text, no
//! children) and read-write is silently removed the moment focus leaves it.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::edit;
use crate::events::ChangeEvent;
use crate::models::{Forest, Item};
use crate::store;

/// Where the caret should land inside an item's text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caret {
    Start,
    End,
    /// Byte offset on a char boundary
    Offset(usize),
}

/// The currently edited item and caret hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Focus {
    pub id: Uuid,
    pub caret: Caret,
}

impl Focus {
    pub fn new(id: Uuid, caret: Caret) -> Self {
        Self { id, caret }
    }
}

/// The result of a focus transition: the (possibly pruned) forest, the focus
/// that is now in effect, and any change events the prune produced.
#[derive(Debug, Clone)]
pub struct FocusOutcome {
    pub items: Forest,
    pub focus: Option<Focus>,
    pub events: Vec<ChangeEvent>,
}

/// The single focus primitive: move focus from `prev` to `next`
///
/// On losing focus, the previously focused item is removed iff it still
/// exists, is read-write, and is blank — and it is not the item being
/// focused. The prune runs exactly once per transition; observers are told
/// via a `Removed` event so they can forget the id.
pub fn transition(items: &[Arc<Item>], prev: Option<Focus>, next: Option<Focus>) -> FocusOutcome {
    let leaving = match (prev, next) {
        (Some(p), Some(n)) => p.id != n.id,
        (Some(_), None) => true,
        (None, _) => false,
    };

    if let Some(p) = prev.filter(|_| leaving) {
        if let Some(loc) = store::locate(items, p.id) {
            if !loc.node.is_read_only && loc.node.is_blank() {
                debug!("auto-pruning blank item {}", p.id);
                let pruned = edit::delete(items, p.id);
                return FocusOutcome {
                    items: pruned.items,
                    focus: next,
                    events: pruned.events,
                };
            }
        }
    }

    FocusOutcome {
        items: items.to_vec(),
        focus: next,
        events: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(text: &str) -> Arc<Item> {
        Arc::new(Item::new(text))
    }

    #[test]
    fn test_blank_item_pruned_on_focus_out() {
        let blank = leaf("");
        let other = leaf("other");
        let forest = vec![Arc::clone(&blank), Arc::clone(&other)];

        let out = transition(
            &forest,
            Some(Focus::new(blank.id, Caret::Start)),
            Some(Focus::new(other.id, Caret::End)),
        );
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].id, other.id);
        assert_eq!(out.events, vec![ChangeEvent::Removed(blank.id)]);
        assert_eq!(out.focus.unwrap().id, other.id);
    }

    #[test]
    fn test_items_with_text_or_children_survive() {
        let texty = leaf("still here");
        let parent = Arc::new(Item::with_children("", vec![leaf("kid")]));
        let forest = vec![Arc::clone(&texty), Arc::clone(&parent)];

        let out = transition(&forest, Some(Focus::new(texty.id, Caret::End)), None);
        assert_eq!(out.items.len(), 2);
        assert!(out.events.is_empty());

        // empty text but has children: not blank, not pruned
        let out = transition(&forest, Some(Focus::new(parent.id, Caret::End)), None);
        assert_eq!(out.items.len(), 2);
    }

    #[test]
    fn test_refocusing_same_item_does_not_prune() {
        let blank = leaf("");
        let forest = vec![Arc::clone(&blank)];

        let out = transition(
            &forest,
            Some(Focus::new(blank.id, Caret::Start)),
            Some(Focus::new(blank.id, Caret::End)),
        );
        assert_eq!(out.items.len(), 1);
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_stale_previous_focus_is_harmless() {
        let a = leaf("a");
        let forest = vec![Arc::clone(&a)];

        let out = transition(
            &forest,
            Some(Focus::new(Uuid::new_v4(), Caret::Start)),
            Some(Focus::new(a.id, Caret::Start)),
        );
        assert!(store::same_forest(&out.items, &forest));
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_read_only_blank_is_never_pruned() {
        let mut locked = Item::new("");
        locked.is_read_only = true;
        let locked = Arc::new(locked);
        let forest = vec![Arc::clone(&locked)];

        let out = transition(&forest, Some(Focus::new(locked.id, Caret::Start)), None);
        assert_eq!(out.items.len(), 1);
    }
}
