//! Change events emitted by mutators
//!
//! Instead of updating a recents/favorites index inline with every tree
//! edit, each mutator reports what it did and outside observers subscribe.

use uuid::Uuid;

/// A structural or content change to one item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A new item entered the tree
    Created(Uuid),
    /// An item's content or position changed
    Changed(Uuid),
    /// An item (and its subtree) left the tree
    Removed(Uuid),
}

impl ChangeEvent {
    /// The id the event is about
    pub fn id(&self) -> Uuid {
        match self {
            ChangeEvent::Created(id) | ChangeEvent::Changed(id) | ChangeEvent::Removed(id) => *id,
        }
    }
}
