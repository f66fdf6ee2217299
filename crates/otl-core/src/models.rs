//! Data models for OTL
//!
//! Defines the core data structure: the outline `Item`. An outline is a
//! forest of items; children are held behind `Arc` so that every edit can
//! rebuild only the spine from the root to the touched node while untouched
//! subtrees keep their identity (structural sharing).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An outline forest: the ordered list of root items.
pub type Forest = Vec<Arc<Item>>;

/// One node of the outline tree
///
/// Sibling order is display order. `text` stores inline `#tag`,
/// `[[Link Text]]` and URL tokens verbatim; recognizing them is the
/// rendering layer's job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier, stable for the item's lifetime, never reused
    pub id: Uuid,
    /// The item's text content
    pub text: String,
    /// Ordered child items
    #[serde(default)]
    pub children: Vec<Arc<Item>>,
    /// When true, children exist but are hidden from the visible order
    #[serde(default)]
    pub is_collapsed: bool,
    /// Read-only items (and their whole subtree) reject every mutation
    /// except fold/unfold and navigation
    #[serde(default)]
    pub is_read_only: bool,
    /// Back-reference for read-only projections of another item;
    /// following it performs a navigate-to jump instead of an in-place edit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_id: Option<Uuid>,
    /// When this item was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// When this item last changed (content or structure)
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Create a new read-write item with the given text
    pub fn new(text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            children: Vec::new(),
            is_collapsed: false,
            is_read_only: false,
            original_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an item with children (display order preserved)
    pub fn with_children(text: impl Into<String>, children: Vec<Arc<Item>>) -> Self {
        let mut item = Self::new(text);
        item.children = children;
        item
    }

    /// Update the text, refreshing `updated_at`
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.updated_at = Utc::now();
    }

    /// Whether this item has any children
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether this item is prunable: empty text and no children
    ///
    /// The focus controller removes such items when they lose focus.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty() && self.children.is_empty()
    }
}
