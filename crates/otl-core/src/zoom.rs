//! View scoper ("zoom")
//!
//! Narrows the displayed view to one item's subtree. The scope is the list
//! of items to render; breadcrumbs are the root-to-zoom path used for
//! "zoom out to ancestor" navigation.

use std::sync::Arc;

use uuid::Uuid;

use crate::edit;
use crate::events::ChangeEvent;
use crate::focus::Focus;
use crate::models::{Forest, Item};
use crate::store;

/// Whether a zoom request moves outward (to an ancestor of the current
/// zoom, or the current zoom itself) or inward/elsewhere
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomKind {
    In,
    Out,
}

/// The result of `zoom_into`: the (possibly extended) forest, the zoom now
/// in effect, a focus hint for an auto-created child, and any events.
#[derive(Debug, Clone)]
pub struct ZoomOutcome {
    pub items: Forest,
    pub zoom: Option<Uuid>,
    pub focus: Option<Focus>,
    pub events: Vec<ChangeEvent>,
}

/// The list of items to render: the full forest when not zoomed, else the
/// zoomed item's children (empty when the target is stale)
pub fn scope(items: &[Arc<Item>], zoomed: Option<Uuid>) -> Forest {
    match zoomed {
        None => items.to_vec(),
        Some(id) => store::locate(items, id)
            .map(|loc| loc.node.children.clone())
            .unwrap_or_default(),
    }
}

/// Root-to-zoom path, inclusive; empty when not zoomed or stale
pub fn breadcrumbs(items: &[Arc<Item>], zoomed: Option<Uuid>) -> Forest {
    zoomed
        .and_then(|id| store::find_path(items, id))
        .unwrap_or_default()
}

/// Classify a zoom request relative to the current zoom
pub fn zoom_kind(items: &[Arc<Item>], current: Option<Uuid>, target: Uuid) -> ZoomKind {
    let path_to_current = breadcrumbs(items, current);
    if path_to_current.iter().any(|node| node.id == target) {
        ZoomKind::Out
    } else {
        ZoomKind::In
    }
}

/// Zoom into an item
///
/// Zooming into a childless read-write item auto-creates one empty child
/// and focuses it, so a zoomed view always shows an editable list. A stale
/// target leaves the zoom unset; read-only leaves zoom without creation.
pub fn zoom_into(items: &[Arc<Item>], id: Uuid) -> ZoomOutcome {
    let Some(loc) = store::locate(items, id) else {
        return ZoomOutcome {
            items: items.to_vec(),
            zoom: None,
            focus: None,
            events: Vec::new(),
        };
    };
    if loc.node.has_children() || !store::is_editable(items, id) {
        return ZoomOutcome {
            items: items.to_vec(),
            zoom: Some(id),
            focus: None,
            events: Vec::new(),
        };
    }
    let placeholder = edit::add_child(items, id, "");
    ZoomOutcome {
        items: placeholder.items,
        zoom: Some(id),
        focus: placeholder.focus,
        events: placeholder.events,
    }
}
