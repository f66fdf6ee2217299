//! Snapshot migration, import and export
//!
//! The persisted snapshot is the nested Item shape as JSON. Loading is a
//! pure migration pass: unknown or missing `createdAt`/`updatedAt` values
//! are backfilled with the load time, recursively, preserving existing
//! values. Importing additionally replaces every id — nested ones included —
//! with a freshly generated identifier so a payload can never collide with
//! the existing tree. Export serializes the current tree verbatim,
//! UI-state fields included.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Forest, Item};
use crate::store;

/// Errors at the snapshot boundary
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The payload is not valid snapshot JSON
    #[error("Malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Lenient mirror of the persisted Item shape: everything but the text may
/// be absent
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    #[serde(default)]
    id: Option<Uuid>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    children: Vec<RawItem>,
    #[serde(default)]
    is_collapsed: bool,
    #[serde(default)]
    is_read_only: bool,
    #[serde(default)]
    original_id: Option<Uuid>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

fn hydrate(raw: RawItem, at: DateTime<Utc>, fresh_ids: bool) -> Arc<Item> {
    let id = if fresh_ids {
        Uuid::new_v4()
    } else {
        raw.id.unwrap_or_else(Uuid::new_v4)
    };
    Arc::new(Item {
        id,
        text: raw.text,
        children: raw
            .children
            .into_iter()
            .map(|child| hydrate(child, at, fresh_ids))
            .collect(),
        is_collapsed: raw.is_collapsed,
        is_read_only: raw.is_read_only,
        original_id: raw.original_id,
        created_at: raw.created_at.unwrap_or(at),
        updated_at: raw.updated_at.unwrap_or(at),
    })
}

/// Load a persisted snapshot, preserving ids and backfilling timestamps
/// with `loaded_at`
pub fn from_json(json: &str, loaded_at: DateTime<Utc>) -> Result<Forest, SnapshotError> {
    let raw: Vec<RawItem> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .map(|item| hydrate(item, loaded_at, false))
        .collect())
}

/// Parse an import payload, regenerating every id and backfilling
/// timestamps with `imported_at`
pub fn import_json(json: &str, imported_at: DateTime<Utc>) -> Result<Forest, SnapshotError> {
    let raw: Vec<RawItem> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .map(|item| hydrate(item, imported_at, true))
        .collect())
}

/// Attach an imported forest: appended at the root, or nested under a
/// target item (which is unfolded if it becomes newly non-empty). A stale
/// target leaves the forest unchanged.
pub fn attach(items: &[Arc<Item>], imported: Forest, under: Option<Uuid>) -> Forest {
    match under {
        None => items.iter().cloned().chain(imported).collect(),
        Some(id) => store::update_item(items, id, move |parent| {
            if parent.children.is_empty() && !imported.is_empty() {
                parent.is_collapsed = false;
            }
            parent.children.extend(imported);
            parent.updated_at = Utc::now();
        })
        .unwrap_or_else(|| items.to_vec()),
    }
}

/// Serialize the current tree verbatim as the backup artifact
pub fn to_json(items: &[Arc<Item>]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(items)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_ids_and_state() {
        let kid = Arc::new(Item::new("kid"));
        let mut parent = Item::with_children("parent", vec![Arc::clone(&kid)]);
        parent.is_collapsed = true;
        let parent = Arc::new(parent);
        let forest = vec![Arc::clone(&parent)];

        let json = to_json(&forest).unwrap();
        let loaded = from_json(&json, Utc::now()).unwrap();
        assert_eq!(loaded[0].id, parent.id);
        assert_eq!(loaded[0].children[0].id, kid.id);
        assert!(loaded[0].is_collapsed);
        assert_eq!(loaded[0].created_at, parent.created_at);
    }

    #[test]
    fn test_missing_timestamps_backfilled_with_load_time() {
        let json = r#"[{"text":"old","children":[{"text":"older"}]}]"#;
        let at = Utc::now();
        let loaded = from_json(json, at).unwrap();
        assert_eq!(loaded[0].created_at, at);
        assert_eq!(loaded[0].children[0].updated_at, at);
        // ids are generated when absent, uniquely
        assert_ne!(loaded[0].id, loaded[0].children[0].id);
    }

    #[test]
    fn test_existing_timestamps_preserved() {
        let json = r#"[{"text":"x","createdAt":"2020-01-02T03:04:05Z"}]"#;
        let loaded = from_json(json, Utc::now()).unwrap();
        assert_eq!(
            loaded[0].created_at.to_rfc3339(),
            "2020-01-02T03:04:05+00:00"
        );
    }

    #[test]
    fn test_import_regenerates_every_id() {
        let kid = Arc::new(Item::new("kid"));
        let parent = Arc::new(Item::with_children("parent", vec![Arc::clone(&kid)]));
        let json = to_json(&[Arc::clone(&parent)]).unwrap();

        let imported = import_json(&json, Utc::now()).unwrap();
        assert_ne!(imported[0].id, parent.id);
        assert_ne!(imported[0].children[0].id, kid.id);
        assert_eq!(imported[0].text, "parent");
    }

    #[test]
    fn test_attach_at_root_and_under_target() {
        let existing = Arc::new(Item::new("existing"));
        let forest = vec![Arc::clone(&existing)];
        let incoming = vec![Arc::new(Item::new("incoming"))];

        let appended = attach(&forest, incoming.clone(), None);
        assert_eq!(appended.len(), 2);
        assert_eq!(appended[1].text, "incoming");

        let nested = attach(&forest, incoming.clone(), Some(existing.id));
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].children[0].text, "incoming");

        let stale = attach(&forest, incoming, Some(Uuid::new_v4()));
        assert!(store::same_forest(&stale, &forest));
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        assert!(from_json("{\"not\":\"an array\"}", Utc::now()).is_err());
        assert!(import_json("nonsense", Utc::now()).is_err());
    }
}
