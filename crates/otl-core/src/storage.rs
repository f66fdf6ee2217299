//! Snapshot persistence
//!
//! Saves and loads the outline snapshot to/from the filesystem. Uses atomic
//! writes (write to temp file, then rename) to prevent corruption.
//!
//! Storage location: `~/.local/share/otl/outline.json` (configurable via
//! `Config`).

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::models::Forest;
use crate::snapshot;

/// Persistence layer for outline snapshots
///
/// Provides atomic file operations for saving/loading the tree.
pub struct SnapshotStore {
    config: Config,
}

impl SnapshotStore {
    /// Create a new snapshot store with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Load configuration from default location and create a snapshot store
    pub fn with_default_config() -> Result<Self> {
        let config = Config::load()?;
        Ok(Self::new(config))
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check if a snapshot exists on disk
    pub fn exists(&self) -> bool {
        self.config.snapshot_path().exists()
    }

    /// Load the snapshot, running the timestamp-backfill migration
    ///
    /// Returns `None` if the snapshot file doesn't exist.
    /// Returns an error if the file exists but can't be read or parsed.
    pub fn load(&self, loaded_at: DateTime<Utc>) -> Result<Option<Forest>> {
        let path = self.config.snapshot_path();

        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read snapshot from {:?}", path))?;

        let items = snapshot::from_json(&json, loaded_at)
            .with_context(|| format!("Failed to parse snapshot from {:?}", path))?;

        Ok(Some(items))
    }

    /// Load an existing snapshot or start with an empty outline
    pub fn load_or_create(&self, loaded_at: DateTime<Utc>) -> Result<Forest> {
        if let Some(items) = self.load(loaded_at)? {
            return Ok(items);
        }

        let items = Forest::new();
        self.save(&items)?;
        Ok(items)
    }

    /// Save the outline to disk using atomic write
    ///
    /// This writes to a temporary file first, then renames it to the target
    /// path, so the file is never left in a partially-written state.
    pub fn save(&self, items: &Forest) -> Result<()> {
        let json = snapshot::to_json(items).context("Failed to serialize snapshot")?;
        let target_path = self.config.snapshot_path();

        atomic_write(&target_path, json.as_bytes())
            .with_context(|| format!("Failed to save snapshot to {:?}", target_path))?;

        Ok(())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    // Create temp file in the same directory (for atomic rename)
    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)
        .with_context(|| format!("Failed to create temp file {:?}", temp_path))?;

    file.write_all(data)
        .with_context(|| format!("Failed to write to temp file {:?}", temp_path))?;

    file.sync_all()
        .with_context(|| format!("Failed to sync temp file {:?}", temp_path))?;

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename {:?} to {:?}", temp_path, path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            suggestion_limit: 10,
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(test_config(&temp_dir));

        // Initially no snapshot
        assert!(!store.exists());
        assert!(store.load(Utc::now()).unwrap().is_none());

        let kid = Arc::new(Item::new("kid"));
        let parent = Arc::new(Item::with_children("parent", vec![Arc::clone(&kid)]));
        let forest = vec![Arc::clone(&parent)];

        store.save(&forest).unwrap();
        assert!(store.exists());

        let loaded = store.load(Utc::now()).unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, parent.id);
        assert_eq!(loaded[0].children[0].text, "kid");
    }

    #[test]
    fn test_load_or_create_new() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(test_config(&temp_dir));

        let items = store.load_or_create(Utc::now()).unwrap();
        assert!(items.is_empty());
        assert!(store.exists());
    }

    #[test]
    fn test_load_or_create_existing() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(test_config(&temp_dir));

        let forest = vec![Arc::new(Item::new("keep me"))];
        store.save(&forest).unwrap();

        let loaded = store.load_or_create(Utc::now()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].text, "keep me");
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(test_config(&temp_dir));

        fs::create_dir_all(temp_dir.path()).unwrap();
        fs::write(store.config().snapshot_path(), b"not json").unwrap();

        assert!(store.load(Utc::now()).is_err());
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir.path().join("a").join("b").join("file.json");

        atomic_write(&nested_path, b"[]").unwrap();

        assert!(nested_path.exists());
        assert_eq!(fs::read_to_string(&nested_path).unwrap(), "[]");
    }
}
