//! OTL Core Library
//!
//! This crate provides the outline tree engine for OTL, a keyboard-driven
//! personal outline editor: one arbitrarily deep tree of text items,
//! restructured in place.
//!
//! # Architecture
//!
//! The tree is an immutable value threaded explicitly through every
//! operation. A mutator takes the current forest and returns a new one,
//! rebuilding only the spine from the root to the touched node; untouched
//! subtrees keep their `Arc` identity. Any failure — stale id, read-only
//! target, structurally meaningless request — returns the input unchanged,
//! detectable by pointer equality. There is no ambient state and no
//! suspension point; the surrounding apply-and-re-render loop owns the
//! "current tree" value.
//!
//! # Quick Start
//!
//! ```
//! use otl_core::{edit, visible, zoom};
//!
//! let forest = edit::add_root(&[], "inbox").items;
//! let inbox = forest[0].id;
//! let forest = edit::add_child(&forest, inbox, "first note").items;
//!
//! let scoped = zoom::scope(&forest, None);
//! assert_eq!(visible::visible_ids(&scoped).len(), 2);
//! ```
//!
//! # Modules
//!
//! - `models`: the `Item` tree node
//! - `store`: find/locate primitives and copy-on-write rebuilds
//! - `edit`: structural mutators (indent, outdent, merge, ...)
//! - `zoom`: view scoping and breadcrumbs
//! - `visible`: the collapse-aware visible order for keyboard navigation
//! - `focus`: focus transitions and the blank-item auto-prune
//! - `search`: whole-forest quick-find
//! - `suggest`: `[[link]]` and `#tag` autocompletion
//! - `snapshot`: migration, import and export of the persisted shape
//! - `storage`: snapshot file persistence
//! - `config`: application configuration

pub mod config;
pub mod edit;
pub mod events;
pub mod focus;
pub mod models;
pub mod search;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod suggest;
pub mod visible;
pub mod zoom;

pub use config::Config;
pub use edit::{Direction, Edit, ItemPatch};
pub use events::ChangeEvent;
pub use focus::{Caret, Focus, FocusOutcome};
pub use models::{Forest, Item};
pub use search::SearchHit;
pub use snapshot::SnapshotError;
pub use storage::SnapshotStore;
pub use suggest::{LinkSuggestion, Trigger};
pub use zoom::{ZoomKind, ZoomOutcome};
