//! Show command handler

use anyhow::Result;

use otl_core::{zoom, Forest};

use crate::output::Output;

use super::resolve_id;

/// Print the outline, scoped to one item when an id is given
pub fn show(items: &Forest, id: Option<String>, all: bool, output: &Output) -> Result<()> {
    let zoom_id = match id {
        Some(input) => Some(resolve_id(items, &input)?),
        None => None,
    };

    let scoped = zoom::scope(items, zoom_id);
    let crumbs = zoom::breadcrumbs(items, zoom_id);
    output.print_tree(&scoped, &crumbs, all);
    Ok(())
}
