//! Search and tag command handlers

use anyhow::Result;

use otl_core::{search, suggest, Forest};

use crate::output::Output;

/// Search the whole outline
pub fn run(items: &Forest, query: &str, output: &Output) -> Result<()> {
    let hits = search::search(items, query);
    output.print_hits(&hits);
    Ok(())
}

/// List every distinct tag in the outline
pub fn tags(items: &Forest, output: &Output) -> Result<()> {
    let tags = suggest::suggest_tags(items, "", usize::MAX);
    output.print_tags(&tags);
    Ok(())
}
