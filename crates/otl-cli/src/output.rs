//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use std::sync::Arc;

use otl_core::{Item, SearchHit};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is in JSON mode
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Report a successful mutation
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", message),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "status": "ok", "message": message }))
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Report that the requested operation changed nothing
    pub fn noop(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", message),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "status": "noop", "message": message }))
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a scoped outline as an indented tree
    ///
    /// Collapsed subtrees are hidden unless `show_hidden` is set, matching
    /// the engine's visible order.
    pub fn print_tree(&self, scope: &[Arc<Item>], crumbs: &[Arc<Item>], show_hidden: bool) {
        match self.format {
            OutputFormat::Human => {
                if !crumbs.is_empty() {
                    let trail: Vec<&str> = crumbs.iter().map(|n| n.text.as_str()).collect();
                    println!("{}", trail.join(" > "));
                    println!();
                }
                if scope.is_empty() {
                    println!("No items.");
                    return;
                }
                print_subtree(scope, 0, show_hidden);
            }
            OutputFormat::Json => match serde_json::to_string_pretty(scope) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Failed to serialize outline: {}", e),
            },
            OutputFormat::Quiet => {
                for id in otl_core::visible::visible_ids(scope) {
                    println!("{}", id);
                }
            }
        }
    }

    /// Print search results with their ancestor paths
    pub fn print_hits(&self, hits: &[SearchHit]) {
        match self.format {
            OutputFormat::Human => {
                if hits.is_empty() {
                    println!("No matches.");
                    return;
                }
                for hit in hits {
                    let prefix = if hit.path.is_empty() {
                        String::new()
                    } else {
                        format!("{} > ", hit.path.join(" > "))
                    };
                    println!("{}{}  [{}]", prefix, hit.text, &hit.id.to_string()[..8]);
                }
                println!("\n{} match(es)", hits.len());
            }
            OutputFormat::Json => match serde_json::to_string_pretty(hits) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Failed to serialize results: {}", e),
            },
            OutputFormat::Quiet => {
                for hit in hits {
                    println!("{}", hit.id);
                }
            }
        }
    }

    /// Print the distinct tags of the outline
    pub fn print_tags(&self, tags: &[String]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for tag in tags {
                    println!("#{}", tag);
                }
            }
            OutputFormat::Json => match serde_json::to_string_pretty(tags) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Failed to serialize tags: {}", e),
            },
            OutputFormat::Quiet => {
                for tag in tags {
                    println!("{}", tag);
                }
            }
        }
    }
}

fn print_subtree(items: &[Arc<Item>], depth: usize, show_hidden: bool) {
    for node in items {
        let marker = if !node.has_children() {
            "-"
        } else if node.is_collapsed {
            "+"
        } else {
            "*"
        };
        println!(
            "{:indent$}{} {}  [{}]",
            "",
            marker,
            node.text,
            &node.id.to_string()[..8],
            indent = depth * 2
        );
        if show_hidden || !node.is_collapsed {
            print_subtree(&node.children, depth + 1, show_hidden);
        }
    }
}
