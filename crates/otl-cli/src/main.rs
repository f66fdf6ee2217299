//! OTL CLI
//!
//! Command-line interface for OTL - a keyboard-driven personal outline.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use otl_core::{Config, Direction, SnapshotStore};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "otl")]
#[command(about = "OTL - Personal outline, one deep tree of text items")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the outline, optionally zoomed into one item
    Show {
        /// Item ID to zoom into (full UUID or prefix)
        id: Option<String>,
        /// Include collapsed subtrees
        #[arg(long)]
        all: bool,
    },
    /// Add an item
    Add {
        /// Item text
        text: String,
        /// Nest as the last child of this item
        #[arg(long, conflicts_with = "after")]
        under: Option<String>,
        /// Insert directly after this sibling
        #[arg(long)]
        after: Option<String>,
    },
    /// Replace an item's text
    Edit {
        /// Item ID (full UUID or prefix)
        id: String,
        /// New text
        text: String,
    },
    /// Delete an item and its whole subtree
    #[command(alias = "rm")]
    Delete {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Indent an item under its previous sibling
    Indent {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Outdent an item to its parent's level
    Outdent {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Move an item up or down among its siblings
    Move {
        /// Item ID (full UUID or prefix)
        id: String,
        /// Direction to move
        direction: MoveDirection,
    },
    /// Collapse an item's subtree
    Fold {
        /// Item ID (full UUID or prefix)
        id: String,
        /// Expand instead of collapse
        #[arg(long)]
        open: bool,
        /// Apply to every descendant as well
        #[arg(long)]
        recursive: bool,
    },
    /// Search the whole outline
    Search {
        /// Search query; `OR` separates alternatives, other words all must match
        query: String,
    },
    /// List all tags
    Tags,
    /// Import items from a JSON file (ids are regenerated)
    Import {
        /// Path to the JSON payload
        file: PathBuf,
        /// Nest the imported items under this item
        #[arg(long)]
        under: Option<String>,
    },
    /// Export the outline as JSON
    Export {
        /// Destination file (stdout when omitted)
        file: Option<PathBuf>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MoveDirection {
    Up,
    Down,
}

impl From<MoveDirection> for Direction {
    fn from(direction: MoveDirection) -> Self {
        match direction {
            MoveDirection::Up => Direction::Up,
            MoveDirection::Down => Direction::Down,
        }
    }
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, suggestion_limit)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config doesn't need the snapshot
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let config = Config::load()?;
    let store = SnapshotStore::new(config);
    let items = store.load_or_create(Utc::now())?;

    match cli.command {
        Commands::Show { id, all } => commands::show::show(&items, id, all, &output),
        Commands::Add { text, under, after } => {
            commands::item::add(&store, &items, text, under, after, &output)
        }
        Commands::Edit { id, text } => commands::item::edit(&store, &items, id, text, &output),
        Commands::Delete { id } => commands::item::delete(&store, &items, id, &output),
        Commands::Indent { id } => commands::item::indent(&store, &items, id, &output),
        Commands::Outdent { id } => commands::item::outdent(&store, &items, id, &output),
        Commands::Move { id, direction } => {
            commands::item::move_item(&store, &items, id, direction.into(), &output)
        }
        Commands::Fold {
            id,
            open,
            recursive,
        } => commands::item::fold(&store, &items, id, !open, recursive, &output),
        Commands::Search { query } => commands::search::run(&items, &query, &output),
        Commands::Tags => commands::search::tags(&items, &output),
        Commands::Import { file, under } => {
            commands::port::import(&store, &items, file, under, &output)
        }
        Commands::Export { file } => commands::port::export(&items, file, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}
