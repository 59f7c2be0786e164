//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use verdant_catalog::{PlantId, StatusFilter};
use verdant_db::PlantOrder;

#[derive(Parser)]
#[command(name = "verdant")]
#[command(about = "Curate, import and moderate the plant catalog", long_about = None)]
pub(crate) struct Cli {
    /// Catalog database path (overrides settings.toml)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Acting user id; admin rights come from `moderation.admins` in settings.toml
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Import curated plant files (JSON or YAML) as approved system records
    Import {
        /// Source files or directories (defaults to `import.sources` in settings.toml)
        files: Vec<PathBuf>,

        /// Run the whole import and report, then roll everything back
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Submit a plant for review
    Submit(SubmitArgs),

    /// Approve a pending contribution
    Approve {
        /// Plant id
        id: PlantId,
    },

    /// Reject a pending contribution
    Reject {
        /// Plant id
        id: PlantId,

        /// Why the contribution was rejected (shown to the contributor)
        reason: String,
    },

    /// Permanently delete a plant record
    Delete {
        /// Plant id
        id: PlantId,

        /// Actually delete (otherwise only show what would be removed)
        #[arg(long)]
        confirm: bool,
    },

    /// Show review queue statistics
    Stats,

    /// List plants
    List(ListArgs),

    /// Report duplicate names and shared latin names across the catalog
    Audit,

    /// Show recent moderation actions
    History {
        /// Only show actions on this plant
        #[arg(long)]
        plant: Option<PlantId>,

        /// Maximum number of entries
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// Show recent batch imports
    Imports {
        /// Maximum number of entries
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// Manage settings.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Fields for a new contribution, or a JSON file holding one.
#[derive(Args, Clone)]
pub(crate) struct SubmitArgs {
    /// Read the plant from a JSON object file instead of flags
    #[arg(long, conflicts_with_all = ["name", "category"])]
    pub file: Option<PathBuf>,

    /// Plant name
    #[arg(long, required_unless_present = "file")]
    pub name: Option<String>,

    /// Category (e.g., vegetable, herb, fruit)
    #[arg(long, required_unless_present = "file")]
    pub category: Option<String>,

    /// Display name (defaults to the name)
    #[arg(long)]
    pub display_name: Option<String>,

    /// Latin (botanical) name
    #[arg(long)]
    pub latin_name: Option<String>,

    #[arg(long)]
    pub subcategory: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Uses, comma separated
    #[arg(long)]
    pub uses: Option<String>,

    /// Companion plants, comma separated
    #[arg(long)]
    pub companions: Option<String>,

    /// Plants to keep apart, comma separated
    #[arg(long)]
    pub avoid: Option<String>,
}

#[derive(Args, Clone)]
pub(crate) struct ListArgs {
    /// Status filter: pending, approved, rejected or all (admin only)
    #[arg(short, long)]
    pub status: Option<StatusFilter>,

    /// Category filter
    #[arg(short, long)]
    pub category: Option<String>,

    /// Page number, starting at 1
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Records per page
    #[arg(long, default_value = "25")]
    pub page_size: u32,

    /// Sort order: newest, oldest or name
    #[arg(short, long, default_value = "newest")]
    pub order: PlantOrder,

    /// Public view: approved records only, no admin rights needed
    #[arg(long)]
    pub public: bool,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the current settings and where they come from
    Show,

    /// Print the settings file path
    Path,

    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
