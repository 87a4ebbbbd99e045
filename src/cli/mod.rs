use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "catalog-rules")]
#[command(about = "Catalog admission rules - decide which entities may enter the catalog")]
#[command(version)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "catalog-rules.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a single entity kind at a location
    Check {
        /// Entity kind (e.g., Component, Group)
        #[arg(long)]
        kind: String,
        /// Location type (e.g., github, file)
        #[arg(long)]
        location_type: String,
        /// Location target
        #[arg(long, default_value = "")]
        target: String,
    },
    /// Filter a JSON array of entities discovered at one location
    Filter {
        /// JSON file containing an array of entities
        entities: PathBuf,
        /// Location type the entities were discovered through
        #[arg(long)]
        location_type: String,
        /// Location target
        #[arg(long, default_value = "")]
        target: String,
        /// Record every decision in this audit database
        #[arg(long)]
        audit_db: Option<PathBuf>,
    },
    /// Show the configured rule sets
    Show,
    /// Write a bundled rule template to the config path
    Template {
        /// Template name (permissive, no-github-groups, strict)
        name: String,
    },
    /// Create a permissive config if none exists
    Init,
    /// View recorded decisions
    Logs {
        /// Audit database path
        #[arg(long, default_value = "catalog-rules.db")]
        audit_db: PathBuf,
        /// Show last N entries
        #[arg(long, default_value = "50")]
        tail: usize,
        /// Export all entries instead of listing
        #[arg(long)]
        export: bool,
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}
