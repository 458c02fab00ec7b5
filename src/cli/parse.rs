//! CLI parse: clap types for optmap. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// optmap - keep a live option store in line with layered config map documents
#[derive(Parser)]
#[command(name = "optmap")]
#[command(about = "Generate, merge and reconcile config map documents against an option store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, short = 'q', default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a new map document from the store or from another map
    Generate {
        /// Map whose option list (and actions) the output keeps
        #[arg(long)]
        template: Option<String>,
        /// Map to take values from (default: the live option store)
        #[arg(long)]
        values: Option<String>,
        /// Write the document to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// List configured maps in priority order
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one map, or the merge of all maps
    Show {
        /// Map id (omit for the merged view)
        map_id: Option<String>,
        /// Output format (yaml, json or table)
        #[arg(long, default_value = "yaml")]
        format: String,
    },
    /// Apply the merged maps to the option store
    Apply {
        /// Report changes without writing
        #[arg(long)]
        dry_run: bool,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Check the option store against the merged maps (exit 1 on drift)
    Verify {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Rewrite map documents with current store values
    Refresh {
        /// Map id (omit to refresh every map)
        map_id: Option<String>,
    },
    /// Inspect or edit the option store directly
    Store {
        #[command(subcommand)]
        command: StoreCommands,
    },
}

#[derive(Subcommand)]
pub enum StoreCommands {
    /// List stored options
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print one stored option as JSON
    Get {
        /// Option name
        name: String,
    },
    /// Store one option
    Set {
        /// Option name
        name: String,
        /// Value as JSON (e.g. '"Acme"', '42', '{"beta": true}')
        value: String,
    },
}
