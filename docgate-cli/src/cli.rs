//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// docgate -- search documents and show only what the subject may read.
///
/// Use `docgate <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "docgate", version, about, long_about = None)]
pub struct Cli {
    /// Path to the docgate.toml configuration file.
    #[arg(short, long, global = true, default_value = "docgate.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the catalog and print the permitted documents.
    Search(SearchArgs),

    /// Ask the catalog's decision point about a single resource.
    Check(CheckArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- search ----

/// Run an authorization-filtered search.
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Search query (whitespace-separated terms, all must match).
    pub query: String,

    /// Subject id to search as (overrides retrieval.subject_id).
    #[arg(short, long)]
    pub user: Option<String>,

    /// Render mode (snippets, snippets-markdown, documents, documents-markdown).
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Maximum number of candidates to retrieve before filtering (<= 0 for unbounded).
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub num_results: Option<i64>,

    /// Catalog file to search (overrides catalog.path).
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Restrict the search to a folder and its subfolders.
    #[arg(long)]
    pub folder: Option<String>,
}

// ---- check ----

/// Show the decision for subject, action and resource.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Subject id (overrides retrieval.subject_id).
    #[arg(short, long)]
    pub user: Option<String>,

    /// Resource name (a container's display name).
    #[arg(short, long)]
    pub resource: String,

    /// Action to check.
    #[arg(short, long, default_value = "read")]
    pub action: String,

    /// Catalog file to consult (overrides catalog.path).
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

// ---- config ----

/// Manage docgate configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, retrieval, catalog).
        #[arg(long)]
        section: Option<String>,
    },
}
