//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sheetsync - registry sheet synchronizer
///
/// Deduplicate model and component records and append the new ones to the
/// registry spreadsheet in batches.
#[derive(Parser, Debug)]
#[command(
    name = "sheetsync",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Deduplicating, batching synchronizer for registry spreadsheets",
    long_about = "sheetsync reads model and component records, skips the ones already present \
                  in the registry spreadsheet and appends the rest in batches, one append per \
                  sheet at a time.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  sheetsync sync --sheet-id 1AbC --api-token $TOKEN generated/\n    \
                  sheetsync sync --sheet-id local --out-dir ./sheets units.jsonl\n    \
                  sheetsync rewrite-svg --attr fill --value currentColor '<svg fill=\\\"red\\\"/>'"
)]
pub struct Cli {
    /// Configuration file (defaults to <config dir>/sheetsync/config.yaml)
    #[arg(long, short = 'c', global = true, env = "SHEETSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Append new models and components to the registry sheets
    Sync(SyncArgs),

    /// Rewrite an attribute on every element of escaped SVG/XML markup
    RewriteSvg(RewriteSvgArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the sync command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Sync into Google Sheets:\n    sheetsync sync --sheet-id 1AbC --api-token $TOKEN units.jsonl\n\n\
                   Sync into local CSV files:\n    sheetsync sync --sheet-id local --out-dir ./sheets generated/\n\n\
                   Seed from a file instead of reading the sheets:\n    sheetsync sync --sheet-id 1AbC --seed existing.yaml units.jsonl")]
pub struct SyncArgs {
    /// Unit files (.json / .jsonl) or directories containing them
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Spreadsheet identifier
    #[arg(long, env = "SHEETSYNC_SHEET_ID")]
    pub sheet_id: String,

    /// Existing entries (YAML or JSON); read from the sheets when omitted
    #[arg(long)]
    pub seed: Option<PathBuf>,

    /// Write to CSV files under this directory instead of the Sheets API
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Bearer token for the Sheets API
    #[arg(long, env = "SHEETSYNC_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Model rows per append
    #[arg(long)]
    pub model_batch_size: Option<usize>,

    /// Component rows per append
    #[arg(long)]
    pub component_batch_size: Option<usize>,

    /// Clear pending model rows whenever the component batch flushes
    #[arg(long)]
    pub coupled_flush: bool,
}

/// Arguments for the rewrite-svg command
#[derive(Parser, Debug)]
pub struct RewriteSvgArgs {
    /// Escaped markup; read from --file when omitted
    #[arg(conflicts_with = "file")]
    pub markup: Option<String>,

    /// File holding the escaped markup
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Local name of the attribute to rewrite
    #[arg(long)]
    pub attr: String,

    /// Replacement value
    #[arg(long)]
    pub value: String,
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long, short = 's')]
    pub shell: String,
}
