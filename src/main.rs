//! sheetsync - registry sheet synchronizer
//!
//! Reads model and component records, drops the ones the registry spreadsheet
//! already holds and appends the rest to the models and components sheets in
//! batches. Also ships the SVG attribute rewriter used to normalize model icons.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod domain;
mod error;
mod input;
mod markup;
mod progress;
mod registry;
mod sheet;
mod sync;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};

/// Log to stderr, honoring `RUST_LOG` when set
fn init_logging(verbose: bool) {
    let default = if verbose { "sheetsync=debug" } else { "sheetsync=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Sync(args) => commands::sync::run(cli.config.as_deref(), args),
        Commands::RewriteSvg(args) => commands::rewrite_svg::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(&args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
