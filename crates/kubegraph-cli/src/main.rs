//! Kubegraph CLI - Command-line interface for Kubegraph
//!
//! Builds the dependency graph of a manifest tree and prints or exports it.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod marker;

#[derive(Parser)]
#[command(name = "kubegraph")]
#[command(author = "Kubegraph Contributors")]
#[command(version)]
#[command(about = "Dependency graphs for Kubernetes manifest trees", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON build configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph and print its entities and references
    Build {
        /// Manifest directory or file (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Export the graph as a node-link JSON document
    Export {
        /// Output file
        #[arg(short, long, default_value = "kubegraph.json")]
        output: PathBuf,

        /// Manifest directory or file (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show which visual marker each kind is drawn with
    Markers,
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = commands::load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Build { path, json } => commands::build(&path, &config, json),
        Commands::Export { output, path } => commands::export(&path, &config, &output),
        Commands::Markers => commands::markers(),
    });

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
