//! layer-lint CLI tool.
//!
//! Usage:
//! ```bash
//! layer-lint check [OPTIONS] [PATH]
//! layer-lint list-rules
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Module-boundary governance for layered compiler codebases
#[derive(Parser)]
#[command(name = "layer-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the governed tree and report the verdict
    Check {
        /// Scan base directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Emit the machine-readable JSON verdict instead of text
        #[arg(long)]
        json: bool,

        /// Additionally persist the JSON verdict to this path
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// List the rules in the governance registry
    ListRules,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check { path, json, out } => {
            commands::check::run(&path, json, out.as_deref(), cli.config.as_deref())
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
    }
}
