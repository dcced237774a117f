//! mqlfix CLI — keep MQL sources C++-compatible

use anyhow::Result;
use clap::{Parser, Subcommand};
use engine::Config;
use mqlfix_cli::{cmd, util};
use std::path::PathBuf;

/// Rewrite MQL token patterns to C++-compatible equivalents
#[derive(Parser)]
#[command(name = "mqlfix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: discover mqlfix.toml upward from the cwd)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the replacements a full scan would make, without applying
    Check {
        /// Files or directories to scan
        paths: Vec<PathBuf>,
    },
    /// Apply all replacements (full-document scan)
    Fix {
        /// Files or directories to fix
        paths: Vec<PathBuf>,
    },
    /// Run the external formatter, then apply all replacements
    Fmt {
        /// Files or directories to format and fix
        paths: Vec<PathBuf>,
    },
    /// Watch a directory and rewrite tokens as files change
    Watch {
        /// Directory to watch
        #[arg(default_value = ".")]
        root: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(&std::env::current_dir()?)?,
    };
    util::init_tracing(&config);

    match cli.command {
        Commands::Check { paths } => cmd::check::run(paths).await,
        Commands::Fix { paths } => cmd::fix::run(paths, config).await,
        Commands::Fmt { paths } => cmd::fmt::run(paths, config).await,
        Commands::Watch { root } => cmd::watch::run(root, config).await,
    }
}
