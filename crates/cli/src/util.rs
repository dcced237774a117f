//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use engine::{mode, Config};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Initialize the log subscriber
///
/// `RUST_LOG` wins when set; otherwise the `debug` config option decides
/// between info and debug verbosity.
pub fn init_tracing(config: &Config) {
    let fallback = if config.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Collect MQL source files under each of `paths`
///
/// Files are taken as-is when they carry an MQL extension; directories are
/// walked recursively. The result is sorted and de-duplicated.
pub fn collect_mql_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).follow_links(false) {
                let entry = entry
                    .with_context(|| format!("failed to walk {}", path.display()))?;
                if entry.file_type().is_file() && is_mql_path(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else if is_mql_path(path) {
            files.push(path.clone());
        } else {
            anyhow::bail!(
                "{} is not an MQL source file (.mq4/.mq5/.mqh)",
                path.display()
            );
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Whether a path names an MQL source file
pub fn is_mql_path(path: &Path) -> bool {
    path.to_str().is_some_and(mode::is_mql_file)
}
