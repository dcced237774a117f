//! Format with the external formatter, then apply replacements

use crate::fs_host::FsDocument;
use crate::util;
use anyhow::{Context, Result};
use engine::applicator::ApplyOutcome;
use engine::host::DocumentHost;
use engine::session::DocumentSession;
use engine::Config;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::sync::Arc;

pub async fn run(paths: Vec<PathBuf>, config: Config) -> Result<()> {
    let config = Arc::new(config);
    let files = util::collect_mql_files(&paths)?;
    if files.is_empty() {
        println!("No MQL files found.");
        return Ok(());
    }

    for path in &files {
        let doc = Arc::new(
            FsDocument::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?,
        );
        let session =
            DocumentSession::attach(Arc::clone(&doc) as Arc<dyn DocumentHost>, Arc::clone(&config))
                .await;

        let (format_error, outcome) = session.format_and_replace().await;
        if let Some(err) = format_error {
            // Advisory only: the replacement step already ran regardless.
            eprintln!(
                "mqlfix: formatting {} failed ({err}); replacements still applied",
                path.display()
            );
        }
        match outcome {
            ApplyOutcome::Applied(count) => {
                println!(
                    "{}: formatted, {} replacement(s)",
                    path.display().cyan(),
                    count.green()
                );
            }
            ApplyOutcome::Rejected => {
                println!(
                    "{}: {}",
                    path.display().cyan(),
                    "could not apply, re-run to retry".yellow()
                );
            }
            ApplyOutcome::Skipped => {
                println!("{}: formatted, nothing to replace", path.display().cyan());
            }
        }
        session.shutdown().await;
    }
    Ok(())
}
