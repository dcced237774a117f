//! Apply all replacements with a full-document scan

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
use tracing::debug;

pub async fn run(paths: Vec<PathBuf>, config: Config) -> Result<()> {
    let config = Arc::new(config);
    let files = util::collect_mql_files(&paths)?;
    if files.is_empty() {
        println!("No MQL files found.");
        return Ok(());
    }

    let mut applied = 0usize;
    for path in &files {
        let doc = Arc::new(
            FsDocument::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?,
        );
        let session =
            DocumentSession::attach(Arc::clone(&doc) as Arc<dyn DocumentHost>, Arc::clone(&config))
                .await;

        match session.force_apply().await {
            ApplyOutcome::Applied(count) => {
                applied += count;
                println!(
                    "{}: {} replacement(s)",
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
                debug!(file = %path.display(), "nothing to do");
            }
        }
        session.shutdown().await;
    }

    println!(
        "{} replacement(s) applied across {} file(s).",
        applied.green(),
        files.len()
    );
    Ok(())
}
