//! Dry-run scan: list the replacements a full scan would make

use crate::fs_host::FsDocument;
use crate::util;
use engine::DocumentHost;
use anyhow::{Context, Result};
use mqlfix_core::{scan, RuleSet};
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub async fn run(paths: Vec<PathBuf>) -> Result<()> {
    let files = util::collect_mql_files(&paths)?;
    if files.is_empty() {
        println!("No MQL files found.");
        return Ok(());
    }

    let mut total = 0usize;
    for path in &files {
        let doc = FsDocument::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let snapshot = doc.snapshot();
        let edits = scan::full_scan(RuleSet::standard(), snapshot.lines());

        for edit in &edits {
            let line = snapshot.line(edit.span.line).unwrap_or("");
            let current = &line[edit.span.start..edit.span.end];
            println!(
                "{}:{}:{}: '{}' -> '{}'",
                path.display().cyan(),
                edit.span.line + 1,
                edit.span.start + 1,
                current,
                edit.replacement.green(),
            );
        }
        total += edits.len();
    }

    if total == 0 {
        println!("{}", "Nothing to replace.".green());
    } else {
        println!(
            "{} pending replacement(s) in {} file(s). Run `mqlfix fix` to apply.",
            total.yellow(),
            files.len(),
        );
    }
    Ok(())
}
