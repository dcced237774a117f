//! Watch daemon: rewrite tokens as files change on disk

use crate::delta;
use crate::fs_host::FsDocument;
use crate::util;
use anyhow::{Context, Result};
use engine::host::DocumentHost;
use engine::session::DocumentSession;
use engine::{mode, Config};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Per-file state owned by the watch loop
struct WatchedFile {
    doc: Arc<FsDocument>,
    session: DocumentSession,
}

pub async fn run(root: PathBuf, config: Config) -> Result<()> {
    let root = root
        .canonicalize()
        .with_context(|| format!("cannot watch {}", root.display()))?;
    let config = Arc::new(config);
    let mut files: HashMap<PathBuf, WatchedFile> = HashMap::new();

    // Adopt the MQL files already present, the activation-time equivalent of
    // sweeping the host's open documents.
    for path in util::collect_mql_files(&[root.clone()])? {
        if let Err(err) = attach(&mut files, &path, &config).await {
            warn!(file = %path.display(), error = %err, "failed to adopt file");
        }
    }
    info!(count = files.len(), root = %root.display(), "watching for changes");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
        match result {
            Ok(event) => {
                let _ = tx.send(event);
            }
            Err(err) => warn!(error = %err, "watch error"),
        }
    })
    .context("failed to create file watcher")?;
    watcher
        .watch(&root, RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch {}", root.display()))?;

    while let Some(event) = rx.recv().await {
        match event.kind {
            EventKind::Create(_) => {
                for path in &event.paths {
                    if !util::is_mql_path(path) || files.contains_key(path) {
                        continue;
                    }
                    match attach(&mut files, path, &config).await {
                        Ok(()) => info!(file = %path.display(), "adopted new file"),
                        Err(err) => {
                            warn!(file = %path.display(), error = %err, "failed to adopt file");
                        }
                    }
                }
            }
            EventKind::Modify(_) => {
                for path in &event.paths {
                    notify_modified(&files, path);
                }
            }
            EventKind::Remove(_) => {
                for path in &event.paths {
                    if let Some(watched) = files.remove(path) {
                        debug!(file = %path.display(), "file removed, dropping session");
                        watched.session.shutdown().await;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

async fn attach(
    files: &mut HashMap<PathBuf, WatchedFile>,
    path: &Path,
    config: &Arc<Config>,
) -> Result<()> {
    let doc = Arc::new(
        FsDocument::open(path).with_context(|| format!("failed to open {}", path.display()))?,
    );
    let session =
        DocumentSession::attach(Arc::clone(&doc) as Arc<dyn DocumentHost>, Arc::clone(config))
            .await;
    files.insert(path.to_path_buf(), WatchedFile { doc, session });
    Ok(())
}

/// Turn a modify notification into a change event for the session
///
/// The daemon's own writes come straight back as modify events; they diff to
/// an empty event and arrive while the guard is still set, so the session
/// filter drops them and the feedback loop never closes.
fn notify_modified(files: &HashMap<PathBuf, WatchedFile>, path: &Path) {
    let Some(watched) = files.get(path) else {
        return;
    };
    if !mode::is_mql_as_cpp(watched.doc.as_ref()) {
        return;
    }
    match watched.doc.refresh_from_disk() {
        Ok(previous) => {
            let event = delta::change_event(&previous, &watched.doc.snapshot());
            watched.session.notify_change(event);
        }
        Err(err) => {
            warn!(file = %path.display(), error = %err, "failed to re-read file");
        }
    }
}
