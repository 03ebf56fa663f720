use crate::error::Result;
use notify::{
    Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// A debounced change to one document file.
#[derive(Debug, Clone)]
pub struct WatchEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// Watches the docs tree and reports document changes over an mpsc channel,
/// debounced so one editor save triggers one rebuild.
pub struct DocsWatcher {
    _watcher: RecommendedWatcher,
    /// Handle to the background thread processing events
    _thread: std::thread::JoinHandle<()>,
    /// Receiver for debounced file change events
    pub event_rx: mpsc::Receiver<WatchEvent>,
}

impl DocsWatcher {
    /// Start watching `docs_root` recursively. Only changes to files with
    /// the given extension are reported, after a 300ms debounce window.
    pub fn start(docs_root: &Path, extension: &str) -> Result<Self> {
        let (notify_tx, notify_rx) = mpsc::channel::<notify::Result<Event>>();
        let (event_tx, event_rx) = mpsc::channel::<WatchEvent>();

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = notify_tx.send(res);
            },
            Config::default(),
        )?;
        watcher.watch(docs_root, RecursiveMode::Recursive)?;

        let extension = extension.to_string();

        // Background thread to process events with debouncing
        let thread = std::thread::spawn(move || {
            let debounce = Duration::from_millis(300);
            let mut pending: Vec<(PathBuf, ChangeKind)> = Vec::new();
            let mut last_event = Instant::now();

            loop {
                match notify_rx.recv_timeout(debounce) {
                    Ok(Ok(event)) => {
                        let kind = match event.kind {
                            EventKind::Create(_) => Some(ChangeKind::Created),
                            EventKind::Modify(_) => Some(ChangeKind::Modified),
                            EventKind::Remove(_) => Some(ChangeKind::Deleted),
                            _ => None,
                        };

                        if let Some(kind) = kind {
                            for path in event.paths {
                                if is_docs_file(&path, &extension) {
                                    pending.push((path, kind));
                                }
                            }
                        }
                        last_event = Instant::now();
                    }
                    Ok(Err(e)) => {
                        log::warn!("File watcher error: {e}");
                    }
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        // Debounce: if enough time has passed since the last event, flush
                        if !pending.is_empty() && last_event.elapsed() >= debounce {
                            // Deduplicate paths (keep last change kind)
                            let mut seen = std::collections::HashMap::new();
                            for (path, kind) in pending.drain(..) {
                                seen.insert(path, kind);
                            }
                            for (path, kind) in seen {
                                if event_tx.send(WatchEvent { path, kind }).is_err() {
                                    return; // Receiver dropped
                                }
                            }
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        // Watcher was dropped, exit the thread
                        break;
                    }
                }
            }
        });

        Ok(DocsWatcher {
            _watcher: watcher,
            _thread: thread,
            event_rx,
        })
    }
}

/// The kind of file change detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
}

/// Check if a path is a document we index.
fn is_docs_file(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_docs_file() {
        assert!(is_docs_file(Path::new("docs/guides/setup.mdx"), "mdx"));
        assert!(!is_docs_file(Path::new("docs/guides/setup.md"), "mdx"));
        assert!(!is_docs_file(Path::new("docs/guides"), "mdx"));
        assert!(!is_docs_file(Path::new("docs/.mdx/hidden"), "mdx"));
    }

    #[test]
    fn test_watcher_reports_only_matching_files() {
        let tmp = TempDir::new().unwrap();
        let watcher = DocsWatcher::start(tmp.path(), "mdx").unwrap();

        std::fs::write(tmp.path().join("page.mdx"), "# page\n").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "scratch\n").unwrap();

        let event = watcher
            .event_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("expected a debounced event for page.mdx");
        assert_eq!(
            event.path.file_name().and_then(|n| n.to_str()),
            Some("page.mdx")
        );

        // The txt write must not surface after the batch has flushed
        assert!(watcher
            .event_rx
            .recv_timeout(Duration::from_millis(700))
            .is_err());
    }
}
