// Timestamp providers - where "date" and "updated-at" values come from

use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;

/// Renders a timestamp in the index's `YYYY-MM-DD HH:MM:SS` form, in the
/// offset the timestamp carries.
pub fn format_timestamp(ts: DateTime<FixedOffset>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Source of per-document timestamps. Implementations return `None` when a
/// document's history cannot be resolved; callers record the `"N/A"`
/// sentinel instead of failing the build.
pub trait HistoryProvider {
    /// When the document first appeared.
    fn first_added(&self, path: &Path) -> Option<DateTime<FixedOffset>>;

    /// When the document was last changed.
    fn last_modified(&self, path: &Path) -> Option<DateTime<FixedOffset>>;
}

// ── Git ─────────────────────────────────────────────────────────────────────

/// Reads timestamps from the file's git log. Author dates are normalized to
/// UTC so the index does not mix committer timezones.
#[derive(Debug, Default)]
pub struct GitHistory;

impl GitHistory {
    pub fn new() -> Self {
        GitHistory
    }

    fn log_timestamp(&self, path: &Path, args: &[&str]) -> Option<DateTime<FixedOffset>> {
        let abs = path.canonicalize().ok()?;
        let work_dir = abs.parent()?;

        let output = Command::new("git")
            .args(args)
            .arg("--")
            .arg(&abs)
            .current_dir(work_dir)
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }

        // Newest first; the earliest matching commit is the final line.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let line = stdout.lines().last()?.trim();
        if line.is_empty() {
            return None;
        }

        DateTime::parse_from_rfc3339(line)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).fixed_offset())
    }
}

impl HistoryProvider for GitHistory {
    fn first_added(&self, path: &Path) -> Option<DateTime<FixedOffset>> {
        // --follow tracks renames only in git's native newest-first walk;
        // under --reverse it yields nothing for renamed files, so the
        // earliest add is read from the end of the output instead.
        self.log_timestamp(path, &["log", "--follow", "--diff-filter=A", "--format=%aI"])
    }

    fn last_modified(&self, path: &Path) -> Option<DateTime<FixedOffset>> {
        self.log_timestamp(path, &["log", "-1", "--format=%aI"])
    }
}

// ── Filesystem ──────────────────────────────────────────────────────────────

/// Reads timestamps from file metadata, for trees that are not in version
/// control. Not every filesystem records a creation time, so `first_added`
/// falls back to the modification time.
#[derive(Debug, Default)]
pub struct FsHistory;

impl FsHistory {
    pub fn new() -> Self {
        FsHistory
    }
}

impl HistoryProvider for FsHistory {
    fn first_added(&self, path: &Path) -> Option<DateTime<FixedOffset>> {
        let meta = std::fs::metadata(path).ok()?;
        let t = meta.created().or_else(|_| meta.modified()).ok()?;
        Some(DateTime::<Local>::from(t).fixed_offset())
    }

    fn last_modified(&self, path: &Path) -> Option<DateTime<FixedOffset>> {
        let meta = std::fs::metadata(path).ok()?;
        let t = meta.modified().ok()?;
        Some(DateTime::<Local>::from(t).fixed_offset())
    }
}

// ── Selection ───────────────────────────────────────────────────────────────

/// Which provider a build run uses. A run consults exactly one source, so
/// an index never mixes git dates with filesystem dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampSource {
    #[default]
    Git,
    #[serde(rename = "fs")]
    Filesystem,
}

impl TimestampSource {
    pub fn provider(self) -> Box<dyn HistoryProvider> {
        match self {
            TimestampSource::Git => Box::new(GitHistory::new()),
            TimestampSource::Filesystem => Box::new(FsHistory::new()),
        }
    }
}
