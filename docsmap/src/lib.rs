pub mod builder;
pub mod config;
pub mod error;
pub mod history;
pub mod index;
pub mod scan;
pub mod watcher;

pub use builder::{BuildOptions, BuildReport, DocsIndexBuilder};
pub use config::DocsMapConfig;
pub use error::{DocsMapError, Result};
pub use history::{FsHistory, GitHistory, HistoryProvider, TimestampSource};
pub use index::{DocEntry, Section, NOT_AVAILABLE};
pub use watcher::{ChangeKind, DocsWatcher, WatchEvent};
