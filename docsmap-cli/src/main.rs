use clap::{Parser, Subcommand, ValueEnum};
use docsmap::{
    BuildOptions, DocsIndexBuilder, DocsMapConfig, DocsWatcher, TimestampSource, WatchEvent,
    NOT_AVAILABLE,
};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::mpsc;

/// docsmap CLI - build and inspect a documentation index from the command line
#[derive(Parser)]
#[command(name = "docsmap", version, about)]
struct Cli {
    /// Documentation directory to scan (default: docs)
    #[arg(long)]
    docs_dir: Option<PathBuf>,

    /// Index file to read and write (default: docs-map.json)
    #[arg(long)]
    index_file: Option<PathBuf>,

    /// Config file path (default: docsmap.yaml, if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "yaml")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum TimestampsArg {
    /// Dates from the file's git log
    Git,
    /// Dates from file metadata
    Fs,
}

impl From<TimestampsArg> for TimestampSource {
    fn from(arg: TimestampsArg) -> Self {
        match arg {
            TimestampsArg::Git => TimestampSource::Git,
            TimestampsArg::Fs => TimestampSource::Filesystem,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Scan the docs tree and update the index once
    Build {
        /// Documentation file extension (default: mdx)
        #[arg(long)]
        extension: Option<String>,

        /// Where timestamps come from (default: git)
        #[arg(long)]
        timestamps: Option<TimestampsArg>,

        /// Fail if the index file does not exist yet
        #[arg(long)]
        strict_index: bool,
    },

    /// Build once, then rebuild whenever the docs tree changes
    Watch {
        /// Documentation file extension (default: mdx)
        #[arg(long)]
        extension: Option<String>,

        /// Where timestamps come from (default: git)
        #[arg(long)]
        timestamps: Option<TimestampsArg>,
    },

    /// Summarize the current index without rebuilding it
    Status,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        // Machine-readable error prefix for calling scripts
        eprintln!("ERROR:{e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli.config)?;
    let docs_dir = cli
        .docs_dir
        .clone()
        .or_else(|| config.docs_dir.clone())
        .unwrap_or_else(|| PathBuf::from("docs"));
    let index_file = cli
        .index_file
        .clone()
        .or_else(|| config.index_file.clone())
        .unwrap_or_else(|| PathBuf::from("docs-map.json"));

    match cli.command {
        Command::Build {
            extension,
            timestamps,
            strict_index,
        } => {
            let mut options = BuildOptions::default();
            if let Some(ext) = extension.or(config.extension) {
                options.extension = ext;
            }
            options.strict_index = strict_index || config.strict_index.unwrap_or(false);

            let source = resolve_source(timestamps, config.timestamps);
            let provider = source.provider();
            let builder = DocsIndexBuilder::new(&docs_dir, &index_file, options);
            let report = builder.build(provider.as_ref())?;
            print_output(&serde_json::to_value(&report)?, &cli.format);
        }

        Command::Watch {
            extension,
            timestamps,
        } => {
            let mut options = BuildOptions::default();
            if let Some(ext) = extension.or(config.extension) {
                options.extension = ext;
            }
            options.strict_index = config.strict_index.unwrap_or(false);

            let source = resolve_source(timestamps, config.timestamps);
            let provider = source.provider();
            let builder = DocsIndexBuilder::new(&docs_dir, &index_file, options.clone());

            let report = builder.build(provider.as_ref())?;
            println!(
                "Indexed {} documents in {} sections, watching {} for changes...",
                report.documents,
                report.sections,
                docs_dir.display()
            );

            let watcher = DocsWatcher::start(&docs_dir, &options.extension)?;
            for event in watcher.event_rx.iter() {
                log::debug!("Change detected: {:?} {}", event.kind, event.path.display());
                drain_pending(&watcher.event_rx);
                match builder.build(provider.as_ref()) {
                    Ok(report) => {
                        println!(
                            "Rebuilt index: {} added, {} refreshed",
                            report.added, report.refreshed
                        );
                    }
                    Err(e) => {
                        // Keep watching; the next change may succeed
                        eprintln!("ERROR:{e}");
                    }
                }
            }
        }

        Command::Status => {
            let sections = docsmap::index::load_index(&index_file, false)?;

            let mut per_section = serde_json::Map::new();
            let mut documents = 0;
            let mut last_updated: Option<String> = None;
            for section in &sections {
                documents += section.sub.len();
                per_section.insert(section.main.clone(), serde_json::json!(section.sub.len()));
                for doc in &section.sub {
                    // Timestamp strings sort chronologically
                    if doc.updated_at != NOT_AVAILABLE
                        && last_updated
                            .as_deref()
                            .map_or(true, |cur| doc.updated_at.as_str() > cur)
                    {
                        last_updated = Some(doc.updated_at.clone());
                    }
                }
            }

            print_output(
                &serde_json::json!({
                    "index_file": index_file.display().to_string(),
                    "sections": sections.len(),
                    "documents": documents,
                    "per_section": per_section,
                    "last_updated": last_updated,
                }),
                &cli.format,
            );
        }
    }

    Ok(())
}

/// Load the config file. An explicitly passed path must exist; the default
/// `docsmap.yaml` is optional.
fn load_config(path: &Option<PathBuf>) -> Result<DocsMapConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(docsmap::config::parse_config(p)?),
        None => {
            let default = Path::new("docsmap.yaml");
            if default.exists() {
                Ok(docsmap::config::parse_config(default)?)
            } else {
                Ok(DocsMapConfig::default())
            }
        }
    }
}

fn resolve_source(
    flag: Option<TimestampsArg>,
    config: Option<TimestampSource>,
) -> TimestampSource {
    flag.map(TimestampSource::from).or(config).unwrap_or_default()
}

/// One debounce flush sends one event per changed path; drain the rest so
/// a multi-file save rebuilds once.
fn drain_pending(rx: &mpsc::Receiver<WatchEvent>) {
    while rx.try_recv().is_ok() {}
}

fn print_output(value: &serde_json::Value, format: &OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value).unwrap());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(value).unwrap());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsmap::ChangeKind;

    #[test]
    fn test_drain_pending_empties_queued_events() {
        let (tx, rx) = mpsc::channel();
        for name in ["a.mdx", "b.mdx", "c.mdx"] {
            tx.send(WatchEvent {
                path: PathBuf::from(name),
                kind: ChangeKind::Modified,
            })
            .unwrap();
        }

        drain_pending(&rx);
        assert!(rx.try_recv().is_err());
    }
}
