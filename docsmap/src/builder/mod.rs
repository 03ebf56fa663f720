// Merge logic - combines a fresh scan with the persisted index

use crate::error::{DocsMapError, Result};
use crate::history::{format_timestamp, HistoryProvider};
use crate::index::{load_index, save_index, DocEntry, Section, NOT_AVAILABLE};
use crate::scan::scan_docs;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Knobs for a build run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// File extension that marks a document, without the leading dot.
    pub extension: String,
    /// Fail on a missing index file instead of starting from empty.
    pub strict_index: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            extension: "mdx".to_string(),
            strict_index: false,
        }
    }
}

/// What a build run did, for logging and CLI output.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub sections: usize,
    pub documents: usize,
    pub added: usize,
    pub refreshed: usize,
    /// Entries touched this run that still carry an `"N/A"` value.
    pub unresolved: usize,
}

/// Builds the docs index: scans the tree, merges into the loaded index, and
/// writes the result back. Entries for documents that no longer exist on
/// disk are kept, so the index only ever grows or refreshes.
pub struct DocsIndexBuilder {
    docs_root: PathBuf,
    index_path: PathBuf,
    options: BuildOptions,
}

impl DocsIndexBuilder {
    pub fn new(docs_root: &Path, index_path: &Path, options: BuildOptions) -> Self {
        DocsIndexBuilder {
            docs_root: docs_root.to_path_buf(),
            index_path: index_path.to_path_buf(),
            options,
        }
    }

    /// Run one build with the given timestamp source. The docs root is
    /// validated before the index is read or written, so a bad invocation
    /// leaves the existing index untouched.
    pub fn build(&self, history: &dyn HistoryProvider) -> Result<BuildReport> {
        if !self.docs_root.is_dir() {
            return Err(DocsMapError::Config(format!(
                "Docs directory not found: {}",
                self.docs_root.display()
            )));
        }

        let mut sections = load_index(&self.index_path, self.options.strict_index)?;
        let scanned = scan_docs(&self.docs_root, &self.options.extension)?;

        let mut report = BuildReport::default();
        let mut by_main: HashMap<String, usize> = sections
            .iter()
            .enumerate()
            .map(|(i, s)| (s.main.clone(), i))
            .collect();

        for scanned_section in scanned {
            let si = match by_main.get(&scanned_section.main).copied() {
                Some(i) => i,
                None => {
                    sections.push(Section {
                        main: scanned_section.main.clone(),
                        sub: Vec::new(),
                    });
                    by_main.insert(scanned_section.main.clone(), sections.len() - 1);
                    sections.len() - 1
                }
            };

            let mut by_name: HashMap<String, usize> = sections[si]
                .sub
                .iter()
                .enumerate()
                .map(|(i, d)| (d.name.clone(), i))
                .collect();

            for file in &scanned_section.files {
                let name = match file.file_stem().and_then(|s| s.to_str()) {
                    Some(n) => n.to_string(),
                    None => {
                        log::warn!("Skipping file with unusable name: {}", file.display());
                        continue;
                    }
                };

                let di = match by_name.get(&name).copied() {
                    Some(di) => {
                        sections[si].sub[di].updated_at = history
                            .last_modified(file)
                            .map(format_timestamp)
                            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
                        report.refreshed += 1;
                        di
                    }
                    None => {
                        let date = history
                            .first_added(file)
                            .map(format_timestamp)
                            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
                        let updated_at = history
                            .last_modified(file)
                            .map(format_timestamp)
                            .unwrap_or_else(|| date.clone());
                        sections[si].sub.push(DocEntry {
                            name: name.clone(),
                            date,
                            updated_at,
                        });
                        by_name.insert(name, sections[si].sub.len() - 1);
                        report.added += 1;
                        sections[si].sub.len() - 1
                    }
                };

                let entry = &sections[si].sub[di];
                if entry.date == NOT_AVAILABLE || entry.updated_at == NOT_AVAILABLE {
                    report.unresolved += 1;
                }
            }
        }

        save_index(&self.index_path, &sections)?;

        report.sections = sections.len();
        report.documents = sections.iter().map(|s| s.sub.len()).sum();
        log::info!(
            "Indexed {} documents in {} sections ({} added, {} refreshed)",
            report.documents,
            report.sections,
            report.added,
            report.refreshed
        );
        Ok(report)
    }
}
