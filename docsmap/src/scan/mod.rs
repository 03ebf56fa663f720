use crate::error::{DocsMapError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Files found under one directory of the docs tree, in the order the
/// walk produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedSection {
    pub main: String,
    pub files: Vec<PathBuf>,
}

/// Recursively collect every `*.{extension}` file under `docs_root`,
/// grouped by parent directory. Section order follows first appearance
/// in the walk, so reruns over an unchanged tree produce the same order.
pub fn scan_docs(docs_root: &Path, extension: &str) -> Result<Vec<ScannedSection>> {
    if !docs_root.is_dir() {
        return Err(DocsMapError::Config(format!(
            "Docs directory not found: {}",
            docs_root.display()
        )));
    }

    let pattern = format!("{}/**/*.{}", docs_root.display(), extension);
    let paths = glob::glob(&pattern)
        .map_err(|e| DocsMapError::Config(format!("Invalid docs path pattern: {e}")))?;

    let mut sections: Vec<ScannedSection> = Vec::new();
    let mut by_main: HashMap<String, usize> = HashMap::new();

    for path in paths.filter_map(|r| r.ok()).filter(|p| p.is_file()) {
        let main = section_key(docs_root, &path);
        let idx = *by_main.entry(main.clone()).or_insert_with(|| {
            sections.push(ScannedSection {
                main,
                files: Vec::new(),
            });
            sections.len() - 1
        });
        sections[idx].files.push(path);
    }

    Ok(sections)
}

/// Section key for a file: its parent directory relative to the docs root,
/// with `/` separators. Files directly in the root map to `"."`.
fn section_key(docs_root: &Path, file: &Path) -> String {
    let rel = file
        .parent()
        .and_then(|p| p.strip_prefix(docs_root).ok())
        .unwrap_or_else(|| Path::new(""));

    if rel.as_os_str().is_empty() {
        ".".to_string()
    } else {
        rel.to_string_lossy().replace('\\', "/")
    }
}
