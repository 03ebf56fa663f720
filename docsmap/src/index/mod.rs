// Index file I/O - the persisted JSON mapping sections to documents

use crate::error::{DocsMapError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Sentinel recorded when no timestamp source could resolve a date.
pub const NOT_AVAILABLE: &str = "N/A";

/// A directory-level grouping of documents, keyed by path relative to the
/// docs root (`"."` for documents sitting in the root itself).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub main: String,
    pub sub: Vec<DocEntry>,
}

/// One qualifying document within a section. `name` is the filename without
/// its extension; both timestamps are `YYYY-MM-DD HH:MM:SS` strings or the
/// `"N/A"` sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocEntry {
    pub name: String,
    pub date: String,
    #[serde(rename = "updated-at")]
    pub updated_at: String,
}

/// Load the index from `path`. A missing file yields an empty index unless
/// `strict` is set; a file that exists but does not parse is always fatal,
/// since the index is trusted as this tool's own prior output.
pub fn load_index(path: &Path, strict: bool) -> Result<Vec<Section>> {
    if !path.exists() {
        if strict {
            return Err(DocsMapError::MissingIndex {
                path: path.display().to_string(),
            });
        }
        return Ok(Vec::new());
    }

    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|source| DocsMapError::MalformedIndex {
        path: path.display().to_string(),
        source,
    })
}

/// Serialize the index with 4-space indentation and replace `path` in one
/// rename, so readers never observe a partially written file. Parent
/// directories are created as needed.
pub fn save_index(path: &Path, sections: &[Section]) -> Result<()> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = parent {
        std::fs::create_dir_all(dir)?;
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    sections.serialize(&mut ser)?;

    let dir = parent.unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&buf)?;
    tmp.persist(path).map_err(|e| DocsMapError::Io(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample() -> Vec<Section> {
        vec![Section {
            main: "guides".to_string(),
            sub: vec![DocEntry {
                name: "setup".to_string(),
                date: "2024-01-10 08:30:00".to_string(),
                updated_at: "2024-02-01 12:00:00".to_string(),
            }],
        }]
    }

    #[test]
    fn test_save_uses_four_space_indent_and_renamed_key() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docs-map.json");
        save_index(&path, &sample()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let expected = "\
[
    {
        \"main\": \"guides\",
        \"sub\": [
            {
                \"name\": \"setup\",
                \"date\": \"2024-01-10 08:30:00\",
                \"updated-at\": \"2024-02-01 12:00:00\"
            }
        ]
    }
]";
        assert_eq!(raw, expected);
        assert!(!raw.contains("updated_at"));
    }

    #[test]
    fn test_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docs-map.json");
        let sections = sample();

        save_index(&path, &sections).unwrap();
        let loaded = load_index(&path, false).unwrap();
        assert_eq!(loaded, sections);
    }

    #[test]
    fn test_load_missing_lenient_is_empty() {
        let tmp = TempDir::new().unwrap();
        let loaded = load_index(&tmp.path().join("absent.json"), false).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_missing_strict_fails() {
        let tmp = TempDir::new().unwrap();
        let result = load_index(&tmp.path().join("absent.json"), true);
        assert!(matches!(result, Err(DocsMapError::MissingIndex { .. })));
    }

    #[test]
    fn test_load_malformed_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docs-map.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = load_index(&path, false);
        assert!(matches!(result, Err(DocsMapError::MalformedIndex { .. })));
    }

    #[test]
    fn test_load_wrong_shape_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docs-map.json");
        std::fs::write(&path, r#"[{"main": 42, "sub": []}]"#).unwrap();

        let result = load_index(&path, false);
        assert!(matches!(result, Err(DocsMapError::MalformedIndex { .. })));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/output/docs-map.json");
        save_index(&path, &sample()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docs-map.json");
        std::fs::write(&path, "stale contents that are much longer than the new index").unwrap();

        save_index(&path, &[]).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "[]");
    }
}
