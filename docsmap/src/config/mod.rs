use crate::error::Result;
use crate::history::TimestampSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-level settings. Every field is optional; command-line flags take
/// precedence over the file, and built-in defaults cover the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocsMapConfig {
    #[serde(default)]
    pub docs_dir: Option<PathBuf>,
    #[serde(default)]
    pub index_file: Option<PathBuf>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub timestamps: Option<TimestampSource>,
    #[serde(default)]
    pub strict_index: Option<bool>,
}

/// Parse a config file from disk.
pub fn parse_config(path: &Path) -> Result<DocsMapConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config_str(&content)
}

/// Parse config from a YAML string. An empty file is a valid config with
/// nothing set.
pub fn parse_config_str(content: &str) -> Result<DocsMapConfig> {
    if content.trim().is_empty() {
        return Ok(DocsMapConfig::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
docs_dir: documentation
index_file: out/docs-map.json
extension: md
timestamps: fs
strict_index: true
"#;
        let config = parse_config_str(yaml).unwrap();
        assert_eq!(config.docs_dir, Some(PathBuf::from("documentation")));
        assert_eq!(config.index_file, Some(PathBuf::from("out/docs-map.json")));
        assert_eq!(config.extension, Some("md".to_string()));
        assert_eq!(config.timestamps, Some(TimestampSource::Filesystem));
        assert_eq!(config.strict_index, Some(true));
    }

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config_str("docs_dir: documentation\n").unwrap();
        assert_eq!(config.docs_dir, Some(PathBuf::from("documentation")));
        assert!(config.index_file.is_none());
        assert!(config.timestamps.is_none());
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_str("").unwrap();
        assert!(config.docs_dir.is_none());
        let config = parse_config_str("   \n\n").unwrap();
        assert!(config.index_file.is_none());
    }

    #[test]
    fn test_parse_git_source() {
        let config = parse_config_str("timestamps: git\n").unwrap();
        assert_eq!(config.timestamps, Some(TimestampSource::Git));
    }

    #[test]
    fn test_parse_unknown_source_fails() {
        assert!(parse_config_str("timestamps: svn\n").is_err());
    }

    #[test]
    fn test_parse_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docsmap.yaml");
        std::fs::write(&path, "extension: markdown\n").unwrap();

        let config = parse_config(&path).unwrap();
        assert_eq!(config.extension, Some("markdown".to_string()));
    }
}
