use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocsMapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Index file not found: {path}")]
    MissingIndex { path: String },

    #[error("Malformed index file {path}: {source}")]
    MalformedIndex {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),
}

pub type Result<T> = std::result::Result<T, DocsMapError>;
