use thiserror::Error;

/// Error types for nexus-data operations.
/// These are used by both the library and the pipeline crate.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Pipeline directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed collection file {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid status value: {0}")]
    InvalidStatus(String),

    #[error("Invalid tier value: {0}. Valid values: cool, warm, hot")]
    InvalidTier(String),
}

pub type Result<T> = std::result::Result<T, DataError>;
