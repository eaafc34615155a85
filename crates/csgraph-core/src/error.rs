//! Error types for analysis runs, manifest parsing and per-match extraction.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that abort a whole analysis run.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Root directory does not exist or is not a directory: {0}")]
    InvalidRoot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Graph store errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("unknown node `{0}`")]
    UnknownNode(String),
}

/// Failure while processing a single recognizer match. The match is skipped,
/// the scan continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("unexpected inheritance list `{0}`")]
    InheritanceList(String),

    #[error("unexpected member `{0}`")]
    UnexpectedMember(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Failure while reading a dependency manifest. The whole file is skipped.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("unrecognised manifest file: {0}")]
    Unrecognised(String),

    #[error("malformed lock file {path}: {source}")]
    MalformedLock {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("lock file {0} is not a JSON object")]
    NotAnObject(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
