use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid flow document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("node #{index} has an empty id")]
    EmptyNodeId { index: usize },
    #[error("duplicate node id `{0}`")]
    DuplicateNodeId(String),
    #[error("edge #{index} has an empty id")]
    EmptyEdgeId { index: usize },
    #[error("duplicate edge id `{0}`")]
    DuplicateEdgeId(String),
}
