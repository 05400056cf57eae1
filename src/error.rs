use std::path::PathBuf;

/// Store-level failures. Every variant aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store file {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize store: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// A document could not be retrieved this run. Recovered by skipping it.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{filename}: HTTP {status}")]
    Status { filename: String, status: u16 },
    #[error("{filename}: {source}")]
    Transport {
        filename: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{filename}: fetch task ended without a result")]
    TaskFailed { filename: String },
}
