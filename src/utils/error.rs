//! Error handling for Medialink

use thiserror::Error;

/// Main error type for Medialink
#[derive(Debug, Error)]
pub enum MedialinkError {
    #[error("yt-dlp not found. Please install yt-dlp")]
    YtDlpNotFound,

    #[error("Failed to extract video info: {0}")]
    Extraction(String),

    #[error("Video download link not found")]
    LinkNotFound,

    #[error("Transfer interrupted mid-stream: {0}")]
    ChunkedTransfer(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Response body exceeds the configured limit of {limit} bytes")]
    PayloadTooLarge { limit: u64 },

    #[error("Upstream server returned HTTP {0}")]
    UpstreamStatus(reqwest::StatusCode),
}

/// Coarse failure classification the retry policy dispatches on.
///
/// Only an interrupted in-flight transfer is worth retrying with the same
/// inputs; every other failure reproduces deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transient,
    Permanent,
}

impl MedialinkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MedialinkError::ChunkedTransfer(_) => ErrorKind::Transient,
            _ => ErrorKind::Permanent,
        }
    }
}
