//! Medialink library

pub mod downloader;
pub mod extractor;
pub mod utils;
pub mod web;

// Re-export main types for easier use
pub use downloader::{build_download_link, fetch_payload, CollectingSink, NullSink, ProgressSink, ProgressUpdate};
pub use extractor::{resolve_with_retry, Extractor, RetryPolicy, SearchEntry, VideoInfo, YtDlpExtractor};
pub use utils::{AppSettings, ErrorKind, MedialinkError};
pub use web::AppState;
