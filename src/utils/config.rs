//! Application configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default cap on the in-memory payload buffer (256 MiB).
///
/// The download link embeds the whole payload as a data URI, so the entire
/// body lives in memory before the page is rendered. Unbounded buffering is
/// still available by setting `max_payload_bytes` to `None`.
pub const DEFAULT_MAX_PAYLOAD_BYTES: u64 = 256 * 1024 * 1024;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Address the HTTP surface binds to
    pub bind_addr: SocketAddr,

    /// Explicit path to the yt-dlp binary; discovered when unset
    pub ytdlp_path: Option<PathBuf>,

    /// Number of entries requested from a flat search
    pub search_limit: usize,

    /// Cap on the buffered download payload; `None` means unbounded
    pub max_payload_bytes: Option<u64>,

    /// Retry policy for transient extraction failures
    pub retry: crate::extractor::RetryPolicy,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            ytdlp_path: None,
            search_limit: 10,
            max_payload_bytes: Some(DEFAULT_MAX_PAYLOAD_BYTES),
            retry: crate::extractor::RetryPolicy::default(),
        }
    }
}
