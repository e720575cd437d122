use crate::downloader::ProgressSink;
use crate::extractor::models::{SearchEntry, VideoInfo};
use crate::utils::MedialinkError;
use async_trait::async_trait;

/// Core trait for video extractors
///
/// This trait isolates the web layer from the specific extraction backend
/// (yt-dlp subprocess today) and lets tests substitute scripted adapters.
/// Errors carry a kind so callers can dispatch a retry policy without
/// matching on backend-specific failure text.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Returns a unique identifier for this extractor (e.g., "ytdlp")
    fn id(&self) -> &'static str;

    /// Resolves a video page URL to a direct media URL plus metadata.
    ///
    /// The requested format is the best available at or below `max_height`
    /// pixels. Progress observed along the way is pushed into `sink`; nothing
    /// progress-related travels in the return value. A response carrying no
    /// usable media URL is `Err(MedialinkError::LinkNotFound)`, never a
    /// partially populated `VideoInfo`.
    async fn resolve(
        &self,
        url: &str,
        max_height: u32,
        sink: &dyn ProgressSink,
    ) -> Result<VideoInfo, MedialinkError>;

    /// Runs a flat keyword search, returning at most `limit` listing entries.
    ///
    /// Zero matches is `Ok` with an empty vector, not an error.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchEntry>, MedialinkError>;
}
