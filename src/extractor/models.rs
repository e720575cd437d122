//! Data structures for resolved videos and search listings

use serde::{Deserialize, Serialize};

/// Metadata for a single resolved video.
///
/// Ephemeral: produced per request, rendered, discarded. Fields the source
/// did not report stay `None` and render as "N/A".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    /// Direct, playable media URL for the constrained format
    pub direct_url: String,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    /// Duration in whole seconds
    pub duration: Option<u64>,
}

/// One entry from a flat search listing.
///
/// Listing metadata only; the URL has not been resolved to a playable
/// stream. Order is whatever the extractor returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub title: String,
    pub url: String,
}
