//! yt-dlp wrapper for video extraction
//!
//! Resolves video pages to direct media URLs and runs flat keyword searches
//! by shelling out to yt-dlp. Supports system-installed yt-dlp found on PATH
//! or in common install locations.

use crate::downloader::{ProgressSink, ProgressUpdate};
use crate::extractor::models::{SearchEntry, VideoInfo};
use crate::extractor::traits::Extractor;
use crate::utils::MedialinkError;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command as AsyncCommand;
use tracing::{debug, error, info, warn};

/// stderr markers for an HTTP response that died mid-transfer. These are the
/// only failures worth retrying; they must reach the retry wrapper as
/// `ChunkedTransfer` instead of being folded into the generic extraction
/// error.
const TRANSIENT_MARKERS: &[&str] = &[
    "IncompleteRead",
    "ChunkedEncodingError",
    "Connection broken",
    "Connection reset by peer",
];

/// Raw shape of the JSON object yt-dlp prints with `--dump-json`.
/// Every field is optional; absence maps to an explicit unknown downstream.
#[derive(Debug, Deserialize)]
struct InfoPayload {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    view_count: Option<u64>,
    #[serde(default)]
    like_count: Option<u64>,
    #[serde(default)]
    duration: Option<f64>,
}

/// One line of `--flat-playlist --dump-json` output.
#[derive(Debug, Deserialize)]
struct EntryPayload {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Video extractor backed by the yt-dlp binary
pub struct YtDlpExtractor {
    ytdlp_path: PathBuf,
}

impl YtDlpExtractor {
    /// Initialize the extractor, discovering yt-dlp on this machine.
    pub fn new() -> Result<Self, MedialinkError> {
        match find_ytdlp() {
            Some(path) => {
                info!("Found yt-dlp at: {}", path.display());
                Ok(Self { ytdlp_path: path })
            }
            None => {
                error!("yt-dlp not found on PATH or in common install locations");
                Err(MedialinkError::YtDlpNotFound)
            }
        }
    }

    /// Use an explicitly configured yt-dlp binary instead of discovery.
    pub fn with_path(ytdlp_path: PathBuf) -> Self {
        Self { ytdlp_path }
    }

    pub fn ytdlp_path(&self) -> &PathBuf {
        &self.ytdlp_path
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn id(&self) -> &'static str {
        "ytdlp"
    }

    /// Resolve video metadata without downloading.
    /// Uses: yt-dlp -f "best[height<=N]" --dump-json --no-download
    async fn resolve(
        &self,
        url: &str,
        max_height: u32,
        sink: &dyn ProgressSink,
    ) -> Result<VideoInfo, MedialinkError> {
        debug!("Resolving {} (height cap {})", url, max_height);

        let output = AsyncCommand::new(&self.ytdlp_path)
            .arg("-f")
            .arg(format!("best[height<={}]", max_height))
            .arg("--dump-json")
            .arg("--no-download")
            .arg("--newline")
            .arg("--no-warnings")
            .arg(url)
            .output()
            .await?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        forward_progress_lines(&stderr, sink);

        if !output.status.success() {
            error!("yt-dlp extraction failed: {}", stderr.trim());
            return Err(classify_failure(&stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut json_line = None;
        for line in stdout.lines() {
            if let Some(update) = parse_progress_line(line) {
                sink.on_progress(update);
            } else if line.trim_start().starts_with('{') {
                json_line = Some(line);
            }
        }

        let raw = json_line
            .ok_or_else(|| MedialinkError::Extraction("yt-dlp produced no metadata".to_string()))?;
        let video_info = parse_info_json(raw)?;
        info!("Video information fetched: {}", video_info.title);

        Ok(video_info)
    }

    /// Flat keyword search against the hosting service.
    /// Uses: yt-dlp --flat-playlist --dump-json "ytsearch{limit}:{query}"
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchEntry>, MedialinkError> {
        debug!("Searching for: {} (limit: {})", query, limit);

        let output = AsyncCommand::new(&self.ytdlp_path)
            .arg("--flat-playlist")
            .arg("--dump-json")
            .arg("--no-warnings")
            .arg(format!("ytsearch{}:{}", limit, query))
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("yt-dlp search failed: {}", stderr.trim());
            return Err(MedialinkError::Extraction(stderr.trim().to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_search_lines(&stdout))
    }
}

/// Map a single `--dump-json` object to `VideoInfo`.
///
/// A payload with no `url` field has no playable link; that is a hard
/// failure, not a partial result.
pub fn parse_info_json(raw: &str) -> Result<VideoInfo, MedialinkError> {
    let payload: InfoPayload = serde_json::from_str(raw)?;

    let direct_url = payload.url.ok_or(MedialinkError::LinkNotFound)?;

    Ok(VideoInfo {
        title: payload.title.unwrap_or_else(|| "N/A".to_string()),
        direct_url,
        view_count: payload.view_count,
        like_count: payload.like_count,
        duration: payload.duration.map(|d| d as u64),
    })
}

/// Parse flat-search output: one JSON object per line. Unparseable lines are
/// skipped so one malformed entry cannot sink the whole listing.
pub fn parse_search_lines(raw: &str) -> Vec<SearchEntry> {
    let mut entries = Vec::new();

    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<EntryPayload>(line) {
            Ok(entry) => entries.push(SearchEntry {
                title: entry.title.unwrap_or_else(|| "N/A".to_string()),
                url: entry.url.unwrap_or_else(|| "N/A".to_string()),
            }),
            Err(e) => {
                warn!("Skipping malformed search entry: {}", e);
            }
        }
    }

    entries
}

/// Decide whether a failed run died mid-transfer or failed outright.
fn classify_failure(stderr: &str) -> MedialinkError {
    if TRANSIENT_MARKERS.iter().any(|marker| stderr.contains(marker)) {
        MedialinkError::ChunkedTransfer(stderr.trim().to_string())
    } else {
        MedialinkError::Extraction(stderr.trim().to_string())
    }
}

fn forward_progress_lines(text: &str, sink: &dyn ProgressSink) {
    for line in text.lines() {
        if let Some(update) = parse_progress_line(line) {
            sink.on_progress(update);
        }
    }
}

/// Parse one yt-dlp progress line into a structured update.
///
/// Expected shape: `[download]  42.5% of ~ 150.00MiB at  5.20MiB/s ETA 00:15`
pub fn parse_progress_line(line: &str) -> Option<ProgressUpdate> {
    if !line.contains("[download]") || !line.contains('%') {
        return None;
    }

    let mut percent = None;
    let mut speed = 0.0;
    let mut eta = None;

    let mut tokens = line.split_whitespace();
    while let Some(token) = tokens.next() {
        if let Some(stripped) = token.strip_suffix('%') {
            percent = stripped.parse::<f64>().ok();
        } else if token == "at" {
            if let Some(rate) = tokens.next() {
                speed = parse_rate(rate).unwrap_or(0.0);
            }
        } else if token == "ETA" {
            if let Some(clock) = tokens.next() {
                eta = parse_clock(clock);
            }
        }
    }

    percent.map(|percent| ProgressUpdate { percent, speed, eta })
}

/// Parse a rate token like "5.20MiB/s" into bytes per second.
fn parse_rate(token: &str) -> Option<f64> {
    parse_size(token.strip_suffix("/s")?)
}

/// Parse a size token like "150.00MiB" into bytes.
fn parse_size(token: &str) -> Option<f64> {
    let split = token
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(token.len());
    let value: f64 = token[..split].parse().ok()?;

    let scale = match &token[split..] {
        "KiB" => 1024.0,
        "MiB" => 1024.0 * 1024.0,
        "GiB" => 1024.0 * 1024.0 * 1024.0,
        "B" | "" => 1.0,
        _ => return None,
    };

    Some(value * scale)
}

/// Parse a clock token like "00:15" or "01:02:03" into a duration.
fn parse_clock(token: &str) -> Option<Duration> {
    let mut secs: u64 = 0;
    for part in token.split(':') {
        secs = secs.checked_mul(60)?.checked_add(part.parse().ok()?)?;
    }
    Some(Duration::from_secs(secs))
}

// ============================================================
// yt-dlp Detection
// ============================================================

/// Find the yt-dlp binary: PATH first, then common install locations.
pub fn find_ytdlp() -> Option<PathBuf> {
    if let Ok(path) = which::which("yt-dlp") {
        if path.exists() {
            return Some(path);
        }
    }

    let common_paths = [
        "/opt/homebrew/bin/yt-dlp",
        "/usr/local/bin/yt-dlp",
        "/usr/bin/yt-dlp",
        "~/.local/bin/yt-dlp",
    ];

    for path_str in common_paths {
        let expanded = match path_str.strip_prefix("~/") {
            Some(rest) => match std::env::var_os("HOME") {
                Some(home) => PathBuf::from(home).join(rest),
                None => continue,
            },
            None => PathBuf::from(path_str),
        };

        if expanded.is_file() {
            return Some(expanded);
        }
    }

    None
}
