//! Full-body payload fetch for download-link assembly
//!
//! The download link embeds the media bytes in the page as a data URI, so
//! the whole body is buffered in memory here. The buffer is capped by
//! configuration; an unbounded buffer is an explicit opt-in.

use crate::downloader::progress::{ProgressSink, ProgressUpdate};
use crate::utils::MedialinkError;
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;

/// Fetch the entire body of `media_url` into memory.
///
/// Progress is reported through `sink` from observed byte counts. When
/// `limit` is set, a body that would exceed it fails with `PayloadTooLarge`
/// before the excess is buffered.
pub async fn fetch_payload(
    client: &Client,
    media_url: &str,
    limit: Option<u64>,
    sink: &dyn ProgressSink,
) -> Result<Bytes, MedialinkError> {
    debug!("Fetching payload from {}", media_url);

    let response = client.get(media_url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(MedialinkError::UpstreamStatus(status));
    }

    let total = response.content_length();
    collect_body(response.bytes_stream(), total, limit, sink).await
}

/// Accumulate a chunk stream into one buffer, enforcing the cap and
/// reporting progress about once per second plus a final snapshot.
pub(crate) async fn collect_body<S>(
    mut stream: S,
    total: Option<u64>,
    limit: Option<u64>,
    sink: &dyn ProgressSink,
) -> Result<Bytes, MedialinkError>
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Unpin,
{
    let mut buf = BytesMut::new();
    let started = Instant::now();
    let mut last_report = started;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(classify_stream_error)?;

        if let Some(limit) = limit {
            if buf.len() as u64 + chunk.len() as u64 > limit {
                return Err(MedialinkError::PayloadTooLarge { limit });
            }
        }
        buf.extend_from_slice(&chunk);

        let now = Instant::now();
        if now.duration_since(last_report) >= Duration::from_secs(1) {
            sink.on_progress(ProgressUpdate::from_bytes(
                buf.len() as u64,
                total,
                started.elapsed(),
            ));
            last_report = now;
        }
    }

    sink.on_progress(ProgressUpdate::from_bytes(
        buf.len() as u64,
        total.or(Some(buf.len() as u64)),
        started.elapsed(),
    ));

    debug!("Buffered {} bytes", buf.len());
    Ok(buf.freeze())
}

/// A body that dies mid-read is the transient chunking case; anything else
/// from the client is a plain network failure.
fn classify_stream_error(e: reqwest::Error) -> MedialinkError {
    if e.is_body() || e.is_decode() {
        MedialinkError::ChunkedTransfer(e.to_string())
    } else {
        MedialinkError::Network(e)
    }
}
