//! Bounded retry around transient extraction failures

use crate::downloader::ProgressSink;
use crate::extractor::models::VideoInfo;
use crate::extractor::traits::Extractor;
use crate::utils::{ErrorKind, MedialinkError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, warn};

/// Retry policy: bounded attempts with a fixed pause in between. No backoff,
/// no jitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

/// Resolve a video, retrying only when the failure kind is transient.
///
/// Permanent failures propagate immediately without sleeping. Exhausting
/// `max_attempts` returns the last transient error as a terminal failure.
pub async fn resolve_with_retry(
    extractor: &dyn Extractor,
    url: &str,
    max_height: u32,
    sink: &dyn ProgressSink,
    policy: &RetryPolicy,
) -> Result<VideoInfo, MedialinkError> {
    let mut attempt = 0;

    loop {
        attempt += 1;

        match extractor.resolve(url, max_height, sink).await {
            Ok(info) => return Ok(info),
            Err(e) if e.kind() == ErrorKind::Transient && attempt < policy.max_attempts => {
                warn!(
                    "Transient failure on attempt {}/{}: {}. Retrying in {:?}...",
                    attempt, policy.max_attempts, e, policy.delay
                );
                sleep(policy.delay).await;
            }
            Err(e) => {
                if attempt > 1 {
                    error!("Giving up after {} attempts: {}", attempt, e);
                }
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::NullSink;
    use crate::extractor::models::SearchEntry;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    /// Scripted adapter: fails `failures` times with the configured error
    /// kind, then succeeds.
    struct ScriptedExtractor {
        calls: AtomicUsize,
        failures: usize,
        transient: bool,
    }

    impl ScriptedExtractor {
        fn new(failures: usize, transient: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures,
                transient,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Extractor for ScriptedExtractor {
        fn id(&self) -> &'static str {
            "scripted"
        }

        async fn resolve(
            &self,
            _url: &str,
            _max_height: u32,
            _sink: &dyn ProgressSink,
        ) -> Result<VideoInfo, MedialinkError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                if self.transient {
                    Err(MedialinkError::ChunkedTransfer("mid-stream cut".to_string()))
                } else {
                    Err(MedialinkError::Extraction("unsupported site".to_string()))
                }
            } else {
                Ok(VideoInfo {
                    title: "Demo".to_string(),
                    direct_url: "https://cdn.example.com/v.mp4".to_string(),
                    view_count: Some(100),
                    like_count: Some(10),
                    duration: Some(42),
                })
            }
        }

        async fn search(
            &self,
            _query: &str,
            _limit: usize,
        ) -> Result<Vec<SearchEntry>, MedialinkError> {
            Ok(Vec::new())
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_transient_exhausts_attempts() {
        let extractor = ScriptedExtractor::new(usize::MAX, true);
        let start = Instant::now();

        let result =
            resolve_with_retry(&extractor, "https://example.com/v", 720, &NullSink, &policy())
                .await;

        let err = result.expect_err("exhaustion must be a terminal Err, not a panic");
        assert!(matches!(err, MedialinkError::ChunkedTransfer(_)));
        assert_eq!(extractor.calls(), 3, "exactly max_attempts attempts");
        // two sleeps between three attempts
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_failure_returns_immediately() {
        let extractor = ScriptedExtractor::new(usize::MAX, false);
        let start = Instant::now();

        let result =
            resolve_with_retry(&extractor, "https://example.com/v", 720, &NullSink, &policy())
                .await;

        let err = result.expect_err("permanent failure");
        assert!(matches!(err, MedialinkError::Extraction(_)));
        assert_eq!(extractor.calls(), 1, "no retry on permanent failures");
        assert_eq!(start.elapsed(), Duration::ZERO, "no sleeping either");
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt() {
        let extractor = ScriptedExtractor::new(0, true);

        let info =
            resolve_with_retry(&extractor, "https://example.com/v", 360, &NullSink, &policy())
                .await
                .expect("success");

        assert_eq!(info.title, "Demo");
        assert_eq!(extractor.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failure() {
        let extractor = ScriptedExtractor::new(2, true);
        let start = Instant::now();

        let info =
            resolve_with_retry(&extractor, "https://example.com/v", 720, &NullSink, &policy())
                .await
                .expect("third attempt succeeds");

        assert_eq!(info.title, "Demo");
        assert_eq!(extractor.calls(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }
}
