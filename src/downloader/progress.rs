//! Progress reporting for extraction and payload fetches

use std::sync::Mutex;
use std::time::Duration;

/// A single structured progress notification.
///
/// Values are raw numbers; the presentation layer owns formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Percent complete, 0.0 to 100.0
    pub percent: f64,
    /// Transfer speed in bytes per second
    pub speed: f64,
    /// Estimated time remaining, when computable
    pub eta: Option<Duration>,
}

impl ProgressUpdate {
    /// Snapshot progress from observed byte counts and elapsed wall time.
    pub fn from_bytes(downloaded: u64, total: Option<u64>, elapsed: Duration) -> Self {
        let secs = elapsed.as_secs_f64();
        let speed = if secs > 0.0 { downloaded as f64 / secs } else { 0.0 };

        let percent = match total {
            Some(total) if total > 0 => (downloaded as f64 / total as f64) * 100.0,
            _ => 0.0,
        };

        let eta = match total {
            Some(total) if speed > 0.0 && downloaded < total => {
                Some(Duration::from_secs_f64((total - downloaded) as f64 / speed))
            }
            Some(total) if downloaded >= total => Some(Duration::from_secs(0)),
            _ => None,
        };

        Self { percent, speed, eta }
    }
}

/// Caller-supplied listener for progress notifications.
///
/// Adapters push updates here as side effects; nothing about progress travels
/// in return values.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, update: ProgressUpdate);
}

/// Sink that discards every update.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_progress(&self, _update: ProgressUpdate) {}
}

/// Sink that buffers updates for later rendering.
#[derive(Default)]
pub struct CollectingSink {
    updates: Mutex<Vec<ProgressUpdate>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the collected updates in arrival order.
    pub fn take(&self) -> Vec<ProgressUpdate> {
        std::mem::take(&mut *self.updates.lock().expect("progress sink poisoned"))
    }
}

impl ProgressSink for CollectingSink {
    fn on_progress(&self, update: ProgressUpdate) {
        self.updates.lock().expect("progress sink poisoned").push(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_midway() {
        let update = ProgressUpdate::from_bytes(500, Some(1000), Duration::from_secs(5));
        assert_eq!(update.percent, 50.0);
        assert_eq!(update.speed, 100.0);
        assert_eq!(update.eta, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_from_bytes_unknown_total() {
        let update = ProgressUpdate::from_bytes(500, None, Duration::from_secs(5));
        assert_eq!(update.percent, 0.0);
        assert_eq!(update.speed, 100.0);
        assert_eq!(update.eta, None);
    }

    #[test]
    fn test_from_bytes_complete() {
        let update = ProgressUpdate::from_bytes(1000, Some(1000), Duration::from_secs(10));
        assert_eq!(update.percent, 100.0);
        assert_eq!(update.eta, Some(Duration::from_secs(0)));
    }

    #[test]
    fn test_from_bytes_zero_elapsed() {
        let update = ProgressUpdate::from_bytes(100, Some(1000), Duration::ZERO);
        assert_eq!(update.speed, 0.0);
        assert_eq!(update.eta, None);
    }

    #[test]
    fn test_collecting_sink_preserves_order() {
        let sink = CollectingSink::new();
        sink.on_progress(ProgressUpdate::from_bytes(100, Some(1000), Duration::from_secs(1)));
        sink.on_progress(ProgressUpdate::from_bytes(200, Some(1000), Duration::from_secs(2)));

        let updates = sink.take();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].percent, 10.0);
        assert_eq!(updates[1].percent, 20.0);
        assert!(sink.take().is_empty());
    }
}
