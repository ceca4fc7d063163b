use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics for assist operations.
///
/// Thread-safe atomic counters, owned by the application state.
#[derive(Default)]
pub struct AssistMetrics {
    /// Non-streaming parse calls
    pub parse_calls: AtomicU64,

    /// Non-streaming tag-suggestion calls
    pub tag_calls: AtomicU64,

    /// Completed streaming sessions
    pub stream_sessions: AtomicU64,

    /// Failed streaming sessions
    pub stream_failures: AtomicU64,

    /// Total streaming session time in microseconds
    pub total_stream_time_us: AtomicU64,
}

impl AssistMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_parse(&self) {
        self.parse_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_tags(&self) {
        self.tag_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed streaming session
    pub fn record_stream_session(&self, duration: Duration) {
        self.stream_sessions.fetch_add(1, Ordering::Relaxed);
        self.total_stream_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    /// Record a failed streaming session
    pub fn record_stream_failure(&self) {
        self.stream_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Average completed session time in microseconds
    pub fn avg_stream_time_us(&self) -> u64 {
        let total = self.total_stream_time_us.load(Ordering::Relaxed);
        let count = self.stream_sessions.load(Ordering::Relaxed);
        if count > 0 { total / count } else { 0 }
    }

    /// Completed sessions as a percentage of all sessions
    pub fn stream_success_rate(&self) -> f64 {
        let ok = self.stream_sessions.load(Ordering::Relaxed);
        let failed = self.stream_failures.load(Ordering::Relaxed);
        let total = ok + failed;
        if total > 0 {
            (ok as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Get snapshot of current metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            parse_calls: self.parse_calls.load(Ordering::Relaxed),
            tag_calls: self.tag_calls.load(Ordering::Relaxed),
            stream_sessions: self.stream_sessions.load(Ordering::Relaxed),
            stream_failures: self.stream_failures.load(Ordering::Relaxed),
            avg_stream_time_us: self.avg_stream_time_us(),
            stream_success_rate: self.stream_success_rate(),
        }
    }

    /// Reset all metrics (useful for testing)
    pub fn reset(&self) {
        self.parse_calls.store(0, Ordering::Relaxed);
        self.tag_calls.store(0, Ordering::Relaxed);
        self.stream_sessions.store(0, Ordering::Relaxed);
        self.stream_failures.store(0, Ordering::Relaxed);
        self.total_stream_time_us.store(0, Ordering::Relaxed);
    }
}

/// Immutable snapshot of metrics at a point in time
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub parse_calls: u64,
    pub tag_calls: u64,
    pub stream_sessions: u64,
    pub stream_failures: u64,
    pub avg_stream_time_us: u64,
    pub stream_success_rate: f64,
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Assist metrics: {} parses, {} tag calls, {} streams ({:.1}% success), avg {:.2}ms",
            self.parse_calls,
            self.tag_calls,
            self.stream_sessions + self.stream_failures,
            self.stream_success_rate,
            self.avg_stream_time_us as f64 / 1000.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sessions() {
        let metrics = AssistMetrics::new();

        metrics.record_stream_session(Duration::from_micros(100));
        metrics.record_stream_session(Duration::from_micros(300));

        assert_eq!(metrics.stream_sessions.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.avg_stream_time_us(), 200);
    }

    #[test]
    fn test_success_rate() {
        let metrics = AssistMetrics::new();

        metrics.record_stream_session(Duration::from_micros(50));
        metrics.record_stream_session(Duration::from_micros(50));
        metrics.record_stream_session(Duration::from_micros(50));
        metrics.record_stream_failure();

        assert_eq!(metrics.stream_success_rate(), 75.0);
    }

    #[test]
    fn test_snapshot_and_reset() {
        let metrics = AssistMetrics::new();

        metrics.record_parse();
        metrics.record_tags();
        metrics.record_stream_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.parse_calls, 1);
        assert_eq!(snapshot.tag_calls, 1);
        assert_eq!(snapshot.stream_failures, 1);

        metrics.reset();
        assert_eq!(metrics.snapshot().parse_calls, 0);
    }

    #[test]
    fn test_empty_metrics() {
        let metrics = AssistMetrics::new();
        assert_eq!(metrics.avg_stream_time_us(), 0);
        assert_eq!(metrics.stream_success_rate(), 0.0);
    }
}
