//! Progress reporting primitives for long-running downloads.

use crate::models::ProgressSnapshot;
use std::sync::Arc;
use std::time::{Duration, Instant};

const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Callback receiving progress snapshots.
pub type ProgressNotifier = Arc<dyn Fn(&ProgressSnapshot) + Send + Sync>;

/// Running counters of a batch operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressCounters {
    pub processed: usize,
    pub total: usize,
    pub downloaded: usize,
    pub failed: usize,
}

/// Time-based throttler governing progress event emission.
#[derive(Debug)]
pub struct ProgressThrottler {
    interval: Duration,
    started: Instant,
    last_emit: Option<Instant>,
    last_processed: usize,
}

impl Default for ProgressThrottler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressThrottler {
    /// Construct a throttler using the default interval of one second.
    #[must_use]
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(1))
    }

    /// Construct a throttler with the supplied minimum interval.
    #[must_use]
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            started: Instant::now(),
            last_emit: None,
            last_processed: 0,
        }
    }

    /// Consider emitting a snapshot for the current counters.
    ///
    /// The first call only arms the timer.
    pub fn consider(&mut self, now: Instant, counters: ProgressCounters) -> Option<ProgressSnapshot> {
        let Some(last_emit) = self.last_emit else {
            self.last_emit = Some(now);
            return None;
        };

        if now.saturating_duration_since(last_emit) < self.interval {
            return None;
        }

        self.last_emit = Some(now);
        self.last_processed = counters.processed;
        Some(self.snapshot(now, counters))
    }

    /// Emit a final snapshot unless the last one already covered these counters.
    pub fn finish(&mut self, now: Instant, counters: ProgressCounters) -> Option<ProgressSnapshot> {
        if self.last_emit.is_some() && self.last_processed == counters.processed && counters.processed > 0 {
            return None;
        }

        self.last_emit = Some(now);
        self.last_processed = counters.processed;
        Some(self.snapshot(now, counters))
    }

    fn snapshot(&self, now: Instant, counters: ProgressCounters) -> ProgressSnapshot {
        let millis = now.saturating_duration_since(self.started).as_millis();
        ProgressSnapshot {
            elapsed_ms: u64::try_from(millis).unwrap_or(u64::MAX),
            processed: counters.processed,
            total: counters.total,
            downloaded: counters.downloaded,
            failed: counters.failed,
        }
    }
}
