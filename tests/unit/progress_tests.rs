//! Unit tests for progress throttling

#[cfg(test)]
mod tests {
    use droidex::services::progress::{ProgressCounters, ProgressThrottler};
    use std::time::{Duration, Instant};

    fn counters(processed: usize) -> ProgressCounters {
        ProgressCounters {
            processed,
            total: 10,
            downloaded: processed,
            failed: 0,
        }
    }

    #[test]
    fn test_first_call_only_arms() {
        let mut throttler = ProgressThrottler::with_interval(Duration::from_secs(1));
        assert!(throttler.consider(Instant::now(), counters(1)).is_none());
    }

    #[test]
    fn test_emits_after_interval() {
        let mut throttler = ProgressThrottler::with_interval(Duration::from_secs(1));
        let start = Instant::now();
        assert!(throttler.consider(start, counters(1)).is_none());
        assert!(throttler
            .consider(start + Duration::from_millis(500), counters(2))
            .is_none());

        let snapshot = throttler
            .consider(start + Duration::from_millis(1500), counters(3))
            .unwrap();
        assert_eq!(snapshot.processed, 3);
        assert_eq!(snapshot.total, 10);
        assert_eq!(snapshot.downloaded, 3);
    }

    #[test]
    fn test_finish_emits_once() {
        let mut throttler = ProgressThrottler::with_interval(Duration::from_secs(1));
        let start = Instant::now();
        throttler.consider(start, counters(1));

        let last = throttler
            .finish(start + Duration::from_millis(10), counters(10))
            .unwrap();
        assert_eq!(last.processed, 10);
        assert!(throttler
            .finish(start + Duration::from_millis(20), counters(10))
            .is_none());
    }

    #[test]
    fn test_finish_without_activity() {
        let mut throttler = ProgressThrottler::new();
        let snapshot = throttler.finish(Instant::now(), counters(0)).unwrap();
        assert_eq!(snapshot.processed, 0);
    }

    #[test]
    fn test_interval_has_floor() {
        let mut throttler = ProgressThrottler::with_interval(Duration::from_millis(1));
        let start = Instant::now();
        throttler.consider(start, counters(1));
        assert!(throttler
            .consider(start + Duration::from_millis(50), counters(2))
            .is_none());
        assert!(throttler
            .consider(start + Duration::from_millis(150), counters(3))
            .is_some());
    }
}
