//! Windowless aggregates computed from a sample set, and the bounded
//! rolling window itself: eviction is relative to the latest *inserted*
//! event timestamp, not wall-clock time (see DESIGN.md for the tradeoff
//! against a wall-clock-based alternative).

use std::collections::VecDeque;
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// `{count, average, min, max}` over whatever is currently in a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingStats {
    pub count: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

impl RollingStats {
    fn from_samples(samples: &VecDeque<(f64, i64)>) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let count = samples.len();
        let sum: f64 = samples.iter().map(|(value, _)| value).sum();
        let min = samples.iter().map(|(value, _)| *value).fold(f64::INFINITY, f64::min);
        let max = samples.iter().map(|(value, _)| *value).fold(f64::NEG_INFINITY, f64::max);
        Some(Self { count, average: sum / count as f64, min, max })
    }
}

/// One `(patient, vital, window_seconds)` rolling window.
pub struct RollingWindow {
    samples: VecDeque<(f64, i64)>,
    window_seconds: i64,
    pub(crate) last_touched: Instant,
}

impl RollingWindow {
    pub fn new(window_seconds: i64) -> Self {
        Self { samples: VecDeque::new(), window_seconds, last_touched: Instant::now() }
    }

    /// Insert `(value, event_timestamp)`, then evict every entry older than
    /// `window_seconds` relative to `event_timestamp`.
    pub fn insert(&mut self, value: f64, event_timestamp: i64) {
        self.samples.push_back((value, event_timestamp));
        let cutoff = event_timestamp - self.window_seconds;
        while let Some(&(_, ts)) = self.samples.front() {
            if ts < cutoff {
                self.samples.pop_front();
            } else {
                break;
            }
        }
        self.last_touched = Instant::now();
    }

    pub fn stats(&self) -> Option<RollingStats> {
        RollingStats::from_samples(&self.samples)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_is_none_for_an_empty_window() {
        let window = RollingWindow::new(900);
        assert!(window.stats().is_none());
    }

    #[test]
    fn insert_evicts_entries_older_than_window_relative_to_latest_insert() {
        let mut window = RollingWindow::new(900);
        window.insert(70.0, 0);
        window.insert(72.0, 500);
        window.insert(74.0, 960); // cutoff = 960 - 900 = 60; the t=0 sample is evicted
        let stats = window.stats().unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min, 72.0);
        assert_eq!(stats.max, 74.0);
    }

    #[test]
    fn aggregator_scenario_four_events_over_sixteen_minutes() {
        // HR [70, 72, 74, 76] at t=0, 300, 600, 960s.
        // 15m (900s) window evicts the oldest; 1h (3600s) keeps all four.
        let mut window_15m = RollingWindow::new(900);
        let mut window_1h = RollingWindow::new(3600);
        for (value, ts) in [(70.0, 0), (72.0, 300), (74.0, 600), (76.0, 960)] {
            window_15m.insert(value, ts);
            window_1h.insert(value, ts);
        }
        assert_eq!(window_15m.stats().unwrap().count, 3);
        assert_eq!(window_1h.stats().unwrap().count, 4);
    }

    #[test]
    fn average_reflects_only_surviving_samples() {
        let mut window = RollingWindow::new(10);
        window.insert(10.0, 0);
        window.insert(20.0, 5);
        window.insert(30.0, 11); // cutoff = 1; only the t=0 sample is evicted
        let stats = window.stats().unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.average, 25.0);
    }
}
