use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use vitals_errors::ScoringError;

use crate::{BaselineStats, BaselineStore};

const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
/// Floor substituted for a zero sample stddev so scoring never divides by
/// zero.
const STDDEV_FLOOR: f64 = 0.1;

struct Window {
    samples: VecDeque<f64>,
    last_touched: Instant,
}

impl Window {
    fn new() -> Self {
        Self {
            samples: VecDeque::new(),
            last_touched: Instant::now(),
        }
    }
}

/// In-memory reference implementation, bounded per key and swept for TTL.
pub struct InMemoryBaselineStore {
    windows: Mutex<HashMap<(String, String), Window>>,
    window_size: usize,
    min_samples: usize,
    ttl: Duration,
}

impl InMemoryBaselineStore {
    pub fn new(window_size: usize, min_samples: usize) -> Arc<Self> {
        Arc::new(Self {
            windows: Mutex::new(HashMap::new()),
            window_size,
            min_samples,
            ttl: DEFAULT_TTL,
        })
    }

    #[cfg(test)]
    fn with_ttl(window_size: usize, min_samples: usize, ttl: Duration) -> Arc<Self> {
        Arc::new(Self {
            windows: Mutex::new(HashMap::new()),
            window_size,
            min_samples,
            ttl,
        })
    }

    /// Spawn a background task that evicts windows idle longer than the
    /// configured TTL. Returns the task's [`tokio::task::JoinHandle`] so
    /// callers can abort it on shutdown.
    pub fn spawn_ttl_sweeper(
        self: &Arc<Self>,
        sweep_interval: Duration,
    ) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sweep_interval);
            loop {
                ticker.tick().await;
                store.sweep_expired();
            }
        })
    }

    fn sweep_expired(&self) {
        let mut windows = self.windows.lock();
        let ttl = self.ttl;
        let before = windows.len();
        windows.retain(|_, window| window.last_touched.elapsed() < ttl);
        let evicted = before - windows.len();
        if evicted > 0 {
            tracing::info!(evicted, "swept expired baseline windows");
        }
    }

    fn key(patient_id: &str, vital: &str) -> (String, String) {
        (patient_id.to_string(), vital.to_string())
    }
}

#[async_trait]
impl BaselineStore for InMemoryBaselineStore {
    async fn append(&self, patient_id: &str, vital: &str, value: f64) -> Result<(), ScoringError> {
        let mut windows = self.windows.lock();
        let window = windows
            .entry(Self::key(patient_id, vital))
            .or_insert_with(Window::new);

        window.samples.push_back(value);
        while window.samples.len() > self.window_size {
            window.samples.pop_front();
        }
        window.last_touched = Instant::now();
        Ok(())
    }

    async fn stats(&self, patient_id: &str, vital: &str) -> Result<Option<BaselineStats>, ScoringError> {
        let windows = self.windows.lock();
        let Some(window) = windows.get(&Self::key(patient_id, vital)) else {
            return Ok(None);
        };

        let count = window.samples.len();
        if count < self.min_samples {
            return Ok(None);
        }

        let mean = window.samples.iter().sum::<f64>() / count as f64;
        let variance = window
            .samples
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / (count - 1) as f64;
        let stddev = if variance <= 0.0 { STDDEV_FLOOR } else { variance.sqrt() };

        Ok(Some(BaselineStats { mean, stddev, count }))
    }

    async fn count(&self, patient_id: &str, vital: &str) -> Result<usize, ScoringError> {
        let windows = self.windows.lock();
        Ok(windows
            .get(&Self::key(patient_id, vital))
            .map(|w| w.samples.len())
            .unwrap_or(0))
    }
}
