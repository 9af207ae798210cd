//! In-memory reference backend: the default for tests and single-process
//! demos, mirroring `vitals-baseline::InMemoryBaselineStore`'s
//! `parking_lot::Mutex<HashMap<...>>` + background TTL sweeper shape.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use vitals_errors::AggregateError;
use vitals_schemas::normalized::VitalsMap;
use vitals_schemas::scored::Severity;

use crate::rolling::RollingWindow;
use crate::{
    alert_counter_class, AggregateStore, GlobalAlerts, LastVitalsSnapshot, PatientSummary,
    VitalRollingStats, ALERT_SEVERITY_CLASSES,
};

const ALERT_COUNTER_TTL: Duration = Duration::from_secs(120);

struct VitalWindows {
    window_15m: RollingWindow,
    window_1h: RollingWindow,
}

struct State {
    rolling: HashMap<(String, String), VitalWindows>,
    last_vitals: HashMap<String, LastVitalsSnapshot>,
    alert_counts: HashMap<(&'static str, i64), (u64, Instant)>,
}

pub struct InMemoryAggregateStore {
    state: Mutex<State>,
    window_15m_seconds: i64,
    window_1h_seconds: i64,
}

impl InMemoryAggregateStore {
    pub fn new(window_15m_seconds: i64, window_1h_seconds: i64) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                rolling: HashMap::new(),
                last_vitals: HashMap::new(),
                alert_counts: HashMap::new(),
            }),
            window_15m_seconds,
            window_1h_seconds,
        })
    }

    /// Spawn a periodic sweep of rolling-window keys idle past
    /// `window_seconds + 60` and alert counters idle past 120s.
    pub fn spawn_ttl_sweeper(self: &Arc<Self>, sweep_interval: Duration) -> JoinHandle<()> {
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
        let mut state = self.state.lock();
        let window_15m_ttl = Duration::from_secs((self.window_15m_seconds + 60) as u64);
        let window_1h_ttl = Duration::from_secs((self.window_1h_seconds + 60) as u64);
        state.rolling.retain(|_, windows| {
            windows.window_15m.last_touched.elapsed() < window_15m_ttl
                || windows.window_1h.last_touched.elapsed() < window_1h_ttl
        });
        state
            .alert_counts
            .retain(|_, (_, touched)| touched.elapsed() < ALERT_COUNTER_TTL);
    }
}

#[async_trait]
impl AggregateStore for InMemoryAggregateStore {
    async fn record_scored(
        &self,
        patient_id: &str,
        vitals: &VitalsMap,
        event_timestamp: i64,
        updated_at: &str,
    ) -> Result<(), AggregateError> {
        let mut state = self.state.lock();

        for (vital, reading) in vitals.core_vitals() {
            let key = (patient_id.to_string(), vital.to_string());
            let windows = state.rolling.entry(key).or_insert_with(|| VitalWindows {
                window_15m: RollingWindow::new(self.window_15m_seconds),
                window_1h: RollingWindow::new(self.window_1h_seconds),
            });
            windows.window_15m.insert(reading.value, event_timestamp);
            windows.window_1h.insert(reading.value, event_timestamp);
        }

        state.last_vitals.insert(
            patient_id.to_string(),
            LastVitalsSnapshot { vitals: vitals.clone(), updated_at: updated_at.to_string() },
        );

        Ok(())
    }

    async fn record_alert(&self, severity: Severity, event_timestamp: i64) -> Result<(), AggregateError> {
        let class = alert_counter_class(severity);
        let minute_bucket = event_timestamp.div_euclid(60);
        let mut state = self.state.lock();
        let entry = state.alert_counts.entry((class, minute_bucket)).or_insert((0, Instant::now()));
        entry.0 += 1;
        entry.1 = Instant::now();
        Ok(())
    }

    async fn patient_summary(&self, patient_id: &str) -> Result<PatientSummary, AggregateError> {
        let state = self.state.lock();

        let last_vitals = state.last_vitals.get(patient_id).cloned();

        let mut rolling_averages = HashMap::new();
        for ((pid, vital), windows) in state.rolling.iter() {
            if pid != patient_id {
                continue;
            }
            rolling_averages.insert(
                vital.clone(),
                VitalRollingStats {
                    window_15m: windows.window_15m.stats(),
                    window_1h: windows.window_1h.stats(),
                },
            );
        }

        Ok(PatientSummary { last_vitals, rolling_averages })
    }

    async fn global_alerts(&self, now: i64) -> Result<GlobalAlerts, AggregateError> {
        let state = self.state.lock();
        let current_minute = now.div_euclid(60);
        let previous_minute = current_minute - 1;

        let mut alerts_per_minute = HashMap::new();
        for class in ALERT_SEVERITY_CLASSES {
            let count = state
                .alert_counts
                .get(&(class, current_minute))
                .map(|(count, _)| *count)
                .or_else(|| state.alert_counts.get(&(class, previous_minute)).map(|(count, _)| *count))
                .unwrap_or(0);
            alerts_per_minute.insert(class.to_string(), count);
        }

        Ok(GlobalAlerts {
            alerts_per_minute,
            timestamp: chrono::DateTime::from_timestamp(now, 0)
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_default(),
        })
    }
}
