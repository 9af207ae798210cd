//! Redis-backed [`AggregateStore`] for production use.
//!
//! Rolling windows are Redis sorted sets (score = event timestamp, member =
//! a JSON-encoded `(sample_id, value)` pair so repeated equal values don't
//! collide); eviction is `ZREMRANGEBYSCORE` run on every insert, matching
//! the in-memory backend's "evict relative to latest inserted timestamp"
//! semantics. `last_vitals` is a single string key holding the serialized
//! snapshot. Alert counters are plain `INCR` keys with an `EXPIRE`.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use vitals_errors::AggregateError;
use vitals_schemas::normalized::VitalsMap;
use vitals_schemas::scored::Severity;

use crate::{
    alert_counter_class, AggregateStore, GlobalAlerts, LastVitalsSnapshot, PatientSummary,
    RollingStats, VitalRollingStats, ALERT_SEVERITY_CLASSES,
};

const ALERT_COUNTER_TTL_SECONDS: i64 = 120;

pub struct RedisAggregateStore {
    connection: MultiplexedConnection,
    window_15m_seconds: i64,
    window_1h_seconds: i64,
}

#[derive(Serialize, Deserialize)]
struct SampleMember {
    value: f64,
    // Disambiguates equal `(value, timestamp)` pairs in the sorted set,
    // since Redis sorted-set members must be unique.
    nonce: u32,
}

impl RedisAggregateStore {
    pub async fn connect(
        connection_url: &str,
        window_15m_seconds: i64,
        window_1h_seconds: i64,
    ) -> Result<Self, AggregateError> {
        let client = redis::Client::open(connection_url).map_err(|e| AggregateError::ConnectFailed(e.to_string()))?;
        let connection = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| AggregateError::ConnectFailed(e.to_string()))?;
        Ok(Self { connection, window_15m_seconds, window_1h_seconds })
    }

    fn rolling_key(patient_id: &str, vital: &str, window_seconds: i64) -> String {
        format!("vitals:rolling:{patient_id}:{vital}:{window_seconds}")
    }

    fn last_vitals_key(patient_id: &str) -> String {
        format!("vitals:last_vitals:{patient_id}")
    }

    fn alert_counter_key(class: &str, minute_bucket: i64) -> String {
        format!("vitals:alerts:{class}:{minute_bucket}")
    }

    async fn insert_into_window(
        &self,
        key: &str,
        window_seconds: i64,
        value: f64,
        event_timestamp: i64,
    ) -> Result<(), AggregateError> {
        let mut connection = self.connection.clone();
        let member = serde_json::to_string(&SampleMember { value, nonce: (event_timestamp % u32::MAX as i64) as u32 })
            .map_err(|e| AggregateError::Io(e.to_string()))?;

        connection
            .zadd::<_, _, _, ()>(key, member, event_timestamp)
            .await
            .map_err(|e| AggregateError::Io(e.to_string()))?;

        let cutoff = event_timestamp - window_seconds;
        connection
            .zrembyscore::<_, _, _, ()>(key, "-inf", cutoff - 1)
            .await
            .map_err(|e| AggregateError::Io(e.to_string()))?;

        connection
            .expire::<_, ()>(key, window_seconds + 60)
            .await
            .map_err(|e| AggregateError::Io(e.to_string()))
    }

    async fn window_stats(&self, key: &str) -> Result<Option<RollingStats>, AggregateError> {
        let mut connection = self.connection.clone();
        let members: Vec<String> = connection
            .zrange(key, 0, -1)
            .await
            .map_err(|e| AggregateError::Io(e.to_string()))?;

        if members.is_empty() {
            return Ok(None);
        }

        let values: Vec<f64> = members
            .iter()
            .filter_map(|m| serde_json::from_str::<SampleMember>(m).ok())
            .map(|s| s.value)
            .collect();

        if values.is_empty() {
            return Ok(None);
        }

        let count = values.len();
        let sum: f64 = values.iter().sum();
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Ok(Some(RollingStats { count, average: sum / count as f64, min, max }))
    }
}

#[async_trait]
impl AggregateStore for RedisAggregateStore {
    async fn record_scored(
        &self,
        patient_id: &str,
        vitals: &VitalsMap,
        event_timestamp: i64,
        updated_at: &str,
    ) -> Result<(), AggregateError> {
        for (vital, reading) in vitals.core_vitals() {
            let key_15m = Self::rolling_key(patient_id, vital, self.window_15m_seconds);
            let key_1h = Self::rolling_key(patient_id, vital, self.window_1h_seconds);
            self.insert_into_window(&key_15m, self.window_15m_seconds, reading.value, event_timestamp)
                .await?;
            self.insert_into_window(&key_1h, self.window_1h_seconds, reading.value, event_timestamp)
                .await?;
        }

        let snapshot = LastVitalsSnapshot { vitals: vitals.clone(), updated_at: updated_at.to_string() };
        let encoded = serde_json::to_string(&snapshot).map_err(|e| AggregateError::Io(e.to_string()))?;
        let mut connection = self.connection.clone();
        connection
            .set::<_, _, ()>(Self::last_vitals_key(patient_id), encoded)
            .await
            .map_err(|e| AggregateError::Io(e.to_string()))
    }

    async fn record_alert(&self, severity: Severity, event_timestamp: i64) -> Result<(), AggregateError> {
        let class = alert_counter_class(severity);
        let minute_bucket = event_timestamp.div_euclid(60);
        let key = Self::alert_counter_key(class, minute_bucket);

        let mut connection = self.connection.clone();
        connection
            .incr::<_, _, ()>(&key, 1)
            .await
            .map_err(|e| AggregateError::Io(e.to_string()))?;
        connection
            .expire::<_, ()>(&key, ALERT_COUNTER_TTL_SECONDS)
            .await
            .map_err(|e| AggregateError::Io(e.to_string()))
    }

    async fn patient_summary(&self, patient_id: &str) -> Result<PatientSummary, AggregateError> {
        let mut connection = self.connection.clone();
        let raw: Option<String> = connection
            .get(Self::last_vitals_key(patient_id))
            .await
            .map_err(|e| AggregateError::Io(e.to_string()))?;
        let last_vitals = raw.and_then(|s| serde_json::from_str(&s).ok());

        let mut rolling_averages = std::collections::HashMap::new();
        for vital in ["heart_rate", "oxygen_saturation", "temperature"] {
            let key_15m = Self::rolling_key(patient_id, vital, self.window_15m_seconds);
            let key_1h = Self::rolling_key(patient_id, vital, self.window_1h_seconds);
            let window_15m = self.window_stats(&key_15m).await?;
            let window_1h = self.window_stats(&key_1h).await?;
            if window_15m.is_some() || window_1h.is_some() {
                rolling_averages.insert(vital.to_string(), VitalRollingStats { window_15m, window_1h });
            }
        }

        Ok(PatientSummary { last_vitals, rolling_averages })
    }

    async fn global_alerts(&self, now: i64) -> Result<GlobalAlerts, AggregateError> {
        let mut connection = self.connection.clone();
        let current_minute = now.div_euclid(60);
        let previous_minute = current_minute - 1;

        let mut alerts_per_minute = std::collections::HashMap::new();
        for class in ALERT_SEVERITY_CLASSES {
            let current: Option<u64> = connection
                .get(Self::alert_counter_key(class, current_minute))
                .await
                .map_err(|e| AggregateError::Io(e.to_string()))?;
            let count = match current {
                Some(count) => count,
                None => connection
                    .get(Self::alert_counter_key(class, previous_minute))
                    .await
                    .map_err(|e| AggregateError::Io(e.to_string()))?
                    .unwrap_or(0),
            };
            alerts_per_minute.insert(class.to_string(), count);
        }

        Ok(GlobalAlerts {
            alerts_per_minute,
            timestamp: chrono::DateTime::from_timestamp(now, 0).map(|dt| dt.to_rfc3339()).unwrap_or_default(),
        })
    }
}
