//! Environment-driven configuration for every stage of the vitals pipeline.
//!
//! Each stage reads only the sub-struct it needs; `Settings::from_env()`
//! loads all of them at once for `vitals-service`'s single binary.

#![warn(missing_docs)]

use std::env;
use std::time::Duration;

/// Bus connection and topic naming.
#[derive(Debug, Clone)]
pub struct BusSettings {
    pub brokers: String,
    pub topic_raw: String,
    pub topic_normalized: String,
    pub topic_enriched: String,
    pub topic_scored: String,
    pub topic_alerts: String,
    pub consumer_group: String,
    pub client_id: String,
}

impl Default for BusSettings {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".to_string(),
            topic_raw: "telemetry.raw".to_string(),
            topic_normalized: "telemetry.normalized".to_string(),
            topic_enriched: "telemetry.enriched".to_string(),
            topic_scored: "telemetry.scored".to_string(),
            topic_alerts: "alerts.raised".to_string(),
            consumer_group: "vitals-pipeline".to_string(),
            client_id: "vitals-pipeline-client".to_string(),
        }
    }
}

impl BusSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            brokers: env_or("KAFKA_BROKERS", defaults.brokers),
            topic_raw: env_or("TOPIC_RAW", defaults.topic_raw),
            topic_normalized: env_or("TOPIC_NORMALIZED", defaults.topic_normalized),
            topic_enriched: env_or("TOPIC_ENRICHED", defaults.topic_enriched),
            topic_scored: env_or("TOPIC_SCORED", defaults.topic_scored),
            topic_alerts: env_or("TOPIC_ALERTS", defaults.topic_alerts),
            consumer_group: env_or("KAFKA_CONSUMER_GROUP", defaults.consumer_group),
            client_id: env_or("KAFKA_CLIENT_ID", defaults.client_id),
        }
    }
}

/// Aggregate KV store connection (Redis-shaped).
#[derive(Debug, Clone)]
pub struct AggregateStoreSettings {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: u8,
}

impl Default for AggregateStoreSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            password: None,
            db: 0,
        }
    }
}

impl AggregateStoreSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_or("REDIS_HOST", defaults.host),
            port: env_parsed("REDIS_PORT", defaults.port),
            password: env::var("REDIS_PASSWORD").ok(),
            db: env_parsed("REDIS_DB", defaults.db),
        }
    }

    pub fn connection_url(&self) -> String {
        match &self.password {
            Some(password) => format!(
                "redis://:{password}@{host}:{port}/{db}",
                password = password,
                host = self.host,
                port = self.port,
                db = self.db
            ),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }
}

/// Scorer RPC endpoint and per-call deadline.
#[derive(Debug, Clone)]
pub struct ScorerSettings {
    pub url: String,
    pub timeout_seconds: u64,
}

impl Default for ScorerSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:50051".to_string(),
            timeout_seconds: 5,
        }
    }
}

impl ScorerSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env_or("SCORER_URL", defaults.url),
            timeout_seconds: env_parsed("SCORER_TIMEOUT_SECONDS", defaults.timeout_seconds),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Baseline store sizing.
#[derive(Debug, Clone, Copy)]
pub struct BaselineSettings {
    pub window_size: usize,
    pub min_samples: usize,
}

impl Default for BaselineSettings {
    fn default() -> Self {
        Self {
            window_size: 100,
            min_samples: 10,
        }
    }
}

impl BaselineSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            window_size: env_parsed("BASELINE_WINDOW_SIZE", defaults.window_size),
            min_samples: env_parsed("MIN_BASELINE_SAMPLES", defaults.min_samples),
        }
    }
}

/// Threshold rule configuration.
#[derive(Debug, Clone, Copy)]
pub struct RuleThresholds {
    pub hr_max: f64,
    pub hr_very_high: f64,
    pub spo2_min: f64,
    pub spo2_low: f64,
    pub temp_max_f: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            hr_max: 100.0,
            hr_very_high: 120.0,
            spo2_min: 95.0,
            spo2_low: 90.0,
            temp_max_f: 100.4,
        }
    }
}

impl RuleThresholds {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            hr_max: env_parsed("HR_MAX", defaults.hr_max),
            hr_very_high: env_parsed("HR_VERY_HIGH", defaults.hr_very_high),
            spo2_min: env_parsed("SPO2_MIN", defaults.spo2_min),
            spo2_low: env_parsed("SPO2_LOW", defaults.spo2_low),
            temp_max_f: env_parsed("TEMP_MAX", defaults.temp_max_f),
        }
    }
}

/// Aggregator window sizes.
#[derive(Debug, Clone, Copy)]
pub struct AggregatorSettings {
    pub rolling_window_15m_seconds: i64,
    pub rolling_window_1h_seconds: i64,
    pub alert_window_seconds: i64,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            rolling_window_15m_seconds: 900,
            rolling_window_1h_seconds: 3600,
            alert_window_seconds: 60,
        }
    }
}

impl AggregatorSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            rolling_window_15m_seconds: env_parsed(
                "ROLLING_WINDOW_15M_SECONDS",
                defaults.rolling_window_15m_seconds,
            ),
            rolling_window_1h_seconds: env_parsed(
                "ROLLING_WINDOW_1H_SECONDS",
                defaults.rolling_window_1h_seconds,
            ),
            alert_window_seconds: env_parsed(
                "ALERT_WINDOW_SECONDS",
                defaults.alert_window_seconds,
            ),
        }
    }
}

/// HTTP bind address for the query surface.
#[derive(Debug, Clone)]
pub struct QuerySettings {
    pub bind_addr: String,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

impl QuerySettings {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_or("QUERY_BIND_ADDR", Self::default().bind_addr),
        }
    }
}

/// Everything a `vitals-service` process needs at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub service_name: String,
    pub bus: BusSettings,
    pub aggregate_store: AggregateStoreSettings,
    pub scorer: ScorerSettings,
    pub baseline: BaselineSettings,
    pub rules: RuleThresholds,
    pub aggregator: AggregatorSettings,
    pub query: QuerySettings,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            service_name: env_or("SERVICE_NAME", "vitals-pipeline".to_string()),
            bus: BusSettings::from_env(),
            aggregate_store: AggregateStoreSettings::from_env(),
            scorer: ScorerSettings::from_env(),
            baseline: BaselineSettings::from_env(),
            rules: RuleThresholds::from_env(),
            aggregator: AggregatorSettings::from_env(),
            query: QuerySettings::from_env(),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_thresholds_default_matches_spec() {
        let t = RuleThresholds::default();
        assert_eq!(t.hr_max, 100.0);
        assert_eq!(t.hr_very_high, 120.0);
        assert_eq!(t.spo2_min, 95.0);
        assert_eq!(t.spo2_low, 90.0);
        assert_eq!(t.temp_max_f, 100.4);
    }

    #[test]
    fn baseline_defaults_match_spec() {
        let b = BaselineSettings::default();
        assert_eq!(b.window_size, 100);
        assert_eq!(b.min_samples, 10);
    }

    #[test]
    fn aggregator_window_defaults_match_spec() {
        let a = AggregatorSettings::default();
        assert_eq!(a.rolling_window_15m_seconds, 900);
        assert_eq!(a.rolling_window_1h_seconds, 3600);
        assert_eq!(a.alert_window_seconds, 60);
    }

    #[test]
    fn connection_url_includes_password_when_present() {
        let mut settings = AggregateStoreSettings::default();
        settings.password = Some("secret".to_string());
        assert!(settings.connection_url().contains(":secret@"));
    }
}
