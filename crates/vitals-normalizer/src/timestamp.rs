//! Timestamp parsing, strict precedence:
//! 1. RFC 3339 (optional `Z`; naive strings are treated as UTC).
//! 2. Numeric string or number as Unix seconds (`>= 946_684_800`) or millis.
//! 3. Fall back to current UTC time, with a warning.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// 2000-01-01T00:00:00Z — the cutoff between seconds-since-epoch and
/// millis-since-epoch interpretations.
const YEAR_2000_UNIX_SECONDS: f64 = 946_684_800.0;

pub struct ParsedTimestamp {
    pub rfc3339: String,
    /// `true` when parsing failed and the current time was substituted.
    pub substituted: bool,
}

pub fn parse(raw: &serde_json::Value) -> ParsedTimestamp {
    if let Some(s) = raw.as_str() {
        if let Some(parsed) = parse_rfc3339(s).or_else(|| parse_naive(s)).or_else(|| parse_numeric_str(s)) {
            return ParsedTimestamp { rfc3339: parsed, substituted: false };
        }
    } else if let Some(n) = raw.as_f64() {
        return ParsedTimestamp { rfc3339: from_unix(n), substituted: false };
    }

    ParsedTimestamp { rfc3339: now_rfc3339(), substituted: true }
}

fn parse_rfc3339(s: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .map(|dt| to_rfc3339(dt))
}

fn parse_naive(s: &str) -> Option<String> {
    const FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| to_rfc3339(Utc.from_utc_datetime(&naive)))
}

fn parse_numeric_str(s: &str) -> Option<String> {
    s.trim().parse::<f64>().ok().map(from_unix)
}

fn from_unix(mut ts: f64) -> String {
    if ts.abs() < YEAR_2000_UNIX_SECONDS {
        ts /= 1000.0;
    }
    let secs = ts.trunc() as i64;
    let nanos = (ts.fract() * 1e9).round() as u32;
    let dt = Utc.timestamp_opt(secs, nanos).single().unwrap_or_else(Utc::now);
    to_rfc3339(dt)
}

fn now_rfc3339() -> String {
    to_rfc3339(Utc::now())
}

fn to_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
