//! Wire payloads and the coercion rules that tame them
//!
//! Both input sources hand the aggregator ad hoc JSON defined by an
//! external gateway this crate does not own. [`RawReading`] captures that
//! shape without trusting it: `value` and `timestamp` stay as raw
//! [`serde_json::Value`]s until [`Reading::resolve`] applies the
//! numeric-safe and timestamp-safe rules.
//!
//! The rules are deliberately total:
//! - a value that is not a finite number (or a string parsing to one)
//!   coerces to `0.0` — `NaN` never enters the state;
//! - a timestamp that is missing or unparseable coerces to the clock's
//!   "now" at resolution time;
//! - only an unresolvable metric string rejects the whole reading.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::RejectReason;
use crate::metric::Metric;

/// Embedded descriptor of the space a reading belongs to.
///
/// Present on batch readings; push frames carry no such guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceRef {
    /// Backend identifier of the space.
    #[serde(default)]
    pub id: Option<i64>,
    /// Display name of the space.
    #[serde(default)]
    pub name: Option<String>,
}

/// One sensor observation as received from either source, untrusted.
///
/// Every field is optional or free-form; absence and garbage are handled
/// by [`Reading::resolve`], never by the deserializer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReading {
    /// Backend row identifier, when the batch endpoint includes one.
    #[serde(default)]
    pub id: Option<i64>,
    /// Sensor category string, matched case-insensitively.
    #[serde(default)]
    pub sensor_type: Option<String>,
    /// Measured value: number, numeric string, or garbage.
    #[serde(default)]
    pub value: Value,
    /// Unit of measurement, possibly absent.
    #[serde(default)]
    pub unit: Option<String>,
    /// Observation instant: RFC 3339 string, naive datetime string,
    /// epoch milliseconds, or absent.
    #[serde(default)]
    pub timestamp: Value,
    /// Gateway-side validity flag; informational only, not enforced here.
    #[serde(default)]
    pub is_valid: Option<bool>,
    /// Owning space descriptor, when present.
    #[serde(default)]
    pub space: Option<SpaceRef>,
}

/// A resolved, trusted sensor observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// Sensor category.
    pub metric: Metric,
    /// Finite measured value.
    pub value: f64,
    /// Display unit, empty when the source omitted it.
    pub unit: String,
    /// Canonical observation instant.
    pub observed_at: DateTime<Utc>,
}

impl Reading {
    /// Resolve an untrusted reading against the given "now".
    ///
    /// Only an unknown (or missing) metric string rejects; value and
    /// timestamp problems are absorbed by the coercion rules.
    pub fn resolve(raw: &RawReading, now: DateTime<Utc>) -> Result<Reading, RejectReason> {
        let key = raw.sensor_type.as_deref().unwrap_or("");
        let metric = Metric::parse(key).ok_or_else(|| RejectReason::UnknownMetric {
            metric: key.to_string(),
        })?;

        Ok(Reading {
            metric,
            value: coerce_value(&raw.value),
            unit: raw.unit.clone().unwrap_or_default(),
            observed_at: coerce_timestamp(&raw.timestamp, now),
        })
    }
}

/// Numeric-safe coercion: finite number or numeric string, else `0.0`.
pub fn coerce_value(raw: &Value) -> f64 {
    match raw {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Timestamp-safe coercion: canonical instant, else the supplied `now`.
///
/// Accepts RFC 3339 strings, timezone-less `YYYY-MM-DDTHH:MM:SS[.f]`
/// strings (interpreted as UTC, matching the gateway's serialization),
/// and epoch-millisecond numbers.
pub fn coerce_timestamp(raw: &Value, now: DateTime<Utc>) -> DateTime<Utc> {
    match raw {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return now;
            }
            if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
                return parsed.with_timezone(&Utc);
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return Utc.from_utc_datetime(&naive);
            }
            now
        }
        Value::Number(n) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .and_then(|ms| Utc.timestamp_millis_opt(ms as i64).single())
            .unwrap_or(now),
        _ => now,
    }
}

/// Decode one push frame of JSON text into a raw reading.
///
/// Rejects frames that are not JSON objects of roughly the expected
/// shape; field-level garbage still passes and is coerced later.
pub fn decode_frame(text: &str) -> Result<RawReading, RejectReason> {
    serde_json::from_str::<RawReading>(text)
        .map_err(|e| RejectReason::MalformedFrame(e.to_string()))
}
