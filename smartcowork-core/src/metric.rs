//! Sensor metric enumeration
//!
//! The metric set is closed: a reading whose type string does not resolve
//! to one of these six categories is dropped at ingestion, not stored.
//! Resolution is case-insensitive because the upstream gateway has been
//! observed emitting both `"CO2"` and `"co2"` for the same sensor class.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Sensor categories tracked by the aggregator.
///
/// Maps one-to-one onto the chart panels and current-value tiles of the
/// dashboard surface. Discriminants double as indices into the fixed
/// per-metric state arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Metric {
    Temperature = 0,
    Humidity = 1,
    Occupancy = 2,
    Co2 = 3,
    Light = 4,
    Motion = 5,
}

/// Number of tracked metrics.
pub const METRIC_COUNT: usize = 6;

impl Metric {
    /// All metrics, in index order.
    pub const ALL: [Metric; METRIC_COUNT] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::Occupancy,
        Metric::Co2,
        Metric::Light,
        Metric::Motion,
    ];

    /// Canonical lowercase key, as used on the wire.
    pub const fn name(&self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::Occupancy => "occupancy",
            Metric::Co2 => "co2",
            Metric::Light => "light",
            Metric::Motion => "motion",
        }
    }

    /// Human-readable label for display surfaces.
    pub const fn label(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::Occupancy => "Occupancy",
            Metric::Co2 => "CO2 Level",
            Metric::Light => "Light Level",
            Metric::Motion => "Motion",
        }
    }

    /// Expected unit of measurement, used when a reading omits its own.
    pub const fn default_unit(&self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Humidity => "%",
            Metric::Occupancy => "people",
            Metric::Co2 => "ppm",
            Metric::Light => "lux",
            Metric::Motion => "",
        }
    }

    /// Resolve a wire string to a metric, case-insensitively.
    ///
    /// Returns `None` for anything outside the closed set; callers drop
    /// such readings rather than storing them.
    pub fn parse(s: &str) -> Option<Metric> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
    }

    /// Index into the fixed per-metric state arrays.
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
