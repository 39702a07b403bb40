//! Sensor window aggregator for SmartCowork
//!
//! Maintains per-metric rolling telemetry state for a coworking space:
//! a bounded, time-ordered series of recent readings for the trend charts
//! and the single latest reading for the current-value tiles, fed by a
//! periodic bulk fetch and a live push stream.
//!
//! Key constraints:
//! - Total ingestion: malformed input is normalized or dropped, never thrown
//! - Bounded state: every series is capped at a fixed window
//! - No I/O here; transports live in `smartcowork-connectors`
//!
//! ```
//! use smartcowork_core::{Metric, RawReading, SensorAggregator};
//!
//! let mut aggregator = SensorAggregator::new();
//!
//! let batch: Vec<RawReading> = serde_json::from_str(
//!     r#"[{"sensorType": "temperature", "value": "21.5", "unit": "°C"}]"#,
//! ).unwrap();
//!
//! aggregator.ingest_batch(&batch);
//! assert_eq!(aggregator.latest(Metric::Temperature).unwrap().value, 21.5);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregator;
pub mod errors;
pub mod metric;
pub mod reading;
pub mod time;
pub mod window;

// Public API
pub use aggregator::{
    BatchSummary, IngestOutcome, IngestStats, SensorAggregator, UNKNOWN_SPACE_LABEL,
};
pub use errors::RejectReason;
pub use metric::{Metric, METRIC_COUNT};
pub use reading::{decode_frame, RawReading, Reading, SpaceRef};
pub use time::{Clock, FixedClock, SystemClock};
pub use window::{Series, SeriesWindow, SERIES_WINDOW};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
