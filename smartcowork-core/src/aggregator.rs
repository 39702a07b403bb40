//! Sensor window aggregator
//!
//! ## Overview
//!
//! Maintains, per metric, a bounded time-ordered series of recent readings
//! plus the single latest reading, reconciling two asynchronous input
//! sources into one coherent view:
//!
//! ```text
//! HTTP snapshot ──► ingest_batch ──┐
//!                                  ├──► Series (sorted, capped at 20)
//! Push frame ─────► ingest_frame ──┘     Latest (per-metric tile value)
//!                    └─ ingest_one
//! ```
//!
//! ## Reconciliation policy
//!
//! The two paths are deliberately asymmetric:
//!
//! - **Batch** readings may arrive interleaved out of timestamp order, so
//!   each affected series is re-sorted and truncated after the merge, and
//!   Latest becomes the chronologically last surviving entry.
//! - **Push** readings are treated as "now": Latest is overwritten
//!   unconditionally — even when the frame's embedded timestamp is older
//!   than the current Latest — and the series is appended without a
//!   re-sort. The live feed wins on arrival order, not timestamp order.
//!
//! ## Failure semantics
//!
//! Every operation is total. Unknown metrics, garbage values, missing
//! timestamps, and malformed frames are normalized or dropped with a
//! diagnostic and a counter bump; nothing propagates. The aggregator
//! degrades to last-known-good state and leaves transport failures to the
//! connectors that own them.
//!
//! The aggregator is a plain owned value: callers on multi-threaded
//! runtimes wrap it in a mutex (or single-writer task) so each ingestion
//! executes atomically; no operation holds the state across an await.

use crate::errors::RejectReason;
use crate::metric::{Metric, METRIC_COUNT};
use crate::reading::{decode_frame, RawReading, Reading};
use crate::time::{Clock, SystemClock};
use crate::window::Series;

/// Label shown for the owning space until a batch carries a descriptor.
pub const UNKNOWN_SPACE_LABEL: &str = "unknown";

/// Counters over everything the aggregator has been handed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    /// Readings admitted into series/latest state.
    pub accepted: u64,
    /// Readings dropped for an unknown metric.
    pub rejected: u64,
    /// Push frames that failed to decode at all.
    pub malformed_frames: u64,
    /// Batch ingestions performed.
    pub batches: u64,
}

/// Per-call result of a batch ingestion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Readings admitted from this batch.
    pub accepted: usize,
    /// Readings dropped from this batch.
    pub rejected: usize,
}

/// Per-call result of a single-reading ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// The reading was admitted for this metric.
    Accepted(Metric),
    /// The reading was dropped; state is unchanged.
    Rejected(RejectReason),
}

impl IngestOutcome {
    /// Whether the reading made it into the state.
    pub fn is_accepted(&self) -> bool {
        matches!(self, IngestOutcome::Accepted(_))
    }
}

/// Rolling per-metric telemetry state for one space.
///
/// Generic over the [`Clock`] supplying "now" for timestamp defaulting;
/// production code uses [`SensorAggregator::new`] (system clock), tests
/// pin a [`FixedClock`](crate::time::FixedClock) via
/// [`SensorAggregator::with_clock`].
pub struct SensorAggregator<C: Clock = SystemClock> {
    series: [Series; METRIC_COUNT],
    latest: [Option<Reading>; METRIC_COUNT],
    space_label: String,
    stats: IngestStats,
    clock: C,
}

impl SensorAggregator<SystemClock> {
    /// Empty aggregator on the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for SensorAggregator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> SensorAggregator<C> {
    /// Empty aggregator on a caller-supplied clock.
    pub fn with_clock(clock: C) -> Self {
        Self {
            series: std::array::from_fn(|_| Series::new()),
            latest: std::array::from_fn(|_| None),
            space_label: UNKNOWN_SPACE_LABEL.to_string(),
            stats: IngestStats::default(),
            clock,
        }
    }

    /// Reconcile a polled snapshot into the existing state.
    ///
    /// Resolves each raw reading, appends the survivors to their metric's
    /// series, re-sorts and truncates each affected series, and advances
    /// Latest to the chronologically last surviving entry. Also projects
    /// the space display label from the first reading's descriptor
    /// (falling back to [`UNKNOWN_SPACE_LABEL`]). Total: malformed
    /// entries are dropped with a diagnostic, never an error.
    pub fn ingest_batch(&mut self, readings: &[RawReading]) -> BatchSummary {
        let now = self.clock.now();

        self.space_label = readings
            .first()
            .and_then(|r| r.space.as_ref())
            .and_then(|s| s.name.as_deref())
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| UNKNOWN_SPACE_LABEL.to_string());

        let mut grouped: [Vec<Reading>; METRIC_COUNT] = std::array::from_fn(|_| Vec::new());
        let mut summary = BatchSummary::default();

        for raw in readings {
            match Reading::resolve(raw, now) {
                Ok(reading) => {
                    grouped[reading.metric.index()].push(reading);
                    summary.accepted += 1;
                }
                Err(reason) => {
                    summary.rejected += 1;
                    log::warn!("dropping batch reading: {reason}");
                }
            }
        }

        for metric in Metric::ALL {
            let batch = std::mem::take(&mut grouped[metric.index()]);
            if batch.is_empty() {
                continue;
            }
            let series = &mut self.series[metric.index()];
            series.merge(batch);
            if let Some(last) = series.last() {
                self.latest[metric.index()] = Some(last.clone());
            }
        }

        self.stats.accepted += summary.accepted as u64;
        self.stats.rejected += summary.rejected as u64;
        self.stats.batches += 1;
        summary
    }

    /// Reconcile one pushed reading into the existing state.
    ///
    /// Latest is overwritten unconditionally — a push is treated as
    /// "now" regardless of its embedded timestamp — and the series gets
    /// an append-without-re-sort (see the module docs for why). An
    /// unknown metric leaves all state untouched.
    pub fn ingest_one(&mut self, raw: &RawReading) -> IngestOutcome {
        let now = self.clock.now();
        match Reading::resolve(raw, now) {
            Ok(reading) => {
                let metric = reading.metric;
                self.latest[metric.index()] = Some(reading.clone());
                self.series[metric.index()].push(reading);
                self.stats.accepted += 1;
                IngestOutcome::Accepted(metric)
            }
            Err(reason) => {
                self.stats.rejected += 1;
                log::warn!("dropping pushed reading: {reason}");
                IngestOutcome::Rejected(reason)
            }
        }
    }

    /// Decode one push frame of JSON text and ingest it.
    ///
    /// Malformed payloads are caught and counted, never propagated.
    pub fn ingest_frame(&mut self, text: &str) -> IngestOutcome {
        match decode_frame(text) {
            Ok(raw) => self.ingest_one(&raw),
            Err(reason) => {
                self.stats.malformed_frames += 1;
                log::warn!("ignoring push frame: {reason}");
                IngestOutcome::Rejected(reason)
            }
        }
    }

    /// Rolling series for one metric, oldest first.
    pub fn series(&self, metric: Metric) -> &Series {
        &self.series[metric.index()]
    }

    /// Most recently known reading for one metric.
    pub fn latest(&self, metric: Metric) -> Option<&Reading> {
        self.latest[metric.index()].as_ref()
    }

    /// Latest readings for all metrics, in [`Metric::ALL`] order.
    pub fn latest_all(&self) -> impl Iterator<Item = (Metric, Option<&Reading>)> {
        Metric::ALL
            .into_iter()
            .map(move |m| (m, self.latest[m.index()].as_ref()))
    }

    /// Display label of the owning space.
    pub fn space_label(&self) -> &str {
        &self.space_label
    }

    /// Running ingestion counters.
    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Mutable access to the clock, for tests that advance time.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
