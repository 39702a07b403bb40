//! Bounded rolling window of time-ordered readings
//!
//! ## Overview
//!
//! Each metric keeps a sliding window of its most recent readings for the
//! trend charts. The window is bounded (20 entries by default) and ordered
//! by observation time ascending, so the rendering layer can hand it to a
//! chart without further processing.
//!
//! ## Two insertion paths
//!
//! The window mirrors the two input sources and their reconciliation
//! policy:
//!
//! - [`SeriesWindow::merge`] — the batch path. A polled snapshot may
//!   interleave out of timestamp order with what is already held, so the
//!   union is re-sorted by `observed_at` before truncating to the newest
//!   N entries (oldest dropped first).
//! - [`SeriesWindow::push`] — the push path. A streamed reading is
//!   trusted as already-latest and appended without re-sorting, evicting
//!   the oldest entry when full. A push carrying a stale embedded
//!   timestamp therefore lands at the tail until the next batch merge
//!   re-sorts the window; this asymmetry is intentional policy, not an
//!   oversight.
//!
//! Equal timestamps keep their insertion order across a merge (the sort
//! is stable), so a duplicated reading sorts next to its original.

use crate::reading::Reading;

/// Window size for per-metric series, matching the chart surface.
pub const SERIES_WINDOW: usize = 20;

/// Rolling history of one metric, capped at N readings.
///
/// ## Invariants
///
/// - `len() <= N` after every mutation.
/// - Entries are ordered ascending by `observed_at` after every
///   [`merge`](Self::merge); [`push`](Self::push) preserves order only
///   when the pushed reading is in fact the newest.
#[derive(Debug, Clone, Default)]
pub struct SeriesWindow<const N: usize> {
    entries: Vec<Reading>,
}

/// The window type used throughout the aggregator.
pub type Series = SeriesWindow<SERIES_WINDOW>;

impl<const N: usize> SeriesWindow<N> {
    /// Creates an empty window.
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Append a single reading, evicting the oldest entry when full.
    ///
    /// No re-sort happens here; see the module docs for the policy.
    pub fn push(&mut self, reading: Reading) {
        if self.entries.len() == N {
            self.entries.remove(0);
        }
        self.entries.push(reading);
    }

    /// Merge a batch of readings: append, re-sort by `observed_at`
    /// ascending, truncate to the newest N.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = Reading>) {
        self.entries.extend(incoming);
        self.entries
            .sort_by(|a, b| a.observed_at.cmp(&b.observed_at));
        if self.entries.len() > N {
            let excess = self.entries.len() - N;
            self.entries.drain(..excess);
        }
    }

    /// Number of held readings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the window holds no readings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the window is at capacity.
    pub fn is_full(&self) -> bool {
        self.entries.len() == N
    }

    /// Maximum number of readings held.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Oldest reading, if any.
    pub fn first(&self) -> Option<&Reading> {
        self.entries.first()
    }

    /// Newest reading, if any.
    pub fn last(&self) -> Option<&Reading> {
        self.entries.last()
    }

    /// Readings from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.entries.iter()
    }

    /// The window contents as a slice, oldest first.
    pub fn as_slice(&self) -> &[Reading] {
        &self.entries
    }

    /// Drop all readings.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
