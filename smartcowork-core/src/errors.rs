//! Rejection taxonomy for untrusted sensor payloads
//!
//! The aggregator never throws: every variant here describes an input that
//! was dropped or normalized, surfaced to callers as an outcome value and
//! a log line rather than an error channel. Transport failures (connection
//! refused, non-success responses) live in the connectors crate; only
//! payload-shape problems are modeled here.

use thiserror::Error;

/// Why a single raw reading was not admitted into the window state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// The reading's type string is outside the closed metric set.
    #[error("unknown metric {metric:?}")]
    UnknownMetric {
        /// The type string as received (empty when the field was absent).
        metric: String,
    },

    /// A push frame was not a JSON object of the expected shape.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
}
