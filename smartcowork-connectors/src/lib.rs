//! Transport Collaborators for the SmartCowork Telemetry Core
//!
//! ## Overview
//!
//! The aggregator in `smartcowork-core` only processes payloads it is
//! handed; this crate owns the two inbound channels that hand them over,
//! plus the driver that runs both against one shared aggregator:
//!
//! ```text
//! GET /sensors/space/{id} ──► SpaceReadingsClient ──┐
//!                                                   ├──► SensorFeed ──► SensorAggregator
//! ws://…/ws/sensor-data ────► SensorSocket ─────────┘
//! ```
//!
//! ## Channel characteristics
//!
//! ### HTTP batch source
//!
//! A snapshot of recent readings for one space, fetched once at startup
//! and then on a fixed poll interval. Transient failures (transport
//! errors, 5xx, 429) retry with exponential backoff inside one fetch;
//! a failed fetch is reported and the next tick tries again, so the
//! aggregator keeps serving last-known-good state.
//!
//! ### WebSocket push source
//!
//! A persistent connection delivering one reading per text frame.
//! Control frames are handled transparently; payload problems inside a
//! frame are the aggregator's business (it absorbs them), while
//! connection-level failures surface here as typed errors.
//!
//! ## Error ownership
//!
//! Transport failures never enter the aggregator. They are surfaced to
//! the feed owner as [`SourceError`] values and log lines; the state maps
//! are only ever touched with successfully received payloads.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::{Arc, Mutex};
//! use smartcowork_core::SensorAggregator;
//! use smartcowork_connectors::{
//!     feed::{FeedConfig, SensorFeed},
//!     http::{HttpConfig, SpaceReadingsClient},
//!     ws::SensorSocket,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let aggregator = Arc::new(Mutex::new(SensorAggregator::new()));
//!
//! let client = SpaceReadingsClient::new(HttpConfig::new("http://localhost:8081"), 1)?;
//! let socket = SensorSocket::connect("ws://localhost:8081/ws/sensor-data").await?;
//!
//! let handle = SensorFeed::spawn(
//!     aggregator.clone(),
//!     client,
//!     socket,
//!     FeedConfig::default(),
//! );
//!
//! // ... read aggregator state from the rendering layer ...
//!
//! handle.shutdown().await; // stops the timer, closes the stream task
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod feed;
pub mod http;
pub mod ws;

use async_trait::async_trait;
use smartcowork_core::RawReading;
use thiserror::Error;

// Re-export the common entry points
pub use feed::{FeedConfig, FeedHandle, SensorFeed};
pub use http::{HttpConfig, HttpError, SpaceReadingsClient};
pub use ws::{SensorSocket, SocketError};

/// Failures of either inbound channel, as seen by the feed driver.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The batch endpoint failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The push connection failed.
    #[error(transparent)]
    Socket(#[from] SocketError),
}

/// A source of polled reading snapshots.
///
/// Implemented by [`SpaceReadingsClient`]; the feed driver is generic
/// over this seam so its loop can be exercised with scripted sources.
#[async_trait]
pub trait BatchSource: Send {
    /// Fetch the next snapshot of readings.
    async fn next_batch(&mut self) -> Result<Vec<RawReading>, SourceError>;
}

/// A source of pushed text frames.
///
/// Implemented by [`SensorSocket`]. `Ok(None)` signals a clean end of
/// stream; the feed's stream task exits on it.
#[async_trait]
pub trait FrameSource: Send {
    /// Await the next text frame.
    async fn next_frame(&mut self) -> Result<Option<String>, SourceError>;
}
