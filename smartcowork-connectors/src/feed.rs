//! Feed driver: one aggregator, two input channels, explicit teardown
//!
//! ## Concurrency model
//!
//! The aggregator itself is single-writer: every ingestion executes
//! synchronously and atomically. On a multi-threaded runtime that
//! guarantee comes from a mutex around the state — the lock is taken per
//! ingestion call and never held across an await, so neither channel can
//! observe a partially updated series.
//!
//! Two tasks feed it:
//!
//! 1. the **poll task** fetches a snapshot immediately, then on every
//!    tick of a fixed interval (30 s by default, matching the dashboard's
//!    refresh cadence). A failed fetch is logged and the next tick tries
//!    again — last-known-good state keeps serving.
//! 2. the **stream task** awaits push frames and hands each one to
//!    [`ingest_frame`](smartcowork_core::SensorAggregator::ingest_frame).
//!    It ends when the peer closes or the transport fails.
//!
//! ## Teardown
//!
//! [`FeedHandle::shutdown`] flips a watch signal and joins both tasks.
//! Each loop re-checks the signal after any await before touching shared
//! state, so no ingestion happens after disposal.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use smartcowork_core::SensorAggregator;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{BatchSource, FrameSource};

/// Aggregator shared between the feed tasks and the rendering layer.
pub type SharedAggregator = Arc<Mutex<SensorAggregator>>;

/// Feed driver configuration.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Interval between snapshot polls.
    pub poll_interval: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
        }
    }
}

/// Spawns and owns the two feed tasks.
pub struct SensorFeed;

impl SensorFeed {
    /// Start the poll and stream tasks against a shared aggregator.
    ///
    /// Must be called from within a tokio runtime. The returned handle
    /// is the only way to stop the feed; dropping it detaches the tasks.
    pub fn spawn<B, F>(
        aggregator: SharedAggregator,
        mut batches: B,
        mut frames: F,
        config: FeedConfig,
    ) -> FeedHandle
    where
        B: BatchSource + 'static,
        F: FrameSource + 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let poll_task = {
            let aggregator = aggregator.clone();
            let mut shutdown = shutdown_rx.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(config.poll_interval);
                loop {
                    tokio::select! {
                        _ = shutdown.changed() => break,
                        _ = interval.tick() => {
                            match batches.next_batch().await {
                                Ok(batch) => {
                                    // Shutdown may have landed mid-fetch.
                                    if *shutdown.borrow() {
                                        break;
                                    }
                                    let summary =
                                        aggregator.lock().unwrap().ingest_batch(&batch);
                                    log::debug!(
                                        "snapshot ingested: {} accepted, {} dropped",
                                        summary.accepted,
                                        summary.rejected,
                                    );
                                }
                                Err(e) => log::warn!("snapshot fetch failed: {e}"),
                            }
                        }
                    }
                }
                log::debug!("poll task stopped");
            })
        };

        let stream_task = {
            let mut shutdown = shutdown_rx;
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = shutdown.changed() => break,
                        frame = frames.next_frame() => match frame {
                            Ok(Some(text)) => {
                                if *shutdown.borrow() {
                                    break;
                                }
                                aggregator.lock().unwrap().ingest_frame(&text);
                            }
                            Ok(None) => {
                                log::info!("push stream ended");
                                break;
                            }
                            Err(e) => {
                                log::warn!("push stream failed: {e}");
                                break;
                            }
                        }
                    }
                }
                log::debug!("stream task stopped");
            })
        };

        FeedHandle {
            shutdown: shutdown_tx,
            poll_task,
            stream_task,
        }
    }
}

/// Handle over a running feed.
pub struct FeedHandle {
    shutdown: watch::Sender<bool>,
    poll_task: JoinHandle<()>,
    stream_task: JoinHandle<()>,
}

impl FeedHandle {
    /// Stop both tasks and wait for them to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.poll_task.await;
        let _ = self.stream_task.await;
    }

    /// Whether both tasks have already exited on their own.
    pub fn is_finished(&self) -> bool {
        self.poll_task.is_finished() && self.stream_task.is_finished()
    }
}
