//! Feed driver lifecycle tests
//!
//! Exercises the poll/stream loops and teardown against scripted sources
//! standing in for the HTTP endpoint and the push socket: snapshots and
//! frames flow into the shared aggregator, fetch errors keep the feed
//! alive, and shutdown stops all ingestion.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use smartcowork_core::{Metric, RawReading, SensorAggregator};
use smartcowork_connectors::{
    feed::{FeedConfig, SensorFeed, SharedAggregator},
    http::HttpError,
    BatchSource, FrameSource, SourceError,
};
use tokio::time::Instant;

fn raw(metric: &str, value: f64) -> RawReading {
    serde_json::from_value(json!({"sensorType": metric, "value": value})).unwrap()
}

fn shared_aggregator() -> SharedAggregator {
    Arc::new(Mutex::new(SensorAggregator::new()))
}

fn fast_config() -> FeedConfig {
    FeedConfig {
        poll_interval: Duration::from_millis(30),
    }
}

async fn wait_until(mut cond: impl FnMut() -> bool, what: &str) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Batch source replaying a script, then returning empty snapshots.
struct ScriptedBatches(VecDeque<Result<Vec<RawReading>, SourceError>>);

impl ScriptedBatches {
    fn new(script: Vec<Result<Vec<RawReading>, SourceError>>) -> Self {
        Self(script.into())
    }
}

#[async_trait]
impl BatchSource for ScriptedBatches {
    async fn next_batch(&mut self) -> Result<Vec<RawReading>, SourceError> {
        self.0.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Frame source replaying a script, then either closing or staying open.
struct ScriptedFrames {
    frames: VecDeque<String>,
    close_when_drained: bool,
}

impl ScriptedFrames {
    fn then_open(frames: &[&str]) -> Self {
        Self {
            frames: frames.iter().map(|s| s.to_string()).collect(),
            close_when_drained: false,
        }
    }

    fn then_closed(frames: &[&str]) -> Self {
        Self {
            frames: frames.iter().map(|s| s.to_string()).collect(),
            close_when_drained: true,
        }
    }
}

#[async_trait]
impl FrameSource for ScriptedFrames {
    async fn next_frame(&mut self) -> Result<Option<String>, SourceError> {
        if let Some(frame) = self.frames.pop_front() {
            return Ok(Some(frame));
        }
        if self.close_when_drained {
            return Ok(None);
        }
        // Stream stays open with no traffic until the feed shuts down.
        futures::future::pending::<Result<Option<String>, SourceError>>().await
    }
}

/// Frame source emitting occupancy updates forever at a fixed cadence.
struct TickingFrames {
    period: Duration,
    count: u64,
}

#[async_trait]
impl FrameSource for TickingFrames {
    async fn next_frame(&mut self) -> Result<Option<String>, SourceError> {
        tokio::time::sleep(self.period).await;
        self.count += 1;
        Ok(Some(format!(
            "{{\"sensorType\": \"occupancy\", \"value\": {}}}",
            self.count
        )))
    }
}

#[tokio::test]
async fn feed_ingests_snapshot_and_frames() {
    let aggregator = shared_aggregator();

    let batches = ScriptedBatches::new(vec![Ok(vec![
        raw("temperature", 21.5),
        raw("co2", 412.0),
    ])]);
    let frames = ScriptedFrames::then_open(&[
        r#"{"sensorType": "occupancy", "value": 3}"#,
        r#"{"sensorType": "occupancy", "value": 5}"#,
    ]);

    let handle = SensorFeed::spawn(aggregator.clone(), batches, frames, fast_config());

    wait_until(
        || {
            let agg = aggregator.lock().unwrap();
            agg.latest(Metric::Temperature).is_some()
                && agg.latest(Metric::Occupancy).map(|r| r.value) == Some(5.0)
        },
        "snapshot and frames to be ingested",
    )
    .await;

    {
        let agg = aggregator.lock().unwrap();
        assert_eq!(agg.latest(Metric::Temperature).unwrap().value, 21.5);
        assert_eq!(agg.latest(Metric::Co2).unwrap().value, 412.0);
        assert_eq!(agg.series(Metric::Occupancy).len(), 2);
    }

    handle.shutdown().await;
}

#[tokio::test]
async fn shutdown_stops_all_ingestion() {
    let aggregator = shared_aggregator();

    let batches = ScriptedBatches::new(Vec::new());
    let frames = TickingFrames {
        period: Duration::from_millis(10),
        count: 0,
    };

    let handle = SensorFeed::spawn(aggregator.clone(), batches, frames, fast_config());

    wait_until(
        || aggregator.lock().unwrap().stats().accepted >= 3,
        "a few pushed frames",
    )
    .await;

    handle.shutdown().await;
    let settled = aggregator.lock().unwrap().stats();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(
        aggregator.lock().unwrap().stats(),
        settled,
        "no ingestion may happen after shutdown",
    );
}

#[tokio::test]
async fn fetch_errors_keep_the_poll_loop_alive() {
    let aggregator = shared_aggregator();

    let batches = ScriptedBatches::new(vec![
        Err(HttpError::Request("connection refused".into()).into()),
        Ok(vec![raw("light", 320.0)]),
    ]);
    let frames = ScriptedFrames::then_open(&[]);

    let handle = SensorFeed::spawn(aggregator.clone(), batches, frames, fast_config());

    wait_until(
        || aggregator.lock().unwrap().latest(Metric::Light).is_some(),
        "a successful poll after a failed one",
    )
    .await;

    assert_eq!(
        aggregator.lock().unwrap().latest(Metric::Light).unwrap().value,
        320.0,
    );
    handle.shutdown().await;
}

#[tokio::test]
async fn stream_close_ends_only_the_stream_task() {
    let aggregator = shared_aggregator();

    let batches = ScriptedBatches::new(vec![Ok(vec![raw("humidity", 55.0)])]);
    let frames = ScriptedFrames::then_closed(&[r#"{"sensorType": "motion", "value": 1}"#]);

    let handle = SensorFeed::spawn(aggregator.clone(), batches, frames, fast_config());

    wait_until(
        || {
            let agg = aggregator.lock().unwrap();
            agg.latest(Metric::Motion).is_some() && agg.latest(Metric::Humidity).is_some()
        },
        "both channels to deliver",
    )
    .await;

    // The stream closed on its own; the poll task keeps the feed alive.
    assert!(!handle.is_finished());
    handle.shutdown().await;
}
