//! Push Updates Example
//!
//! This example demonstrates the streamed path of the aggregator:
//! handing it WebSocket-style JSON text frames one at a time, including
//! frames that are malformed or carry stale embedded timestamps, and
//! watching the latest-value tiles follow arrival order.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_push_updates
//! ```

use smartcowork_core::{Metric, SensorAggregator};

fn main() {
    env_logger::init();

    println!("SmartCowork Push Updates Example");
    println!("================================\n");

    let mut aggregator = SensorAggregator::new();

    let frames = [
        r#"{"sensorType": "occupancy", "value": 3, "unit": "people"}"#,
        r#"{"sensorType": "occupancy", "value": 5, "unit": "people"}"#,
        r#"{"sensorType": "temperature", "value": "21.4", "unit": "°C"}"#,
        // Stale embedded timestamp: the live feed still wins the tile.
        r#"{"sensorType": "temperature", "value": 20.9, "unit": "°C",
            "timestamp": "2020-01-01T00:00:00Z"}"#,
        // Malformed and unknown frames are absorbed, not errors.
        r#"{{{ not json"#,
        r#"{"sensorType": "pressure", "value": 1013}"#,
    ];

    for frame in frames {
        let outcome = aggregator.ingest_frame(frame);
        println!("frame {:50} -> {:?}", truncated(frame), outcome);
    }

    println!("\nAfter the burst:");
    println!(
        "  occupancy latest: {}",
        aggregator.latest(Metric::Occupancy).unwrap().value,
    );
    println!(
        "  temperature latest: {} (from the newest arrival)",
        aggregator.latest(Metric::Temperature).unwrap().value,
    );

    let stats = aggregator.stats();
    println!(
        "  stats: {} accepted, {} rejected, {} malformed frames",
        stats.accepted, stats.rejected, stats.malformed_frames,
    );
}

fn truncated(frame: &str) -> String {
    let flat = frame.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > 48 {
        let head: String = flat.chars().take(47).collect();
        format!("{head}…")
    } else {
        flat
    }
}
