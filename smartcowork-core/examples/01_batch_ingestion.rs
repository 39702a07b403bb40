//! Batch Ingestion Example
//!
//! This example demonstrates the polled path of the aggregator:
//! reconciling a bulk snapshot of sensor readings — including garbage
//! values, missing timestamps, and unknown metrics — into per-metric
//! rolling windows and latest-value tiles.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_batch_ingestion
//! ```

use smartcowork_core::{Metric, RawReading, SensorAggregator};

fn main() {
    env_logger::init();

    println!("SmartCowork Batch Ingestion Example");
    println!("===================================\n");

    let mut aggregator = SensorAggregator::new();

    // A snapshot as the sensor gateway actually sends it: out of
    // timestamp order, mixed value types, one unknown metric.
    let batch: Vec<RawReading> = serde_json::from_str(
        r#"[
            {"sensorType": "temperature", "value": 21.8, "unit": "°C",
             "timestamp": "2024-06-01T10:32:00Z",
             "space": {"id": 1, "name": "Open Space A"}},
            {"sensorType": "temperature", "value": "21.2", "unit": "°C",
             "timestamp": "2024-06-01T10:30:00Z"},
            {"sensorType": "co2", "value": 412, "unit": "ppm",
             "timestamp": "2024-06-01T10:31:00Z"},
            {"sensorType": "occupancy", "value": "7", "unit": "people"},
            {"sensorType": "pressure", "value": 1013.2, "unit": "hPa"},
            {"sensorType": "humidity", "value": "wet", "unit": "%"}
        ]"#,
    )
    .expect("example batch is valid JSON");

    let summary = aggregator.ingest_batch(&batch);
    println!(
        "Ingested snapshot for \"{}\": {} accepted, {} dropped\n",
        aggregator.space_label(),
        summary.accepted,
        summary.rejected,
    );

    println!("Current values:");
    for (metric, latest) in aggregator.latest_all() {
        match latest {
            Some(reading) => println!(
                "  {:12} {:>8.1} {:4} at {}",
                metric.label(),
                reading.value,
                if reading.unit.is_empty() {
                    metric.default_unit()
                } else {
                    reading.unit.as_str()
                },
                reading.observed_at.format("%H:%M:%S"),
            ),
            None => println!("  {:12} no data", metric.label()),
        }
    }

    println!("\nTemperature trend (oldest first):");
    for reading in aggregator.series(Metric::Temperature).iter() {
        println!(
            "  {} -> {:.1}{}",
            reading.observed_at.format("%H:%M:%S"),
            reading.value,
            reading.unit,
        );
    }
}
