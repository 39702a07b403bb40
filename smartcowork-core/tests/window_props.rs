//! Property tests for the window and coercion invariants
//!
//! The aggregator must hold its invariants for arbitrary garbage, not
//! just the shapes the gateway usually sends: series never exceed the
//! window, stay sorted after batches, and no `NaN` ever reaches state.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use serde_json::{json, Value};
use smartcowork_core::{FixedClock, Metric, RawReading, SensorAggregator, SERIES_WINDOW};

fn metric_key() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!("temperature")),
        Just(json!("HUMIDITY")),
        Just(json!("Occupancy")),
        Just(json!("co2")),
        Just(json!("light")),
        Just(json!("motion")),
        Just(json!("pressure")),
        Just(json!("")),
        Just(Value::Null),
    ]
}

fn wire_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-1.0e9f64..1.0e9).prop_map(|v| json!(v)),
        (-1.0e6f64..1.0e6).prop_map(|v| json!(v.to_string())),
        Just(json!("abc")),
        Just(json!("NaN")),
        Just(Value::Null),
        Just(json!(true)),
    ]
}

fn wire_timestamp() -> impl Strategy<Value = Value> {
    prop_oneof![
        (0i64..4_102_444_800_000).prop_map(|ms| json!(ms)),
        (0i64..4_102_444_800).prop_map(|secs| {
            json!(Utc.timestamp_opt(secs, 0).unwrap().to_rfc3339())
        }),
        Just(json!("yesterday")),
        Just(Value::Null),
    ]
}

prop_compose! {
    fn raw_reading()(
        metric in metric_key(),
        value in wire_value(),
        timestamp in wire_timestamp(),
    ) -> RawReading {
        serde_json::from_value(json!({
            "sensorType": metric,
            "value": value,
            "timestamp": timestamp,
        }))
        .unwrap_or_default()
    }
}

fn aggregator() -> SensorAggregator<FixedClock> {
    SensorAggregator::with_clock(FixedClock::at(
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    ))
}

proptest! {
    #[test]
    fn batches_never_break_invariants(
        batches in prop::collection::vec(
            prop::collection::vec(raw_reading(), 0..60),
            1..5,
        )
    ) {
        let mut agg = aggregator();
        for batch in &batches {
            agg.ingest_batch(batch);

            for metric in Metric::ALL {
                let series = agg.series(metric);
                prop_assert!(series.len() <= SERIES_WINDOW);
                prop_assert!(
                    series
                        .as_slice()
                        .windows(2)
                        .all(|w| w[0].observed_at <= w[1].observed_at),
                    "series for {metric} must be sorted after a batch",
                );
                for reading in series.iter() {
                    prop_assert!(reading.value.is_finite());
                }
                if let Some(latest) = agg.latest(metric) {
                    prop_assert!(latest.value.is_finite());
                }
            }
        }
    }

    #[test]
    fn pushes_never_break_cap_or_finiteness(
        frames in prop::collection::vec(raw_reading(), 0..80)
    ) {
        let mut agg = aggregator();
        for frame in &frames {
            agg.ingest_one(frame);

            for metric in Metric::ALL {
                prop_assert!(agg.series(metric).len() <= SERIES_WINDOW);
                if let Some(latest) = agg.latest(metric) {
                    prop_assert!(latest.value.is_finite());
                }
            }
        }
    }

    #[test]
    fn reingesting_a_batch_is_cap_stable(
        batch in prop::collection::vec(raw_reading(), 0..60)
    ) {
        let mut agg = aggregator();
        agg.ingest_batch(&batch);
        agg.ingest_batch(&batch);

        for metric in Metric::ALL {
            let series = agg.series(metric);
            prop_assert!(series.len() <= SERIES_WINDOW);
            prop_assert!(
                series
                    .as_slice()
                    .windows(2)
                    .all(|w| w[0].observed_at <= w[1].observed_at)
            );
        }
    }
}
