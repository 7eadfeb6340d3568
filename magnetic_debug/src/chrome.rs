// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Only frame ticks and summaries carry a host timestamp. Every other event
//! is stamped with the timestamp of the most recent tick before it, or zero
//! if none has been seen yet. Offsets become counter tracks, one per
//! instance, so the spring decay is visible as a curve. Non-finite numbers
//! are written as `null`.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut now_us = 0.0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::FrameTick(e) => {
                now_us = ms_to_us(e.timestamp_ms);
                events.push(json!({
                    "ph": "i",
                    "name": "FrameTick",
                    "cat": "Frame",
                    "ts": now_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                        "pointer_x": e.pointer.x,
                        "pointer_y": e.pointer.y,
                        "instances": e.instances,
                    }
                }));
            }
            RecordedEvent::Register(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Register",
                    "cat": "Registry",
                    "ts": now_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "instance": e.instance.index(),
                        "force": e.force,
                        "distance": e.distance,
                    }
                }));
            }
            RecordedEvent::Unregister(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Unregister",
                    "cat": "Registry",
                    "ts": now_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "instance": e.instance.index(),
                    }
                }));
            }
            RecordedEvent::Measure(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Measure",
                    "cat": "Instance",
                    "ts": now_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "instance": e.instance.index(),
                        "container_cached": e.container_cached,
                    }
                }));
            }
            RecordedEvent::Settle(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Settle",
                    "cat": "Instance",
                    "ts": now_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "instance": e.instance.index(),
                    }
                }));
            }
            RecordedEvent::Offset(e) => {
                events.push(json!({
                    "ph": "C",
                    "name": format!("offset #{}", e.instance.index()),
                    "cat": "Rich",
                    "ts": now_us,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "x": e.x,
                        "y": e.y,
                    }
                }));
            }
            RecordedEvent::FrameSummary(s) => {
                now_us = ms_to_us(s.timestamp_ms);
                events.push(json!({
                    "ph": "i",
                    "name": "FrameSummary",
                    "cat": "Summary",
                    "ts": now_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": s.frame_index,
                        "instances": s.stats.instances,
                        "measured": s.stats.measured,
                        "container_queries": s.stats.container_queries,
                        "cache_hits": s.stats.cache_hits,
                        "moving": s.stats.moving,
                        "settled": s.stats.settled,
                        "skipped": s.stats.skipped,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ms_to_us(ms: f64) -> f64 {
    ms * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use magnetic_core::kurbo::Point;
    use magnetic_core::registry::InstanceId;
    use magnetic_core::timing::FrameTick;
    use magnetic_core::trace::{
        FrameTickEvent, MeasureEvent, OffsetEvent, RegisterEvent, TraceSink,
    };

    #[test]
    fn export_produces_valid_json() {
        let id = InstanceId::from_index(0);
        let mut rec = RecorderSink::new();
        rec.on_register(&RegisterEvent {
            instance: id,
            force: 0.1,
            distance: 1.0,
        });
        rec.on_frame_tick(&FrameTickEvent::new(
            &FrameTick::new(0, 16.0),
            Point::new(150.0, 120.0),
            1,
        ));
        rec.on_measure(&MeasureEvent {
            frame_index: 0,
            instance: id,
            container_cached: false,
        });
        rec.on_offset(&OffsetEvent {
            frame_index: 0,
            instance: id,
            x: 4.0,
            y: 3.2,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        // Should parse as a JSON array.
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 4);

        // Registration precedes any tick.
        assert_eq!(parsed[0]["name"], "Register");
        assert_eq!(parsed[0]["ts"], 0.0);

        assert_eq!(parsed[1]["ph"], "i");
        assert_eq!(parsed[1]["name"], "FrameTick");
        assert_eq!(parsed[1]["ts"], 16_000.0);

        // Later events inherit the tick's timestamp.
        assert_eq!(parsed[2]["name"], "Measure");
        assert_eq!(parsed[2]["ts"], 16_000.0);

        assert_eq!(parsed[3]["ph"], "C");
        assert_eq!(parsed[3]["name"], "offset #0");
        assert_eq!(parsed[3]["args"]["x"], 4.0);
    }

    #[test]
    fn non_finite_values_become_null() {
        let mut rec = RecorderSink::new();
        rec.on_register(&RegisterEvent {
            instance: InstanceId::from_index(2),
            force: 0.5,
            distance: f64::INFINITY,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["args"]["force"], 0.5);
        assert!(parsed[0]["args"]["distance"].is_null());
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
