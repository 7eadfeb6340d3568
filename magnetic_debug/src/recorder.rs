// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Floats are stored as their IEEE-754 bit patterns, so NaN payloads and
//! signed zeros survive the round trip.

use magnetic_core::engine::FrameStats;
use magnetic_core::kurbo::Point;
use magnetic_core::registry::InstanceId;
use magnetic_core::trace::{
    FrameSummary, FrameTickEvent, MeasureEvent, OffsetEvent, RegisterEvent, SettleEvent,
    TraceSink, UnregisterEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME_TICK: u8 = 1;
const TAG_REGISTER: u8 = 2;
const TAG_UNREGISTER: u8 = 3;
const TAG_MEASURE: u8 = 4;
const TAG_SETTLE: u8 = 5;
const TAG_OFFSET: u8 = 6;
const TAG_FRAME_SUMMARY: u8 = 7;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_instance(&mut self, id: InstanceId) {
        self.write_u32(id.index());
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        self.write_u8(TAG_FRAME_TICK);
        self.write_u64(e.frame_index);
        self.write_f64(e.timestamp_ms);
        self.write_f64(e.pointer.x);
        self.write_f64(e.pointer.y);
        self.write_u32(e.instances);
    }

    fn on_register(&mut self, e: &RegisterEvent) {
        self.write_u8(TAG_REGISTER);
        self.write_instance(e.instance);
        self.write_f64(e.force);
        self.write_f64(e.distance);
    }

    fn on_unregister(&mut self, e: &UnregisterEvent) {
        self.write_u8(TAG_UNREGISTER);
        self.write_instance(e.instance);
    }

    fn on_measure(&mut self, e: &MeasureEvent) {
        self.write_u8(TAG_MEASURE);
        self.write_u64(e.frame_index);
        self.write_instance(e.instance);
        self.write_bool(e.container_cached);
    }

    fn on_settle(&mut self, e: &SettleEvent) {
        self.write_u8(TAG_SETTLE);
        self.write_u64(e.frame_index);
        self.write_instance(e.instance);
    }

    fn on_offset(&mut self, e: &OffsetEvent) {
        self.write_u8(TAG_OFFSET);
        self.write_u64(e.frame_index);
        self.write_instance(e.instance);
        self.write_f64(e.x);
        self.write_f64(e.y);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.write_u8(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_f64(s.timestamp_ms);
        let stats = &s.stats;
        for count in [
            stats.instances,
            stats.measured,
            stats.container_queries,
            stats.cache_hits,
            stats.moving,
            stats.settled,
            stats.skipped,
        ] {
            self.write_u32(count);
        }
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`FrameTickEvent`].
    FrameTick(FrameTickEvent),
    /// A [`RegisterEvent`].
    Register(RegisterEvent),
    /// An [`UnregisterEvent`].
    Unregister(UnregisterEvent),
    /// A [`MeasureEvent`].
    Measure(MeasureEvent),
    /// A [`SettleEvent`].
    Settle(SettleEvent),
    /// An [`OffsetEvent`].
    Offset(OffsetEvent),
    /// A [`FrameSummary`].
    FrameSummary(FrameSummary),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_bool(&mut self) -> Option<bool> {
        self.read_u8().map(|v| v != 0)
    }

    fn read_instance(&mut self) -> Option<InstanceId> {
        self.read_u32().map(InstanceId::from_index)
    }

    fn decode_frame_tick(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameTick(FrameTickEvent {
            frame_index: self.read_u64()?,
            timestamp_ms: self.read_f64()?,
            pointer: Point::new(self.read_f64()?, self.read_f64()?),
            instances: self.read_u32()?,
        }))
    }

    fn decode_register(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Register(RegisterEvent {
            instance: self.read_instance()?,
            force: self.read_f64()?,
            distance: self.read_f64()?,
        }))
    }

    fn decode_unregister(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Unregister(UnregisterEvent {
            instance: self.read_instance()?,
        }))
    }

    fn decode_measure(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Measure(MeasureEvent {
            frame_index: self.read_u64()?,
            instance: self.read_instance()?,
            container_cached: self.read_bool()?,
        }))
    }

    fn decode_settle(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Settle(SettleEvent {
            frame_index: self.read_u64()?,
            instance: self.read_instance()?,
        }))
    }

    fn decode_offset(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Offset(OffsetEvent {
            frame_index: self.read_u64()?,
            instance: self.read_instance()?,
            x: self.read_f64()?,
            y: self.read_f64()?,
        }))
    }

    fn decode_frame_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSummary(FrameSummary {
            frame_index: self.read_u64()?,
            timestamp_ms: self.read_f64()?,
            stats: FrameStats {
                instances: self.read_u32()?,
                measured: self.read_u32()?,
                container_queries: self.read_u32()?,
                cache_hits: self.read_u32()?,
                moving: self.read_u32()?,
                settled: self.read_u32()?,
                skipped: self.read_u32()?,
            },
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_FRAME_TICK => self.decode_frame_tick(),
            TAG_REGISTER => self.decode_register(),
            TAG_UNREGISTER => self.decode_unregister(),
            TAG_MEASURE => self.decode_measure(),
            TAG_SETTLE => self.decode_settle(),
            TAG_OFFSET => self.decode_offset(),
            TAG_FRAME_SUMMARY => self.decode_frame_summary(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use magnetic_core::timing::FrameTick;

    fn id(n: u32) -> InstanceId {
        InstanceId::from_index(n)
    }

    #[test]
    fn frame_tick_survives_recording() {
        let mut rec = RecorderSink::new();
        let orig = FrameTickEvent::new(&FrameTick::new(7, 116.5), Point::new(150.0, 120.0), 4);
        rec.on_frame_tick(&orig);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::FrameTick(e) => {
                assert_eq!(e.frame_index, 7);
                assert_eq!(e.timestamp_ms, 116.5);
                assert_eq!(e.pointer, Point::new(150.0, 120.0));
                assert_eq!(e.instances, 4);
            }
            other => panic!("expected FrameTick, got {other:?}"),
        }
    }

    #[test]
    fn summary_keeps_every_counter() {
        let stats = FrameStats {
            instances: 5,
            measured: 4,
            container_queries: 2,
            cache_hits: 2,
            moving: 3,
            settled: 1,
            skipped: 1,
        };
        let orig = FrameSummary::new(&FrameTick::new(9, 150.0), stats);
        let mut rec = RecorderSink::new();
        rec.on_frame_summary(&orig);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        match &events[..] {
            [RecordedEvent::FrameSummary(s)] => assert_eq!(*s, orig),
            other => panic!("expected one FrameSummary, got {other:?}"),
        }
    }

    #[test]
    fn mixed_stream_keeps_order() {
        let mut rec = RecorderSink::new();
        rec.on_register(&RegisterEvent {
            instance: id(0),
            force: 0.1,
            distance: 1.0,
        });
        rec.on_frame_tick(&FrameTickEvent::new(
            &FrameTick::new(0, 0.0),
            Point::ZERO,
            1,
        ));
        rec.on_measure(&MeasureEvent {
            frame_index: 0,
            instance: id(0),
            container_cached: false,
        });
        rec.on_offset(&OffsetEvent {
            frame_index: 0,
            instance: id(0),
            x: -4.0,
            y: 0.0,
        });
        rec.on_settle(&SettleEvent {
            frame_index: 0,
            instance: id(0),
        });
        rec.on_unregister(&UnregisterEvent { instance: id(0) });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 6);
        assert!(matches!(events[0], RecordedEvent::Register(_)));
        assert!(matches!(events[1], RecordedEvent::FrameTick(_)));
        assert!(
            matches!(events[2], RecordedEvent::Measure(e) if !e.container_cached),
            "got {:?}",
            events[2]
        );
        assert!(matches!(events[3], RecordedEvent::Offset(e) if e.x == -4.0));
        assert!(matches!(events[4], RecordedEvent::Settle(e) if e.instance == id(0)));
        assert!(matches!(events[5], RecordedEvent::Unregister(e) if e.instance == id(0)));
    }

    #[test]
    fn nan_force_is_preserved_bitwise() {
        let mut rec = RecorderSink::new();
        rec.on_register(&RegisterEvent {
            instance: id(3),
            force: f64::NAN,
            distance: -2.0,
        });
        match decode(rec.as_bytes()).next() {
            Some(RecordedEvent::Register(e)) => {
                assert!(e.force.is_nan());
                assert_eq!(e.distance, -2.0);
                assert_eq!(e.instance, id(3));
            }
            other => panic!("expected Register, got {other:?}"),
        }
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_unregister(&UnregisterEvent { instance: id(1) });
        rec.on_settle(&SettleEvent {
            frame_index: 2,
            instance: id(1),
        });
        let bytes = rec.into_bytes();
        let cut = &bytes[..bytes.len() - 3];

        let events: Vec<_> = decode(cut).collect();
        assert_eq!(events.len(), 1, "only the complete record decodes");
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }
}
