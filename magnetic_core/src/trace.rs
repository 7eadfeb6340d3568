// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the engine.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! engine calls at each stage. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) gates [`OffsetEvent`], emitted for every
//!   visibly displaced instance on every frame.

use kurbo::Point;

use crate::engine::FrameStats;
use crate::registry::InstanceId;
use crate::timing::FrameTick;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted at the start of every frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameTickEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Host timestamp in milliseconds.
    pub timestamp_ms: f64,
    /// Pointer sample used for the whole frame.
    pub pointer: Point,
    /// Live instances at the start of the frame.
    pub instances: u32,
}

impl FrameTickEvent {
    /// Creates an event from a tick plus the frame's pointer sample.
    #[must_use]
    pub fn new(tick: &FrameTick, pointer: Point, instances: u32) -> Self {
        Self {
            frame_index: tick.frame_index,
            timestamp_ms: tick.timestamp_ms,
            pointer,
            instances,
        }
    }
}

/// Emitted when an instance is registered.
#[derive(Clone, Copy, Debug)]
pub struct RegisterEvent {
    /// The new instance.
    pub instance: InstanceId,
    /// Effective (normalized) force.
    pub force: f64,
    /// Effective (normalized) distance.
    pub distance: f64,
}

/// Emitted when an instance is unregistered.
#[derive(Clone, Copy, Debug)]
pub struct UnregisterEvent {
    /// The removed instance.
    pub instance: InstanceId,
}

/// Emitted when the measurement pass refreshes an instance's rectangles.
#[derive(Clone, Copy, Debug)]
pub struct MeasureEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which instance was measured.
    pub instance: InstanceId,
    /// Whether the container rectangle came from the per-frame cache.
    pub container_cached: bool,
}

/// Emitted when a displaced instance settles and its transform is cleared.
#[derive(Clone, Copy, Debug)]
pub struct SettleEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which instance settled.
    pub instance: InstanceId,
}

/// Per-instance offset written this frame (requires `trace-rich`).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct OffsetEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which instance moved.
    pub instance: InstanceId,
    /// Applied x offset in pixels.
    pub x: f64,
    /// Applied y offset in pixels.
    pub y: f64,
}

/// Per-frame counters, emitted after the mutation pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Host timestamp in milliseconds.
    pub timestamp_ms: f64,
    /// Counters gathered by the engine.
    pub stats: FrameStats,
}

impl FrameSummary {
    /// Creates a summary for `tick`.
    #[must_use]
    pub fn new(tick: &FrameTick, stats: FrameStats) -> Self {
        Self {
            frame_index: tick.frame_index,
            timestamp_ms: tick.timestamp_ms,
            stats,
        }
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called at the start of a frame.
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        _ = e;
    }

    /// Called when an instance is registered.
    fn on_register(&mut self, e: &RegisterEvent) {
        _ = e;
    }

    /// Called when an instance is unregistered.
    fn on_unregister(&mut self, e: &UnregisterEvent) {
        _ = e;
    }

    /// Called for every instance measured this frame.
    fn on_measure(&mut self, e: &MeasureEvent) {
        _ = e;
    }

    /// Called for every instance that settled this frame.
    fn on_settle(&mut self, e: &SettleEvent) {
        _ = e;
    }

    /// Called with the per-frame counters.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }

    /// Called for every visibly displaced instance (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    fn on_offset(&mut self, e: &OffsetEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// Expands to a `Tracer` method that forwards one event to the sink.
macro_rules! forward {
    ($(#[$meta:meta])* $name:ident => $hook:ident($ty:ty)) => {
        $(#[$meta])*
        #[inline]
        pub fn $name(&mut self, e: &$ty) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$hook(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    forward!(
        /// Emits a [`FrameTickEvent`].
        frame_tick => on_frame_tick(FrameTickEvent)
    );
    forward!(
        /// Emits a [`RegisterEvent`].
        register => on_register(RegisterEvent)
    );
    forward!(
        /// Emits an [`UnregisterEvent`].
        unregister => on_unregister(UnregisterEvent)
    );
    forward!(
        /// Emits a [`MeasureEvent`].
        measure => on_measure(MeasureEvent)
    );
    forward!(
        /// Emits a [`SettleEvent`].
        settle => on_settle(SettleEvent)
    );
    forward!(
        /// Emits a [`FrameSummary`].
        frame_summary => on_frame_summary(FrameSummary)
    );

    /// Emits an [`OffsetEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn offset(&mut self, e: &OffsetEvent) {
        if let Some(s) = &mut self.sink {
            s.on_offset(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tick() -> FrameTickEvent {
        FrameTickEvent::new(&FrameTick::new(42, 700.0), Point::new(1.0, 2.0), 3)
    }

    #[test]
    fn frame_tick_event_new() {
        let evt = sample_tick();
        assert_eq!(evt.frame_index, 42);
        assert_eq!(evt.timestamp_ms, 700.0);
        assert_eq!(evt.pointer, Point::new(1.0, 2.0));
        assert_eq!(evt.instances, 3);
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_frame_tick(&sample_tick());
        sink.on_frame_summary(&FrameSummary::new(
            &FrameTick::new(0, 0.0),
            FrameStats::default(),
        ));
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.frame_tick(&sample_tick());
        tracer.settle(&SettleEvent {
            frame_index: 0,
            instance: InstanceId(0),
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            ticks: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_frame_tick(&mut self, e: &FrameTickEvent) {
                self.ticks.push(e.frame_index);
            }
        }

        let mut sink = RecordingSink { ticks: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.frame_tick(&sample_tick());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.ticks, &[42]);
    }
}
