// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use magnetic_core::trace::{
    FrameSummary, FrameTickEvent, MeasureEvent, OffsetEvent, RegisterEvent, SettleEvent,
    TraceSink, UnregisterEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    offsets: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("offsets", &self.offsets)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    ///
    /// Per-instance offset lines are suppressed until
    /// [`with_offsets`](Self::with_offsets) turns them on.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            offsets: false,
        }
    }

    /// Enables or disables the `[offset]` lines.
    #[must_use]
    pub fn with_offsets(mut self, offsets: bool) -> Self {
        self.offsets = offsets;
        self
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        let _ = writeln!(
            self.writer,
            "[tick] frame={} at {:.1}ms pointer=({:.1}, {:.1}) instances={}",
            e.frame_index, e.timestamp_ms, e.pointer.x, e.pointer.y, e.instances,
        );
    }

    fn on_register(&mut self, e: &RegisterEvent) {
        let _ = writeln!(
            self.writer,
            "[register] #{} force={} distance={}",
            e.instance.index(),
            e.force,
            e.distance,
        );
    }

    fn on_unregister(&mut self, e: &UnregisterEvent) {
        let _ = writeln!(self.writer, "[unregister] #{}", e.instance.index());
    }

    fn on_measure(&mut self, e: &MeasureEvent) {
        let source = if e.container_cached { "cached" } else { "queried" };
        let _ = writeln!(
            self.writer,
            "[measure] frame={} #{} container={source}",
            e.frame_index,
            e.instance.index(),
        );
    }

    fn on_settle(&mut self, e: &SettleEvent) {
        let _ = writeln!(
            self.writer,
            "[settle] frame={} #{}",
            e.frame_index,
            e.instance.index(),
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let stats = &s.stats;
        let _ = writeln!(
            self.writer,
            "[summary] frame={} instances={} measured={} queries={} hits={} \
             moving={} settled={} skipped={}",
            s.frame_index,
            stats.instances,
            stats.measured,
            stats.container_queries,
            stats.cache_hits,
            stats.moving,
            stats.settled,
            stats.skipped,
        );
    }

    fn on_offset(&mut self, e: &OffsetEvent) {
        if !self.offsets {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[offset] frame={} #{} x={:.3}px y={:.3}px",
            e.frame_index,
            e.instance.index(),
            e.x,
            e.y,
        );
    }
}
