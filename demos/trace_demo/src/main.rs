// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless frame loop that exercises the engine and the diagnostics
//! pipeline.
//!
//! Two buttons share one container. A synthetic pointer idles outside, enters
//! the container, sweeps across both buttons, and leaves again, after which
//! the offsets decay and clear. Events go to both a
//! [`PrettyPrintSink`](magnetic_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](magnetic_debug::recorder::RecorderSink), and the
//! recording is exported as Chrome trace JSON (default `trace.json`, or the
//! first command-line argument).

use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use magnetic_core::backend::Presenter;
use magnetic_core::engine::{Engine, FrameStats};
use magnetic_core::instance::MagnetOptions;
use magnetic_core::kurbo::{Point, Rect, Vec2};
use magnetic_core::pointer::PointerCell;
use magnetic_core::timing::FrameTick;
use magnetic_core::trace::{
    FrameSummary, FrameTickEvent, MeasureEvent, OffsetEvent, RegisterEvent, SettleEvent,
    TraceSink, Tracer, UnregisterEvent,
};

use magnetic_debug::pretty::PrettyPrintSink;
use magnetic_debug::recorder::RecorderSink;

/// ≈60 Hz.
const FRAME_MS: f64 = 16.667;
const FRAME_COUNT: u64 = 180;
/// Frames spent idling before the pointer enters.
const ENTER_AT: u64 = 10;
/// Frame at which the pointer leaves the container.
const LEAVE_AT: u64 = 90;

const CONTAINER: u32 = 0;
const PRIMARY: u32 = 1;
const SECONDARY: u32 = 2;

fn main() {
    let path = std::env::args().nth(1).unwrap_or_else(|| "trace.json".into());

    // -- sinks -------------------------------------------------------------
    let mut sinks = Tee {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
        recorder: RecorderSink::new(),
    };

    // -- scene -------------------------------------------------------------
    let mut presenter = SimPresenter::new(&[
        (CONTAINER, Rect::new(0.0, 0.0, 400.0, 300.0)),
        (PRIMARY, Rect::new(100.0, 100.0, 200.0, 140.0)),
        (SECONDARY, Rect::new(250.0, 180.0, 330.0, 220.0)),
    ]);
    let pointer = Rc::new(PointerCell::at(Point::new(-50.0, 150.0)));
    let mut engine: Engine<u32, Rc<PointerCell>> = Engine::new(Rc::clone(&pointer));

    let (primary, secondary) = {
        let mut tracer = Tracer::new(&mut sinks);
        let primary = engine
            .create(
                MagnetOptions::new(CONTAINER, PRIMARY),
                &mut presenter,
                &mut tracer,
            )
            .expect("primary button is valid");
        let secondary = engine
            .create(
                MagnetOptions::new(CONTAINER, SECONDARY)
                    .with_force(0.25)
                    .with_distance(0.5),
                &mut presenter,
                &mut tracer,
            )
            .expect("secondary button is valid");
        (primary, secondary)
    };

    // -- simulated loop ----------------------------------------------------
    let mut totals = FrameStats::default();
    for frame_index in 0..FRAME_COUNT {
        pointer.set(pointer_path(frame_index));
        if frame_index == ENTER_AT || frame_index == LEAVE_AT {
            let inside = frame_index == ENTER_AT;
            engine.set_hovering(primary, inside);
            engine.set_hovering(secondary, inside);
        }

        let tick = FrameTick::new(frame_index, 1000.0 + frame_index as f64 * FRAME_MS);
        let stats = engine.frame(&tick, &mut presenter, &mut Tracer::new(&mut sinks));
        totals.measured += stats.measured;
        totals.container_queries += stats.container_queries;
        totals.cache_hits += stats.cache_hits;
        totals.moving += stats.moving;
        totals.settled += stats.settled;
        totals.skipped += stats.skipped;
    }

    {
        let mut tracer = Tracer::new(&mut sinks);
        let _ = engine.unregister(secondary, &mut presenter, &mut tracer);
        let _ = engine.unregister(primary, &mut presenter, &mut tracer);
    }

    // -- export Chrome trace -----------------------------------------------
    let file = File::create(&path).expect("failed to create trace file");
    let mut writer = BufWriter::new(file);
    magnetic_debug::chrome::export(sinks.recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!(
        "Wrote {path} ({FRAME_COUNT} frames: {} measured, {} container queries, \
         {} cache hits, {} moving, {} cleared, {} skipped; {} transform writes)",
        totals.measured,
        totals.container_queries,
        totals.cache_hits,
        totals.moving,
        totals.settled,
        totals.skipped,
        presenter.writes,
    );
}

/// Outside, then a diagonal sweep across the container, then outside again.
fn pointer_path(frame_index: u64) -> Point {
    if !(ENTER_AT..LEAVE_AT).contains(&frame_index) {
        return Point::new(-50.0, 150.0);
    }
    let t = (frame_index - ENTER_AT) as f64 / (LEAVE_AT - ENTER_AT) as f64;
    Point::new(20.0, 40.0).lerp(Point::new(380.0, 260.0), t)
}

// ---------------------------------------------------------------------------
// Simulated host
// ---------------------------------------------------------------------------

/// Fixed layout; transform writes are counted rather than rendered.
struct SimPresenter {
    rects: Vec<(u32, Rect)>,
    writes: u32,
}

impl SimPresenter {
    fn new(rects: &[(u32, Rect)]) -> Self {
        Self {
            rects: rects.to_vec(),
            writes: 0,
        }
    }
}

impl Presenter for SimPresenter {
    type Node = u32;

    fn measure(&mut self, node: &u32) -> Rect {
        self.rects
            .iter()
            .find(|(n, _)| n == node)
            .map_or(Rect::ZERO, |(_, r)| *r)
    }

    fn translate(&mut self, _node: &u32, _offset: Vec2) {
        self.writes += 1;
    }

    fn clear(&mut self, _node: &u32) {
        self.writes += 1;
    }
}

// ---------------------------------------------------------------------------
// Fan-out sink
// ---------------------------------------------------------------------------

/// Forwards every event to both sinks.
struct Tee {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for Tee {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        self.pretty.on_frame_tick(e);
        self.recorder.on_frame_tick(e);
    }

    fn on_register(&mut self, e: &RegisterEvent) {
        self.pretty.on_register(e);
        self.recorder.on_register(e);
    }

    fn on_unregister(&mut self, e: &UnregisterEvent) {
        self.pretty.on_unregister(e);
        self.recorder.on_unregister(e);
    }

    fn on_measure(&mut self, e: &MeasureEvent) {
        self.pretty.on_measure(e);
        self.recorder.on_measure(e);
    }

    fn on_settle(&mut self, e: &SettleEvent) {
        self.pretty.on_settle(e);
        self.recorder.on_settle(e);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.pretty.on_frame_summary(s);
        self.recorder.on_frame_summary(s);
    }

    fn on_offset(&mut self, e: &OffsetEvent) {
        self.pretty.on_offset(e);
        self.recorder.on_offset(e);
    }
}
