// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame tick type shared between tick sources and the engine.
//!
//! The effect is frame-stepped, not time-stepped: the integrator advances by
//! one step per tick regardless of the interval between ticks. The timestamp
//! is carried for diagnostics only.

/// A frame opportunity delivered by the backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// Monotonically increasing frame counter.
    pub frame_index: u64,
    /// Host timestamp in milliseconds (e.g. the `requestAnimationFrame`
    /// argument).
    pub timestamp_ms: f64,
}

impl FrameTick {
    /// Creates a tick.
    #[inline]
    #[must_use]
    pub const fn new(frame_index: u64, timestamp_ms: f64) -> Self {
        Self {
            frame_index,
            timestamp_ms,
        }
    }
}

