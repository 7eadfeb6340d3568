// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exponential smoothing integrator.
//!
//! [`Motion`] is a single-pole low-pass filter over a 2D offset:
//!
//! ```text
//! rendered = rendered * (1 - force) + raw * force
//! ```
//!
//! With `force` in `[0, 1)` each step moves the rendered offset a fixed
//! fraction of the way toward the raw target, so it converges monotonically
//! and never overshoots. Larger forces track the target more tightly.

use kurbo::Vec2;

/// Result of one integrator step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// The offset is still visible and should be applied.
    Moving(Vec2),
    /// Both axes are within the settle threshold.
    Settled,
}

/// Smoothed 2D offset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Motion {
    rendered: Vec2,
}

impl Motion {
    /// A motion at rest (zero offset).
    pub const REST: Self = Self {
        rendered: Vec2::ZERO,
    };

    /// Returns the current smoothed offset.
    #[inline]
    #[must_use]
    pub const fn rendered(&self) -> Vec2 {
        self.rendered
    }

    /// Returns `true` if the offset is exactly zero on both axes.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.rendered == Vec2::ZERO
    }

    /// Advances one frame toward `raw` and classifies the result against
    /// `threshold`.
    pub fn step(&mut self, raw: Vec2, force: f64, threshold: f64) -> Step {
        self.rendered = Vec2::new(
            self.rendered.x * (1.0 - force) + raw.x * force,
            self.rendered.y * (1.0 - force) + raw.y * force,
        );

        if within(self.rendered.x, threshold) && within(self.rendered.y, threshold) {
            Step::Settled
        } else {
            Step::Moving(self.rendered)
        }
    }
}

/// `|v| <= t` without needing `std` float intrinsics.
#[inline]
fn within(v: f64, t: f64) -> bool {
    -t <= v && v <= t
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f64 = 0.1;

    fn approx(a: f64, b: f64) -> bool {
        let d = a - b;
        -1e-9 < d && d < 1e-9
    }

    #[test]
    fn first_step_from_rest() {
        let mut m = Motion::REST;
        let step = m.step(Vec2::new(40.0, 0.0), 0.1, THRESHOLD);
        assert!(approx(m.rendered().x, 4.0), "got {:?}", m.rendered());
        assert!(matches!(step, Step::Moving(_)), "4px is visible");
    }

    #[test]
    fn converges_monotonically_without_overshoot() {
        for force in [0.0, 0.05, 0.1, 0.5, 0.999] {
            let target = Vec2::new(25.0, -12.0);
            let mut m = Motion::REST;
            let mut prev = m.rendered();
            for _ in 0..500 {
                m.step(target, force, THRESHOLD);
                let cur = m.rendered();
                // Allow for rounding at the fixed point.
                assert!(cur.x >= prev.x - 1e-9, "x went backwards at force {force}");
                assert!(cur.x <= target.x + 1e-9, "x overshoot at force {force}");
                assert!(cur.y <= prev.y + 1e-9, "y went backwards at force {force}");
                assert!(cur.y >= target.y - 1e-9, "y overshoot at force {force}");
                prev = cur;
            }
        }
    }

    #[test]
    fn zero_force_never_moves() {
        let mut m = Motion::REST;
        for _ in 0..10 {
            assert_eq!(m.step(Vec2::new(100.0, 100.0), 0.0, THRESHOLD), Step::Settled);
        }
        assert!(m.is_at_rest(), "force 0 ignores the target entirely");
    }

    #[test]
    fn decays_to_settled() {
        let mut m = Motion::REST;
        m.step(Vec2::new(10.0, 10.0), 0.5, THRESHOLD);
        let mut frames = 0;
        while let Step::Moving(_) = m.step(Vec2::ZERO, 0.5, THRESHOLD) {
            frames += 1;
            assert!(frames < 100, "never settled");
        }
        let r = m.rendered();
        assert!(within(r.x, THRESHOLD) && within(r.y, THRESHOLD), "settled inside threshold");
    }

    #[test]
    fn one_axis_above_threshold_keeps_moving() {
        let mut m = Motion::REST;
        let step = m.step(Vec2::new(0.0, 2.0), 0.1, THRESHOLD);
        assert!(matches!(step, Step::Moving(v) if v.x == 0.0), "y = 0.2 is visible");
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut m = Motion::REST;
        assert_eq!(m.step(Vec2::new(0.1, -0.1), 0.5, 0.05), Step::Settled);
    }
}
