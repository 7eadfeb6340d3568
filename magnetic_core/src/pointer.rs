// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer position provider.
//!
//! The engine never reads a global. Instead it owns a [`PointerSource`] and
//! samples it once per frame. Hosts feed positions into a [`PointerCell`]
//! (single writer, latest sample wins) and hand the engine a shared reference
//! to the same cell.

use alloc::rc::Rc;
use core::cell::Cell;

use kurbo::Point;

/// Supplies the most recent pointer position in viewport coordinates.
pub trait PointerSource {
    /// Returns the latest pointer sample.
    fn pointer(&self) -> Point;
}

/// A fixed pointer position. Handy for tests and offline simulation.
impl PointerSource for Point {
    #[inline]
    fn pointer(&self) -> Point {
        *self
    }
}

impl<T: PointerSource + ?Sized> PointerSource for &T {
    #[inline]
    fn pointer(&self) -> Point {
        (**self).pointer()
    }
}

impl<T: PointerSource + ?Sized> PointerSource for Rc<T> {
    #[inline]
    fn pointer(&self) -> Point {
        (**self).pointer()
    }
}

/// Interior-mutable pointer sample.
///
/// Writes overwrite the stored point; there is no queue and no history. The
/// initial sample is the origin.
#[derive(Debug, Default)]
pub struct PointerCell {
    latest: Cell<Point>,
}

impl PointerCell {
    /// Creates a cell holding the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cell holding `point`.
    #[must_use]
    pub fn at(point: Point) -> Self {
        Self {
            latest: Cell::new(point),
        }
    }

    /// Replaces the stored sample.
    #[inline]
    pub fn set(&self, point: Point) {
        self.latest.set(point);
    }

    /// Returns the stored sample.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Point {
        self.latest.get()
    }
}

impl PointerSource for PointerCell {
    #[inline]
    fn pointer(&self) -> Point {
        self.latest.get()
    }
}
