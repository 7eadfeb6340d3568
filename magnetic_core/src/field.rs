// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry-to-displacement field model.
//!
//! Each axis is handled independently with a "virtual extent": the element's
//! extent widened by twice the gap between the element and the container on
//! the side the pointer is on. The attenuation `1 - extent / virtual` is
//! strongest when the element sits deep inside a roomy container and fades
//! to nothing when the element fills the container on that side.

use kurbo::{Point, Rect, Vec2};

/// Raw displacement for an element when the pointer is at `pointer`.
///
/// `element` and `container` are viewport-space bounding rectangles;
/// `distance` scales the result and may be negative (repulsion) or zero.
/// An axis whose scaled value is not finite (an infinite `distance`) has no
/// pull.
#[must_use]
pub fn displacement(pointer: Point, element: Rect, container: Rect, distance: f64) -> Vec2 {
    let x = axis(
        pointer.x,
        (element.x0, element.x1),
        (container.x0, container.x1),
    );
    let y = axis(
        pointer.y,
        (element.y0, element.y1),
        (container.y0, container.y1),
    );
    Vec2::new(finite_or_zero(x * distance), finite_or_zero(y * distance))
}

#[inline]
fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// One axis of [`displacement`], before the distance multiplier.
///
/// `element` and `container` are `(near, far)` edge pairs.
#[must_use]
pub fn axis(pointer: f64, element: (f64, f64), container: (f64, f64)) -> f64 {
    let (near, far) = element;
    let extent = far - near;
    let center = near + extent / 2.0;

    let margin = if pointer < center {
        near - container.0
    } else {
        container.1 - far
    };
    let virtual_extent = extent + margin * 2.0;

    // A zero-size element flush with a zero-size gap has no field.
    if virtual_extent == 0.0 {
        return 0.0;
    }

    (pointer - center) * (1.0 - extent / virtual_extent)
}
