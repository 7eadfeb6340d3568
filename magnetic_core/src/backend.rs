// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for host integrations.
//!
//! The engine is host-agnostic. Each backend provides the following pieces:
//!
//! - **Tick source**: calls [`Engine::frame`] once per display frame (e.g.
//!   from `requestAnimationFrame`). Not abstracted by a trait because setup
//!   and lifecycle differ fundamentally across hosts.
//!
//! - **Pointer feed**: writes pointer-move positions into a
//!   [`PointerCell`](crate::pointer::PointerCell) shared with the engine.
//!
//! - **Hover feed**: forwards container enter/leave notifications to
//!   [`Engine::set_hovering`].
//!
//! - **Presenter**: implements [`Presenter`] to measure nodes and write or
//!   clear element offsets.
//!
//! # Crate boundaries
//!
//! `magnetic_core` owns the data model, the field model, the integrator, and
//! this contract module. Backend crates depend on `magnetic_core` and provide
//! host glue.
//!
//! [`Engine::frame`]: crate::engine::Engine::frame
//! [`Engine::set_hovering`]: crate::engine::Engine::set_hovering

use kurbo::{Rect, Vec2};

/// Reads geometry from and writes offsets to a host presentation tree.
///
/// DOM-based presenters and test doubles both implement this trait, so the
/// frame driver can be exercised without a browser.
///
/// # Frame loop pseudocode
///
/// ```rust,ignore
/// fn on_frame(tick: FrameTick) {
///     // Pointer and hover listeners have already updated engine state.
///     let stats = engine.frame(&tick, &mut presenter, &mut tracer);
/// }
/// ```
pub trait Presenter {
    /// Host node handle. Equality must mean node identity.
    type Node: Clone + PartialEq;

    /// Returns the node's bounding rectangle in viewport coordinates.
    fn measure(&mut self, node: &Self::Node) -> Rect;

    /// Displaces `node` by `offset` (a translation, z fixed at 0).
    fn translate(&mut self, node: &Self::Node, offset: Vec2);

    /// Removes any displacement previously applied to `node`.
    fn clear(&mut self, node: &Self::Node);

    /// Makes `node` able to carry a transform. Called once at construction.
    ///
    /// The default does nothing; the DOM presenter switches inline boxes to
    /// `inline-block`.
    fn prepare_element(&mut self, node: &Self::Node) {
        _ = node;
    }
}
