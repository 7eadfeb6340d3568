// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field model, smoothing integrator, and frame engine for pointer-attraction
//! ("magnetic") effects.
//!
//! `magnetic_core` displaces registered elements toward the pointer while the
//! pointer hovers their container, eases the motion with a single-pole
//! low-pass filter, and clears the displacement once it becomes negligible.
//! It is `no_std` compatible (with `alloc`) and knows nothing about the DOM:
//! hosts plug in through the [`Presenter`](backend::Presenter) trait and a
//! [`PointerSource`](pointer::PointerSource).
//!
//! # Architecture
//!
//! ```text
//!   Backend (tick source)
//!       │
//!       ▼
//!   FrameTick ──► Engine::frame()
//!                     │
//!                     ├─ measure: GeometryCache ◄── Presenter::measure()
//!                     │
//!                     └─ mutate:  field::displacement()
//!                                     │
//!                                     ▼
//!                                 Motion::step() ──► Presenter::translate()
//!                                                    Presenter::clear()
//! ```
//!
//! **[`engine`]**: registration API and the two-pass frame driver.
//!
//! **[`registry`]**: insertion-ordered arena of instances with stable
//! [`InstanceId`](registry::InstanceId) handles.
//!
//! **[`instance`]**: per-binding state, including the explicit
//! [`MotionPhase`](instance::MotionPhase) state machine.
//!
//! **[`field`]**: the pure geometry-to-displacement function.
//!
//! **[`motion`]**: the exponential smoothing integrator and settle test.
//!
//! **[`geometry`]**: per-frame memoization of container rectangles.
//!
//! **[`pointer`]**: injected pointer provider.
//!
//! **[`discovery`]**: declarative attribute scanning over an abstract markup
//! tree, with the nearest-root rule.
//!
//! **[`config`]**: parameter defaults and normalization.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-instance
//!   offset events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod field;
pub mod geometry;
pub mod instance;
pub mod motion;
pub mod pointer;
pub mod registry;
pub mod timing;
pub mod trace;

pub use kurbo;
