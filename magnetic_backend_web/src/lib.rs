// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for magnetic.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`RafLoop`]: `requestAnimationFrame` tick source
//! - [`DomPresenter`]: element measurement and inline `transform` writes
//! - [`PointerTracker`]: global `mousemove` tracking into a
//!   [`PointerCell`](magnetic_core::pointer::PointerCell)
//! - [`DomMarkup`]: declarative discovery over the live document
//! - [`Magnetic`]: the facade tying them together
//!
//! Pages load the effect through two JS entry points that share one
//! page-wide [`Magnetic`]:
//!
//! - `bootstrapMagnetic()` registers every `data-magnetic-element` under a
//!   `data-magnetic-root` once the document is parsed.
//! - `magnetic({ root, element, force, distance })` registers one instance
//!   and returns its handle; `unregisterMagnetic(handle)` removes it.

#![no_std]

extern crate alloc;
extern crate std;

mod magnetic;
mod markup;
mod page;
mod pointer;
mod presenter;
mod raf;

pub use magnetic::Magnetic;
pub use magnetic_core::backend::Presenter;
pub use markup::DomMarkup;
pub use pointer::PointerTracker;
pub use presenter::{DomPresenter, translate3d};
pub use raf::RafLoop;

use magnetic_core::registry::InstanceId;
use wasm_bindgen::prelude::*;

/// Starts the page-wide effect and registers every `data-magnetic-element`
/// under a `data-magnetic-root` once the document is parsed.
///
/// Calling it again does nothing.
///
/// # Errors
///
/// Fails if there is no global `window`/`document` or a listener cannot be
/// installed.
#[wasm_bindgen(js_name = "bootstrapMagnetic")]
pub fn bootstrap() -> Result<(), JsValue> {
    page::bootstrap()
}

/// Registers one instance on the page-wide effect from
/// `{ root, element, force, distance }` and returns its handle.
///
/// See [`Magnetic::create_from_js`] for how the object is read.
///
/// # Errors
///
/// Throws `Error('parameter "root" should be a valid Element')` or the
/// `element` equivalent for invalid options, or the JS exception raised while
/// installing listeners.
#[wasm_bindgen(js_name = "magnetic")]
pub fn create(options: &JsValue) -> Result<u32, JsValue> {
    page::create(options).map(InstanceId::index)
}

/// Removes an instance created by `magnetic()` or the markup scan, clearing
/// any offset it still applies. Returns `false` for unknown handles.
#[wasm_bindgen(js_name = "unregisterMagnetic")]
pub fn unregister(handle: u32) -> bool {
    page::unregister(InstanceId::from_index(handle))
}
