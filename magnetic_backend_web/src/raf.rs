// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser frame clock.
//!
//! The magnet effect advances one integrator step per displayed frame, so
//! the page drives it from `requestAnimationFrame`. The callback's
//! [`DOMHighResTimeStamp`][mdn] is forwarded as
//! [`FrameTick::timestamp_ms`] untouched; the engine only logs it.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/DOMHighResTimeStamp

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use magnetic_core::timing::FrameTick;

// Bound as globals so a running loop never looks up `window`.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

/// Calls a closure with a fresh [`FrameTick`] on every animation frame.
///
/// A new loop is idle. [`start`](Self::start) schedules the first frame and
/// each frame schedules the next, until [`stop`](Self::stop) or drop. A
/// stopped loop can be started again; frame numbering continues where it
/// left off.
pub struct RafLoop {
    inner: Rc<RafInner>,
}

type RafClosure = Closure<dyn FnMut(f64)>;

struct RafInner {
    /// Installed on first start and reused on every later start. It holds an
    /// `Rc` back to this struct, so it must be taken out on drop.
    closure: RefCell<Option<RafClosure>>,
    on_frame: RefCell<Box<dyn FnMut(FrameTick)>>,
    next_frame: Cell<u64>,
    running: Cell<bool>,
    /// Handle of the pending request, for `cancelAnimationFrame`.
    pending: Cell<i32>,
}

impl RafInner {
    fn request_next(&self, closure: &RafClosure) {
        self.pending
            .set(request_animation_frame(closure.as_ref().unchecked_ref()));
    }

    fn fire(&self, timestamp_ms: f64) {
        let frame_index = self.next_frame.get();
        self.next_frame.set(frame_index + 1);
        self.on_frame.borrow_mut()(FrameTick::new(frame_index, timestamp_ms));
    }
}

impl RafLoop {
    /// Wraps `on_frame` in an idle loop.
    pub fn new(on_frame: impl FnMut(FrameTick) + 'static) -> Self {
        Self {
            inner: Rc::new(RafInner {
                closure: RefCell::new(None),
                on_frame: RefCell::new(Box::new(on_frame)),
                next_frame: Cell::new(0),
                running: Cell::new(false),
                pending: Cell::new(0),
            }),
        }
    }

    /// Schedules the next frame. Does nothing while running.
    pub fn start(&self) {
        if self.inner.running.replace(true) {
            return;
        }

        if let Some(closure) = &*self.inner.closure.borrow() {
            self.inner.request_next(closure);
            return;
        }

        let inner = Rc::clone(&self.inner);
        let closure: RafClosure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            if !inner.running.get() {
                return;
            }
            inner.fire(timestamp_ms);
            // `on_frame` may have stopped the loop.
            if inner.running.get()
                && let Some(closure) = &*inner.closure.borrow()
            {
                inner.request_next(closure);
            }
        }) as Box<dyn FnMut(f64)>);

        self.inner.request_next(&closure);
        *self.inner.closure.borrow_mut() = Some(closure);
    }

    /// Cancels the pending frame. Does nothing while stopped.
    pub fn stop(&self) {
        if self.inner.running.replace(false) {
            cancel_animation_frame(self.inner.pending.get());
        }
    }

    /// Whether a frame is scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Frames delivered since construction.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.inner.next_frame.get()
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.stop();
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for RafLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafLoop")
            .field("running", &self.inner.running.get())
            .field("frames", &self.inner.next_frame.get())
            .finish_non_exhaustive()
    }
}
