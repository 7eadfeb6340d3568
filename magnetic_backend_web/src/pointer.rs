// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Global pointer tracking.

use alloc::boxed::Box;
use alloc::rc::Rc;

use kurbo::Point;
use magnetic_core::pointer::PointerCell;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{EventTarget, MouseEvent};

/// Keeps a [`PointerCell`] up to date from `mousemove` events.
///
/// The listener is removed when the tracker is dropped.
pub struct PointerTracker {
    cell: Rc<PointerCell>,
    target: EventTarget,
    listener: Closure<dyn FnMut(MouseEvent)>,
}

impl core::fmt::Debug for PointerTracker {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PointerTracker")
            .field("latest", &self.cell.get())
            .finish_non_exhaustive()
    }
}

impl PointerTracker {
    /// Installs a `mousemove` listener on `target` (normally the window).
    ///
    /// # Errors
    ///
    /// Returns the JS exception if the listener cannot be added.
    pub fn install(target: &EventTarget) -> Result<Self, JsValue> {
        let cell = Rc::new(PointerCell::new());
        let writer = Rc::clone(&cell);
        let listener = Closure::wrap(Box::new(move |event: MouseEvent| {
            writer.set(client_point(&event));
        }) as Box<dyn FnMut(MouseEvent)>);
        target.add_event_listener_with_callback("mousemove", listener.as_ref().unchecked_ref())?;
        Ok(Self {
            cell,
            target: target.clone(),
            listener,
        })
    }

    /// The shared cell the engine reads from.
    #[must_use]
    pub fn cell(&self) -> &Rc<PointerCell> {
        &self.cell
    }
}

impl Drop for PointerTracker {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback("mousemove", self.listener.as_ref().unchecked_ref());
    }
}

fn client_point(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}
