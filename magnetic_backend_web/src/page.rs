// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The page-wide [`Magnetic`] behind the JS entry points.
//!
//! Markup-declared and script-created instances share this one facade, so a
//! page has a single registry, one frame loop, and one `mousemove` listener.
//! It is created and started on first use and lives until the page unloads.

use core::cell::RefCell;

use wasm_bindgen::JsValue;

use magnetic_core::registry::InstanceId;

use crate::magnetic::Magnetic;

std::thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

struct Page {
    magnetic: Magnetic,
    scanned: bool,
}

impl Page {
    fn new() -> Result<Self, JsValue> {
        let mut magnetic = Magnetic::new()?;
        magnetic.start();
        Ok(Self {
            magnetic,
            scanned: false,
        })
    }
}

fn with_page<R>(f: impl FnOnce(&mut Page) -> Result<R, JsValue>) -> Result<R, JsValue> {
    PAGE.with(|slot| {
        let mut slot = slot.borrow_mut();
        let page = match slot.take() {
            Some(page) => page,
            None => Page::new()?,
        };
        f(slot.insert(page))
    })
}

/// Schedules the markup scan. Later calls do nothing.
pub(crate) fn bootstrap() -> Result<(), JsValue> {
    with_page(|page| {
        if page.scanned {
            return Ok(());
        }
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        page.magnetic.scan_when_parsed(&document)?;
        page.scanned = true;
        Ok(())
    })
}

pub(crate) fn create(options: &JsValue) -> Result<InstanceId, JsValue> {
    with_page(|page| page.magnetic.create_from_js(options))
}

/// `false` for stale handles, or if nothing was ever registered.
pub(crate) fn unregister(id: InstanceId) -> bool {
    PAGE.with(|slot| {
        slot.borrow()
            .as_ref()
            .is_some_and(|page| page.magnetic.unregister(id))
    })
}
