// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM measurement and inline-transform writes.
//!
//! Rectangles come from `getBoundingClientRect()` (viewport coordinates, the
//! same space as `MouseEvent.clientX/Y`). Offsets are written to the inline
//! `transform` property and removed entirely on settle, so a stylesheet
//! transform on the element takes over again once it is at rest.

use alloc::format;
use alloc::string::String;

use kurbo::{Rect, Vec2};
use magnetic_core::backend::Presenter;
use wasm_bindgen::JsCast as _;
use web_sys::{CssStyleDeclaration, DomRect, Element, HtmlElement, SvgElement, Window};

/// Applies engine output to live DOM elements.
///
/// Any [`Element`] with an inline style (`HtmlElement` or `SvgElement`) can be
/// displaced. Elements without one are measured but never written to.
pub struct DomPresenter {
    window: Option<Window>,
}

impl core::fmt::Debug for DomPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomPresenter")
            .field("has_window", &self.window.is_some())
            .finish()
    }
}

impl Default for DomPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl DomPresenter {
    /// Creates a presenter bound to the global `window`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            window: web_sys::window(),
        }
    }

    fn computed_display(&self, el: &Element) -> Option<String> {
        let computed = self.window.as_ref()?.get_computed_style(el).ok()??;
        computed.get_property_value("display").ok()
    }
}

impl Presenter for DomPresenter {
    type Node = Element;

    fn measure(&mut self, node: &Element) -> Rect {
        rect_from_dom(&node.get_bounding_client_rect())
    }

    fn translate(&mut self, node: &Element, offset: Vec2) {
        if let Some(style) = inline_style(node) {
            let _ = style.set_property("transform", &translate3d(offset));
        }
    }

    fn clear(&mut self, node: &Element) {
        if let Some(style) = inline_style(node) {
            let _ = style.remove_property("transform");
        }
    }

    /// CSS transforms do not apply to inline boxes, so a computed
    /// `display: inline` is switched to `inline-block`.
    fn prepare_element(&mut self, node: &Element) {
        if self.computed_display(node).as_deref() == Some("inline")
            && let Some(style) = inline_style(node)
        {
            let _ = style.set_property("display", "inline-block");
        }
    }
}

/// The inline style declaration of `el`, if its element type has one.
fn inline_style(el: &Element) -> Option<CssStyleDeclaration> {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        return Some(html.style());
    }
    el.dyn_ref::<SvgElement>().map(SvgElement::style)
}

fn rect_from_dom(r: &DomRect) -> Rect {
    Rect::new(r.left(), r.top(), r.right(), r.bottom())
}

/// Formats an offset as a CSS `translate3d()` value.
#[must_use]
pub fn translate3d(offset: Vec2) -> String {
    format!("translate3d({}px, {}px, 0)", offset.x, offset.y)
}
