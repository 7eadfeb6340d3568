// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Markup`] over the live document.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use magnetic_core::discovery::Markup;
use wasm_bindgen::JsCast as _;
use web_sys::{Document, Element, NodeList};

/// Read-only view of a [`Document`] for declarative discovery.
#[derive(Clone, Debug)]
pub struct DomMarkup {
    document: Document,
}

impl DomMarkup {
    /// Wraps `document`.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl Markup for DomMarkup {
    type Node = Element;

    fn find_all(&self, scope: Option<&Element>, attribute: &str) -> Vec<Element> {
        let selector = attribute_selector(attribute);
        let found = match scope {
            Some(scope) => scope.query_selector_all(&selector),
            None => self.document.query_selector_all(&selector),
        };
        found.map(|list| elements(&list)).unwrap_or_default()
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn attribute(&self, node: &Element, attribute: &str) -> Option<String> {
        node.get_attribute(attribute)
    }
}

/// `[name]` presence selector for an attribute.
fn attribute_selector(attribute: &str) -> String {
    format!("[{attribute}]")
}

fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}
