// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative discovery of magnetic elements.
//!
//! Markup opts in with boolean presence attributes: a root container carries
//! `data-magnetic-root` and each displaced element beneath it carries
//! `data-magnetic-element`. Optional `data-magnetic-force` and
//! `data-magnetic-distance` attributes override the tuning per element.
//!
//! Roots may nest. An element belongs to its *nearest* ancestor root only, so
//! scanning an outer root skips elements that sit inside an inner root.

use alloc::string::String;
use alloc::vec::Vec;

use crate::config::coerce_number;
use crate::instance::MagnetOptions;

/// Attribute names used by [`discover`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Marks a root container.
    pub root_attribute: &'static str,
    /// Marks an element to displace.
    pub element_attribute: &'static str,
    /// Per-element force override.
    pub force_attribute: &'static str,
    /// Per-element distance override.
    pub distance_attribute: &'static str,
}

impl DiscoveryConfig {
    /// The `data-magnetic-*` attribute set.
    pub const DEFAULT: Self = Self {
        root_attribute: "data-magnetic-root",
        element_attribute: "data-magnetic-element",
        force_attribute: "data-magnetic-force",
        distance_attribute: "data-magnetic-distance",
    };
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Read-only view of a markup tree.
pub trait Markup {
    /// Node handle. Equality must mean node identity.
    type Node: Clone + PartialEq;

    /// Nodes carrying `attribute`, in document order.
    ///
    /// With `scope` set, only strict descendants of `scope` are returned;
    /// otherwise the whole document is searched.
    fn find_all(&self, scope: Option<&Self::Node>, attribute: &str) -> Vec<Self::Node>;

    /// The parent element of `node`, if any.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// The value of `attribute` on `node`, or `None` if absent.
    fn attribute(&self, node: &Self::Node, attribute: &str) -> Option<String>;
}

/// Scans every root in the document and returns construction options for
/// each element, grouped by root in document order.
#[must_use]
pub fn discover<M: Markup>(markup: &M, config: &DiscoveryConfig) -> Vec<MagnetOptions<M::Node>> {
    markup
        .find_all(None, config.root_attribute)
        .iter()
        .flat_map(|root| scan_root(markup, root, config))
        .collect()
}

/// Returns construction options for every element owned by `root`.
#[must_use]
pub fn scan_root<M: Markup>(
    markup: &M,
    root: &M::Node,
    config: &DiscoveryConfig,
) -> Vec<MagnetOptions<M::Node>> {
    markup
        .find_all(Some(root), config.element_attribute)
        .into_iter()
        .filter(|element| nearest_root(markup, element, config).as_ref() == Some(root))
        .map(|element| MagnetOptions {
            force: number_attribute(markup, &element, config.force_attribute),
            distance: number_attribute(markup, &element, config.distance_attribute),
            container: Some(root.clone()),
            element: Some(element),
        })
        .collect()
}

/// The closest proper ancestor of `node` carrying the root attribute.
#[must_use]
pub fn nearest_root<M: Markup>(
    markup: &M,
    node: &M::Node,
    config: &DiscoveryConfig,
) -> Option<M::Node> {
    let mut current = markup.parent(node);
    while let Some(candidate) = current {
        if markup.attribute(&candidate, config.root_attribute).is_some() {
            return Some(candidate);
        }
        current = markup.parent(&candidate);
    }
    None
}

fn number_attribute<M: Markup>(markup: &M, node: &M::Node, attribute: &str) -> Option<f64> {
    markup
        .attribute(node, attribute)
        .map(|text| coerce_number(&text))
}
