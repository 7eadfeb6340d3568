// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame memoization of container rectangles.
//!
//! Bounding-rectangle queries force a layout flush on most hosts. Several
//! instances usually share a container, so the measurement pass asks the
//! cache first and only measures each distinct container once per frame.
//! The cache must be [cleared](GeometryCache::clear) between frames since
//! layout can change in between.

use alloc::vec::Vec;

use kurbo::Rect;

/// Container rectangles measured during the current frame, keyed by node
/// identity.
///
/// Lookups are linear: the number of distinct hovered containers in a frame
/// is tiny, and node handles only need `PartialEq`.
#[derive(Clone, Debug)]
pub struct GeometryCache<N> {
    entries: Vec<(N, Rect)>,
    hits: u32,
    misses: u32,
}

impl<N> Default for GeometryCache<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> GeometryCache<N> {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Drops all entries and counters, keeping the allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Number of distinct containers measured since the last clear.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been measured since the last clear.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups served from the cache since the last clear.
    #[must_use]
    pub const fn hits(&self) -> u32 {
        self.hits
    }

    /// Lookups that had to measure since the last clear.
    #[must_use]
    pub const fn misses(&self) -> u32 {
        self.misses
    }
}

impl<N: Clone + PartialEq> GeometryCache<N> {
    /// Returns the cached rectangle for `node`, or calls `measure`, stores,
    /// and returns its result.
    ///
    /// The boolean is `true` when the rectangle came from the cache.
    pub fn get_or_measure(&mut self, node: &N, measure: impl FnOnce(&N) -> Rect) -> (Rect, bool) {
        if let Some((_, rect)) = self.entries.iter().find(|(n, _)| n == node) {
            self.hits += 1;
            return (*rect, true);
        }
        let rect = measure(node);
        self.entries.push((node.clone(), rect));
        self.misses += 1;
        (rect, false)
    }
}
