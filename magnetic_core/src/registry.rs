// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Insertion-ordered instance arena.
//!
//! Instances are appended and addressed by [`InstanceId`]. Unregistering
//! leaves a tombstone in the slot rather than compacting, so ids stay stable
//! and iteration order never shifts. Slots are never reused, which means a
//! stale id can never alias a newer instance.

use alloc::vec::Vec;
use core::fmt;

use crate::instance::Instance;

/// A handle to an instance in a [`Registry`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(pub(crate) u32);

impl InstanceId {
    /// Rebuilds a handle from a raw slot index.
    ///
    /// Used for handles that crossed a boundary as plain numbers (recorded
    /// diagnostics, script callers). A handle built this way is only
    /// meaningful against the registry it came from.
    #[inline]
    #[must_use]
    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceId({})", self.0)
    }
}

/// Ordered collection of live instances.
#[derive(Clone, Debug)]
pub struct Registry<N> {
    slots: Vec<Option<Instance<N>>>,
    live: usize,
}

impl<N> Default for Registry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Registry<N> {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
        }
    }

    /// Appends an instance and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` instances have ever been registered.
    pub fn register(&mut self, instance: Instance<N>) -> InstanceId {
        let idx = u32::try_from(self.slots.len()).expect("instance registry exhausted");
        self.slots.push(Some(instance));
        self.live += 1;
        InstanceId(idx)
    }

    /// Removes an instance, leaving a tombstone. Returns `None` for stale
    /// handles.
    pub fn unregister(&mut self, id: InstanceId) -> Option<Instance<N>> {
        let taken = self.slots.get_mut(id.0 as usize)?.take();
        if taken.is_some() {
            self.live -= 1;
        }
        taken
    }

    /// Returns `true` if `id` refers to a live instance.
    #[must_use]
    pub fn contains(&self, id: InstanceId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the instance for `id`, if live.
    #[must_use]
    pub fn get(&self, id: InstanceId) -> Option<&Instance<N>> {
        self.slots.get(id.0 as usize)?.as_ref()
    }

    /// Returns the instance for `id` mutably, if live.
    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut Instance<N>> {
        self.slots.get_mut(id.0 as usize)?.as_mut()
    }

    /// Number of live instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if no instance is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live instances in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (InstanceId, &Instance<N>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|inst| (slot_id(i), inst)))
    }

    /// Live instances in registration order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (InstanceId, &mut Instance<N>)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|inst| (slot_id(i), inst)))
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "register() refuses to grow past u32::MAX slots"
)]
fn slot_id(i: usize) -> InstanceId {
    InstanceId(i as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use alloc::vec;

    fn inst(tag: u32) -> Instance<u32> {
        Instance::new(tag, tag + 100, None, None, &EngineConfig::DEFAULT)
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut reg = Registry::new();
        for tag in [3, 1, 2] {
            let _ = reg.register(inst(tag));
        }
        let order: Vec<u32> = reg.iter().map(|(_, i)| *i.container()).collect();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn duplicates_are_allowed() {
        let mut reg = Registry::new();
        let a = reg.register(inst(1));
        let b = reg.register(inst(1));
        assert_ne!(a, b);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn unregister_tombstones_without_shifting() {
        let mut reg = Registry::new();
        let a = reg.register(inst(1));
        let b = reg.register(inst(2));
        let c = reg.register(inst(3));

        assert!(reg.unregister(b).is_some());
        assert!(!reg.contains(b));
        assert_eq!(reg.len(), 2);

        let ids: Vec<InstanceId> = reg.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, c]);
        assert_eq!(reg.get(c).map(|i| *i.container()), Some(3));
    }

    #[test]
    fn stale_handles_stay_stale() {
        let mut reg = Registry::new();
        let a = reg.register(inst(1));
        let _ = reg.unregister(a);
        assert!(reg.unregister(a).is_none(), "double unregister is a no-op");

        let b = reg.register(inst(2));
        assert_ne!(a, b, "slots are never reused");
        assert!(reg.get(a).is_none());
        assert!(!reg.is_empty(), "the new instance is live");
    }
}
