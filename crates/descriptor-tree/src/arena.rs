//! Slot arena with free-list recycling and generational ids.
//!
//! Every node of a descriptor tree lives in one [`Arena`] slot. Freed slots
//! go onto a free list and are reused by later inserts before the arena
//! grows. Each slot carries a generation counter that is bumped on removal,
//! so a [`NodeId`] kept past the removal of its node no longer resolves even
//! after the slot has been recycled.

use tracing::trace;

use crate::error::{DescriptorError, Result};

/// Capacity multiplier applied when the arena has no free slot left.
pub const GROWTH_FACTOR: f64 = 1.618;

const MIN_CAPACITY: usize = 4;

/// Stable identity of an arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Slot position inside the arena.
    pub fn index(self) -> usize {
        self.index as usize
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone)]
enum Slot<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32 },
}

impl<T> Slot<T> {
    fn generation(&self) -> u32 {
        match self {
            Slot::Occupied { generation, .. } | Slot::Vacant { generation } => *generation,
        }
    }
}

/// Slot store with O(1) amortized insert, remove and lookup by id.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots the arena can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of vacant slots waiting to be recycled.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Stores `value` in the most recently freed slot, or in a new slot at the
    /// end of the arena when none is free.
    ///
    /// Panics when the arena would exceed `u32::MAX` slots.
    pub fn insert(&mut self, value: T) -> NodeId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            let generation = slot.generation();
            *slot = Slot::Occupied { generation, value };
            return NodeId { index, generation };
        }

        if self.slots.len() == self.slots.capacity() {
            self.grow();
        }
        let index = u32::try_from(self.slots.len())
            .unwrap_or_else(|_| panic!("arena exhausted: more than u32::MAX slots"));
        self.slots.push(Slot::Occupied {
            generation: 0,
            value,
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    fn grow(&mut self) {
        let capacity = self.slots.capacity();
        let target = ((capacity as f64) * GROWTH_FACTOR).ceil() as usize;
        let target = target.max(capacity + 1).max(MIN_CAPACITY);
        trace!(from = capacity, to = target, "growing arena");
        self.slots.reserve_exact(target - self.slots.len());
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied { generation, value }) if *generation == id.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Occupied { generation, value }) if *generation == id.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Like [`Arena::get`], but reports a vacant or stale id as
    /// [`DescriptorError::InvalidId`].
    pub fn at(&self, id: NodeId) -> Result<&T> {
        self.get(id).ok_or(DescriptorError::InvalidId(id))
    }

    pub fn at_mut(&mut self, id: NodeId) -> Result<&mut T> {
        self.get_mut(id).ok_or(DescriptorError::InvalidId(id))
    }

    /// Frees the slot behind `id` and returns its value. The slot's generation
    /// is bumped so `id` stops resolving.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        let vacant = Slot::Vacant {
            generation: id.generation.wrapping_add(1),
        };
        let old = std::mem::replace(&mut self.slots[id.index()], vacant);
        self.free.push(id.index);
        self.len -= 1;
        match old {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    /// Iterates occupied slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Occupied { generation, value } => Some((
                    NodeId {
                        index: index as u32,
                        generation: *generation,
                    },
                    value,
                )),
                Slot::Vacant { .. } => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn removed_slot_is_recycled_before_growing() {
        let mut arena = Arena::new();
        let ids: Vec<_> = (0..10).map(|i| arena.insert(i)).collect();
        let capacity = arena.capacity();
        for id in &ids[..5] {
            assert!(arena.remove(*id).is_some());
        }
        assert_eq!(arena.len(), 5);
        assert_eq!(arena.free_count(), 5);
        for i in 0..5 {
            arena.insert(100 + i);
        }
        assert_eq!(arena.len(), 10);
        assert_eq!(arena.free_count(), 0);
        assert_eq!(arena.capacity(), capacity);
    }

    #[test]
    fn stale_id_does_not_resolve_after_recycling() {
        let mut arena = Arena::new();
        let old = arena.insert(1);
        arena.remove(old);
        let new = arena.insert(2);
        assert_eq!(old.index(), new.index());
        assert_ne!(old.generation(), new.generation());
        assert_eq!(arena.get(old), None);
        assert_eq!(arena.at(old), Err(DescriptorError::InvalidId(old)));
        assert_eq!(arena.get(new), Some(&2));
    }

    #[test]
    fn double_remove_is_none() {
        let mut arena = Arena::new();
        let id = arena.insert(1);
        assert_eq!(arena.remove(id), Some(1));
        assert_eq!(arena.remove(id), None);
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.free_count(), 1);
    }

    #[test]
    fn capacity_grows_geometrically() {
        let mut arena = Arena::new();
        let mut reallocations = 0;
        let mut capacity = arena.capacity();
        for i in 0..1000 {
            arena.insert(i);
            if arena.capacity() != capacity {
                reallocations += 1;
                capacity = arena.capacity();
            }
        }
        assert!(arena.capacity() >= 1000);
        // Linear growth would need hundreds of reallocations.
        assert!(reallocations < 20, "reallocated {reallocations} times");
    }

    #[test]
    fn iter_skips_vacant_slots() {
        let mut arena = Arena::new();
        let a = arena.insert('a');
        let b = arena.insert('b');
        let c = arena.insert('c');
        arena.remove(b);
        let items: Vec<_> = arena.iter().collect();
        assert_eq!(items, vec![(a, &'a'), (c, &'c')]);
    }

    #[test]
    fn get_mut_updates_value() {
        let mut arena = Arena::new();
        let id = arena.insert(String::from("x"));
        arena.at_mut(id).unwrap().push('y');
        assert_eq!(arena.at(id).unwrap(), "xy");
    }
}
