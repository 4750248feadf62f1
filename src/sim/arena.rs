//! Dense entity storage with stable handles
//!
//! Entities are never removed from the backing `Vec` mid-tick. Removal sets a
//! tombstone; `compact` drops tombstoned slots once the tick is finished.
//! Slots stay sorted by id because ids are handed out monotonically.

use serde::{Deserialize, Serialize};

/// Stable handle for an entity, unique for the whole session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

#[derive(Debug, Clone)]
struct Slot<T> {
    id: EntityId,
    removed: bool,
    value: T,
}

/// Arena of one entity kind
#[derive(Debug, Clone)]
pub struct EntityArena<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Default for EntityArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EntityArena<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Append an entity. Ids must arrive in increasing order.
    pub fn insert(&mut self, id: EntityId, value: T) {
        debug_assert!(
            self.slots.last().is_none_or(|s| s.id < id),
            "entity ids must be inserted in increasing order"
        );
        self.slots.push(Slot {
            id,
            removed: false,
            value,
        });
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.slots.binary_search_by_key(&id, |s| s.id).ok()
    }

    /// Tombstone an entity. Returns `true` only the first time.
    pub fn remove(&mut self, id: EntityId) -> bool {
        match self.index_of(id) {
            Some(idx) if !self.slots[idx].removed => {
                self.slots[idx].removed = true;
                true
            }
            _ => false,
        }
    }

    /// Tombstone every live entity matching `pred`, returning how many
    pub fn remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let mut count = 0;
        for slot in self.slots.iter_mut().filter(|s| !s.removed) {
            if pred(&slot.value) {
                slot.removed = true;
                count += 1;
            }
        }
        count
    }

    pub fn is_live(&self, id: EntityId) -> bool {
        self.index_of(id).is_some_and(|idx| !self.slots[idx].removed)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        let idx = self.index_of(id)?;
        let slot = &self.slots[idx];
        (!slot.removed).then_some(&slot.value)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        let idx = self.index_of(id)?;
        let slot = &mut self.slots[idx];
        (!slot.removed).then_some(&mut slot.value)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| !s.removed).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.removed)
    }

    /// Live entities in id order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots
            .iter()
            .filter(|s| !s.removed)
            .map(|s| (s.id, &s.value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.slots
            .iter_mut()
            .filter(|s| !s.removed)
            .map(|s| (s.id, &mut s.value))
    }

    /// Snapshot of live ids, safe to walk while removing
    pub fn ids(&self) -> Vec<EntityId> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Drop tombstoned slots. Returns the number dropped.
    pub fn compact(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|s| !s.removed);
        before - self.slots.len()
    }

    /// Backing slot count, tombstones included
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_with(values: &[i32]) -> EntityArena<i32> {
        let mut arena = EntityArena::new();
        for (i, v) in values.iter().enumerate() {
            arena.insert(EntityId(i as u32 + 1), *v);
        }
        arena
    }

    #[test]
    fn remove_is_idempotent() {
        let mut arena = arena_with(&[10, 20, 30]);
        assert!(arena.remove(EntityId(2)));
        assert!(!arena.remove(EntityId(2)));
        assert!(!arena.remove(EntityId(99)));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn tombstoned_entities_are_skipped_until_compaction() {
        let mut arena = arena_with(&[10, 20, 30]);
        arena.remove(EntityId(1));

        assert!(arena.get(EntityId(1)).is_none());
        assert!(!arena.is_live(EntityId(1)));
        assert_eq!(arena.iter().map(|(_, v)| *v).collect::<Vec<_>>(), vec![20, 30]);
        assert_eq!(arena.slot_count(), 3);

        assert_eq!(arena.compact(), 1);
        assert_eq!(arena.slot_count(), 2);
        assert_eq!(arena.get(EntityId(3)), Some(&30));
    }

    #[test]
    fn ids_snapshot_survives_removal_during_walk() {
        let mut arena = arena_with(&[1, 2, 3, 4]);
        for id in arena.ids() {
            if arena.get(id).is_some_and(|v| v % 2 == 0) {
                arena.remove(id);
            }
        }
        assert_eq!(arena.iter().map(|(_, v)| *v).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn remove_where_counts_only_live_matches() {
        let mut arena = arena_with(&[5, 50, 500]);
        arena.remove(EntityId(3));
        assert_eq!(arena.remove_where(|v| *v > 10), 1);
        assert!(!arena.is_empty());
        assert_eq!(arena.len(), 1);
    }
}
