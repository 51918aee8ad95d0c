//! Stable entity identifiers and the arena that owns them.
//!
//! An [`EntityId`] is a plain 32-bit index into an [`EntityArena`]. Slots are
//! never reused while the arena lives: removing an entity leaves a hole, so an
//! id recorded in a replay keeps pointing at the same entity (or at nothing)
//! for the whole level. Starting a new level means building a new arena, which
//! is what invalidates every id from the previous one.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// EntityId
// ---------------------------------------------------------------------------

/// A stable entity identifier: the slot index in its [`EntityArena`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Construct an `EntityId` from a raw slot index.
    #[inline]
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// The slot index.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// EntityArena
// ---------------------------------------------------------------------------

/// Owns the entities of one level and hands out stable [`EntityId`]s.
///
/// Lookup is a direct index, O(1). Ids are assigned in insertion order
/// starting at 0, which keeps them deterministic across replays of the same
/// level.
#[derive(Debug, Clone)]
pub struct EntityArena<T> {
    slots: Vec<Option<T>>,
    live: usize,
}

impl<T> EntityArena<T> {
    /// Create a new, empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
        }
    }

    /// Insert a value and return its id.
    ///
    /// # Panics
    ///
    /// Panics if every `u32` id has already been handed out.
    pub fn insert(&mut self, value: T) -> EntityId {
        let id = slot_id(self.slots.len());
        self.slots.push(Some(value));
        self.live += 1;
        id
    }

    /// Remove the entity with the given id, returning it.
    ///
    /// The slot stays reserved; the id is never handed out again.
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let removed = self.slots.get_mut(id.index() as usize)?.take();
        if removed.is_some() {
            self.live -= 1;
        }
        removed
    }

    /// Shared access to an entity.
    #[inline]
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.slots.get(id.index() as usize)?.as_ref()
    }

    /// Mutable access to an entity.
    #[inline]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slots.get_mut(id.index() as usize)?.as_mut()
    }

    /// Whether the id refers to a live entity.
    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Ids of all live entities in ascending order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Iterate live entities in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (slot_id(i), v)))
    }

    /// Iterate live entities mutably in ascending id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|v| (slot_id(i), v)))
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether no entity is alive.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Drop every entity and restart ids at 0.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.live = 0;
    }
}

/// Id of the slot at `index`. `insert` never grows past `u32`, so every
/// existing slot converts.
fn slot_id(index: usize) -> EntityId {
    match u32::try_from(index) {
        Ok(index) => EntityId::new(index),
        Err(_) => panic!("entity arena is full: slot {index} has no u32 id"),
    }
}

impl<T> Default for EntityArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
