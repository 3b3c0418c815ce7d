use std::ops::{Index, IndexMut};
use super::GenerationalId;

/// Free-list link value meaning "no free slot"
const NO_FREE_SLOT: u32 = u32::MAX;

/// One storage slot: either holds a value or links to the next free slot.
enum Slot<T> {
    Occupied(T),
    Free { next: u32 },
}

/// Slot-reuse container keyed by [`GenerationalId`].
///
/// Freed slots form an intrusive LIFO list: the most recently removed slot
/// is the first one handed out by the next `add`. New slots are appended
/// only when no freed slot is left. Indices are stable across unrelated
/// removals (no compaction).
///
/// The list does not bump generations: ids it returns always carry
/// generation 0, so an id kept after `remove` aliases whatever value later
/// reuses the slot. Callers that need stale-id detection must track
/// generations themselves (see [`GenerationalId::next_generation`]).
///
/// Not internally synchronized. Every owner in this crate wraps it in a
/// `Mutex` scoped to one kind of resource.
///
/// # Example
///
/// ```
/// use galaxy_3d_content::galaxy3d::utils::FreeList;
///
/// let mut list = FreeList::new();
/// let a = list.add("a");
/// let b = list.add("b");
/// list.remove(a);
/// let c = list.add("c");      // reuses a's slot
/// assert_eq!(c.index(), a.index());
/// assert_eq!(list[b], "b");
/// ```
pub struct FreeList<T> {
    slots: Vec<Slot<T>>,
    next_free: u32,
    len: u32,
}

impl<T> FreeList<T> {
    /// Create a new empty list
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_free: NO_FREE_SLOT,
            len: 0,
        }
    }

    /// Create a list with room for `capacity` slots before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            next_free: NO_FREE_SLOT,
            len: 0,
        }
    }

    /// Store a value, reusing the most recently freed slot if any.
    ///
    /// Never returns [`GenerationalId::INVALID`].
    pub fn add(&mut self, value: T) -> GenerationalId {
        let index = if self.next_free != NO_FREE_SLOT {
            let index = self.next_free;
            let slot = &mut self.slots[index as usize];
            match *slot {
                Slot::Free { next } => self.next_free = next,
                Slot::Occupied(_) => panic!("free list corrupted: slot {} is linked but occupied", index),
            }
            *slot = Slot::Occupied(value);
            index
        } else {
            let index = self.slots.len() as u32;
            assert!(
                index < GenerationalId::INDEX_MASK,
                "free list exhausted the {}-bit index space",
                GenerationalId::INDEX_BITS
            );
            self.slots.push(Slot::Occupied(value));
            index
        };
        self.len += 1;
        GenerationalId::new(index, 0)
    }

    /// Remove and return the value at `id`, pushing its slot on the free list.
    ///
    /// # Panics
    ///
    /// Panics if `id` is invalid, out of range, or already removed.
    pub fn remove(&mut self, id: GenerationalId) -> T {
        let index = self.checked_index(id);
        let slot = std::mem::replace(
            &mut self.slots[index],
            Slot::Free { next: self.next_free },
        );
        match slot {
            Slot::Occupied(value) => {
                self.next_free = index as u32;
                self.len -= 1;
                value
            }
            Slot::Free { next } => {
                // Restore the link before reporting so the list stays intact
                self.slots[index] = Slot::Free { next };
                panic!("free list: double remove of id {}", id);
            }
        }
    }

    /// Value at `id`, or `None` if the slot is free or out of range
    pub fn get(&self, id: GenerationalId) -> Option<&T> {
        if !id.is_valid() {
            return None;
        }
        match self.slots.get(id.index() as usize) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Mutable value at `id`, or `None` if the slot is free or out of range
    pub fn get_mut(&mut self, id: GenerationalId) -> Option<&mut T> {
        if !id.is_valid() {
            return None;
        }
        match self.slots.get_mut(id.index() as usize) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Whether `id` refers to an occupied slot
    pub fn contains(&self, id: GenerationalId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live values
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether no values are live
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots ever created (live + free)
    pub fn capacity(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Iterate over live values with their ids, in slot order
    pub fn iter(&self) -> impl Iterator<Item = (GenerationalId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| match slot {
            Slot::Occupied(value) => Some((GenerationalId::new(index as u32, 0), value)),
            Slot::Free { .. } => None,
        })
    }

    fn checked_index(&self, id: GenerationalId) -> usize {
        assert!(id.is_valid(), "free list: invalid id");
        let index = id.index() as usize;
        assert!(
            index < self.slots.len(),
            "free list: id {} out of range (capacity {})",
            id,
            self.slots.len()
        );
        index
    }
}

impl<T> Default for FreeList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<GenerationalId> for FreeList<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `id` is invalid, out of range, or refers to a freed slot.
    fn index(&self, id: GenerationalId) -> &T {
        let index = self.checked_index(id);
        match &self.slots[index] {
            Slot::Occupied(value) => value,
            Slot::Free { .. } => panic!("free list: access to removed id {}", id),
        }
    }
}

impl<T> IndexMut<GenerationalId> for FreeList<T> {
    fn index_mut(&mut self, id: GenerationalId) -> &mut T {
        let index = self.checked_index(id);
        match &mut self.slots[index] {
            Slot::Occupied(value) => value,
            Slot::Free { .. } => panic!("free list: access to removed id {}", id),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "free_list_tests.rs"]
mod tests;
