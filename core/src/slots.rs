//! Generational slot storage.
//!
//! [`SlotMap`] hands out [`SlotHandle`]s made of a slot index and a
//! generation. Removing a value bumps the slot's generation and pushes the
//! index onto a free list, so a handle held across a removal can never reach
//! whatever later reuses the slot.

use std::fmt;

/// Handle to a value stored in a [`SlotMap`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotHandle {
    index: u32,
    generation: u32,
}

impl SlotHandle {
    /// Returns the slot index of this handle.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the generation this handle was issued for.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for SlotHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for SlotHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Densely indexed storage with stale-handle detection.
pub struct SlotMap<T> {
    slots: Vec<Slot<T>>,
    /// Free list of recyclable indices (LIFO stack).
    free_list: Vec<u32>,
    len: usize,
}

impl<T> Default for SlotMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SlotMap<T> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Stores `value` and returns its handle.
    pub fn insert(&mut self, value: T) -> SlotHandle {
        self.insert_with(|_| value)
    }

    /// Stores the value built by `f`, which receives the handle it will live under.
    pub fn insert_with(&mut self, f: impl FnOnce(SlotHandle) -> T) -> SlotHandle {
        self.len += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            let handle = SlotHandle {
                index,
                generation: slot.generation,
            };
            slot.value = Some(f(handle));
            handle
        } else {
            let handle = SlotHandle {
                index: self.slots.len() as u32,
                generation: 0,
            };
            self.slots.push(Slot {
                generation: 0,
                value: Some(f(handle)),
            });
            handle
        }
    }

    /// Removes and returns the value behind `handle`.
    ///
    /// Returns `None` for stale or already-removed handles.
    pub fn remove(&mut self, handle: SlotHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(handle.index);
        self.len -= 1;
        Some(value)
    }

    /// Returns `true` if `handle` still refers to a live value.
    pub fn contains(&self, handle: SlotHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: SlotHandle) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, handle: SlotHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates live values in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotHandle, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    SlotHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut map = SlotMap::new();
        let a = map.insert("a");
        let b = map.insert("b");
        assert_eq!(map.get(a), Some(&"a"));
        assert_eq!(map.get(b), Some(&"b"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_remove_twice_is_none() {
        let mut map = SlotMap::new();
        let a = map.insert(1);
        assert_eq!(map.remove(a), Some(1));
        assert_eq!(map.remove(a), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_stale_handle_does_not_alias_reused_slot() {
        let mut map = SlotMap::new();
        let old = map.insert(1);
        map.remove(old);
        let new = map.insert(2);

        // Same index, different generation
        assert_eq!(new.index(), old.index());
        assert_ne!(new.generation(), old.generation());
        assert_eq!(map.get(old), None);
        assert_eq!(map.get(new), Some(&2));
        assert_eq!(map.remove(old), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_insert_with_sees_own_handle() {
        let mut map = SlotMap::new();
        let handle = map.insert_with(|h| h);
        assert_eq!(map.get(handle), Some(&handle));
    }

    #[test]
    fn test_iter_skips_removed() {
        let mut map = SlotMap::new();
        let a = map.insert('a');
        let _b = map.insert('b');
        map.remove(a);
        let values: Vec<char> = map.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec!['b']);
    }
}
