//! Generational slot storage for track instances
//!
//! Every tile and prop instance lives in a [`Store`] for its whole lifetime,
//! whether it is currently active on the track or parked in a pool. Access
//! goes through [`Handle`]s carrying a generation word: removing an instance
//! (or reusing its slot) bumps the generation, so any handle still floating
//! around in the active list, the prop map, or a pool simply stops resolving
//! instead of touching a dead instance.

use std::marker::PhantomData;

/// Generational handle to an instance in a [`Store`]
///
/// Handles are cheap to copy and safe to hold across destruction: a stale
/// handle dereferences to `None`, never to a recycled stranger.
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Slot index, for diagnostics only
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> std::hash::Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot store with generation-checked access
pub struct Store<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> Store<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Insert a value, returning a handle valid until the value is removed
    pub fn insert(&mut self, value: T) -> Handle<T> {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return Handle {
                index,
                generation: slot.generation,
                _marker: PhantomData,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        Handle {
            index,
            generation: 0,
            _marker: PhantomData,
        }
    }

    /// Resolve a handle, or `None` if it has gone stale
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    /// Mutable variant of [`Store::get`]
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Check whether a handle still resolves
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.get(handle).is_some()
    }

    /// Remove a value, invalidating every copy of its handle
    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        // Bump so outstanding handles die immediately, not on slot reuse
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        Some(value)
    }

    /// Number of live values
    pub fn len(&self) -> usize {
        self.live
    }

    /// Check if the store holds no live values
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}
