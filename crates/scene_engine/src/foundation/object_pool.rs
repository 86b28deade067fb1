//! Generational object pool
//!
//! Dense slot storage handing out index + generation handles. Destroying a
//! slot bumps its generation so every outstanding handle to it stops
//! validating, and pushes the slot onto an intrusive free list for O(1)
//! reuse.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use thiserror::Error;

/// Sentinel index carried by handles that point nowhere
pub const INVALID_INDEX: u32 = u32::MAX;

/// Generation assigned to freshly grown slots
const FIRST_GENERATION: u32 = 1;

/// Typed index + generation handle into an [`ObjectPool`]
///
/// Handles are plain values: copying one confers no ownership and a handle
/// may outlive the object it names, in which case it simply fails
/// validation.
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Handle that never validates
    pub const INVALID: Self = Self::new(INVALID_INDEX, 0);

    /// Build a handle from raw parts
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _phantom: PhantomData,
        }
    }

    /// Slot index
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Slot generation at the time the handle was issued
    pub const fn generation(self) -> u32 {
        self.generation
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

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Pool errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// Handle is out of range, names a dead slot, or carries a stale generation
    #[error("invalid handle: index {index}, generation {generation}")]
    InvalidHandle {
        /// Index carried by the rejected handle
        index: u32,
        /// Generation carried by the rejected handle
        generation: u32,
    },
}

impl PoolError {
    fn invalid<T>(handle: Handle<T>) -> Self {
        Self::InvalidHandle {
            index: handle.index,
            generation: handle.generation,
        }
    }
}

struct Slot<T> {
    generation: u32,
    free_next: u32,
    value: Option<T>,
}

impl<T> Slot<T> {
    const fn is_alive(&self) -> bool {
        self.value.is_some()
    }
}

/// Dense generational pool
pub struct ObjectPool<T> {
    slots: Vec<Slot<T>>,
    free_head: u32,
    alive_count: usize,
}

impl<T> ObjectPool<T> {
    /// Create an empty pool
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: INVALID_INDEX,
            alive_count: 0,
        }
    }

    /// Create an empty pool with room for `capacity` slots before growing
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: INVALID_INDEX,
            alive_count: 0,
        }
    }

    /// Store `value`, reusing a freed slot when one is available
    pub fn emplace(&mut self, value: T) -> Handle<T> {
        let index = self.allocate_slot();
        let slot = &mut self.slots[index as usize];
        slot.value = Some(value);
        self.alive_count += 1;
        Handle::new(index, slot.generation)
    }

    /// Destroy the object behind `handle` and return it
    ///
    /// The slot's generation is bumped and the slot joins the free list. An
    /// invalid handle leaves the pool untouched.
    pub fn destroy(&mut self, handle: Handle<T>) -> Result<T, PoolError> {
        if !self.valid(handle) {
            return Err(PoolError::invalid(handle));
        }

        let free_head = self.free_head;
        let slot = &mut self.slots[handle.index as usize];
        let value = slot.value.take().ok_or_else(|| PoolError::invalid(handle))?;
        slot.generation = slot.generation.wrapping_add(1);
        slot.free_next = free_head;
        self.free_head = handle.index;
        self.alive_count -= 1;

        Ok(value)
    }

    /// Drop every live object and rebuild the free list from scratch
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }

        // Lowest index ends up at the head so reuse starts from the front
        self.free_head = INVALID_INDEX;
        for index in (0..self.slots.len()).rev() {
            self.slots[index].free_next = self.free_head;
            self.free_head = index as u32;
        }

        self.alive_count = 0;
    }

    /// True when `handle` names a live slot with a matching generation
    pub fn valid(&self, handle: Handle<T>) -> bool {
        self.slots
            .get(handle.index as usize)
            .is_some_and(|slot| slot.is_alive() && slot.generation == handle.generation)
    }

    /// Borrow the object behind `handle`
    pub fn get(&self, handle: Handle<T>) -> Result<&T, PoolError> {
        self.try_get(handle).ok_or_else(|| PoolError::invalid(handle))
    }

    /// Mutably borrow the object behind `handle`
    pub fn get_mut(&mut self, handle: Handle<T>) -> Result<&mut T, PoolError> {
        self.try_get_mut(handle).ok_or_else(|| PoolError::invalid(handle))
    }

    /// Borrow the object behind `handle`, or `None` if it is invalid
    pub fn try_get(&self, handle: Handle<T>) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    /// Mutably borrow the object behind `handle`, or `None` if it is invalid
    pub fn try_get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Whether the slot at `index` currently holds an object
    pub fn alive_at(&self, index: u32) -> bool {
        self.slots
            .get(index as usize)
            .is_some_and(Slot::is_alive)
    }

    /// Raw-index access, bypassing generation checks
    pub fn at_index(&self, index: u32) -> Option<&T> {
        self.slots.get(index as usize)?.value.as_ref()
    }

    /// Raw-index mutable access, bypassing generation checks
    pub fn at_index_mut(&mut self, index: u32) -> Option<&mut T> {
        self.slots.get_mut(index as usize)?.value.as_mut()
    }

    /// Current generation of the slot at `index`
    pub fn generation_at(&self, index: u32) -> Option<u32> {
        self.slots.get(index as usize).map(|slot| slot.generation)
    }

    /// Handle for the live object at `index`
    pub fn handle_at(&self, index: u32) -> Option<Handle<T>> {
        let slot = self.slots.get(index as usize)?;
        slot.is_alive().then(|| Handle::new(index, slot.generation))
    }

    /// Number of live objects
    pub const fn len(&self) -> usize {
        self.alive_count
    }

    /// True when no object is alive
    pub const fn is_empty(&self) -> bool {
        self.alive_count == 0
    }

    /// Size of the index space (live and free slots)
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Iterate live objects in index order
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (Handle::new(index as u32, slot.generation), value))
        })
    }

    fn allocate_slot(&mut self) -> u32 {
        if self.free_head != INVALID_INDEX {
            let index = self.free_head;
            let slot = &mut self.slots[index as usize];
            self.free_head = slot.free_next;
            slot.free_next = INVALID_INDEX;
            return index;
        }

        let index = u32::try_from(self.slots.len())
            .ok()
            .filter(|&index| index != INVALID_INDEX)
            .unwrap_or_else(|| panic!("object pool index space exhausted"));
        self.slots.push(Slot {
            generation: FIRST_GENERATION,
            free_next: INVALID_INDEX,
            value: None,
        });
        index
    }
}

impl<T> Default for ObjectPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("len", &self.alive_count)
            .field("capacity", &self.slots.len())
            .finish()
    }
}
