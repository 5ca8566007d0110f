//! Typed arena and bounded entity registries
//!
//! Entities are allocated once into an [`Arena`] and never freed
//! individually; the whole arena goes away with its shader. A [`Registry`]
//! is the ordered, fixed-capacity list a parent keeps of its children.
//!
//! Every arena carries an owner id, and so does every handle it hands out.
//! Arenas that belong to one shader share an id; a handle is only resolved
//! by an arena with the same owner.

use a2xx_core::{AsmError, RegistryKind, Result};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Index;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_OWNER: AtomicU32 = AtomicU32::new(1);

/// Fresh owner id for a group of arenas
pub fn next_owner() -> u32 {
    NEXT_OWNER.fetch_add(1, Ordering::Relaxed)
}

/// Stable reference to an entity in an [`Arena`]
pub struct Handle<T> {
    owner: u32,
    index: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(owner: u32, index: u32) -> Self {
        Self {
            owner,
            index,
            _marker: PhantomData,
        }
    }

    /// Position of the entity in its arena
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Id of the arena group that issued this handle
    pub fn owner(self) -> u32 {
        self.owner
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
        self.owner == other.owner && self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// Append-only storage
#[derive(Debug, Clone)]
pub struct Arena<T> {
    owner: u32,
    items: Vec<T>,
}

impl<T> Arena<T> {
    /// Arena with an owner id of its own
    pub fn new() -> Self {
        Self::with_owner(next_owner())
    }

    /// Arena that resolves handles issued under `owner`
    pub fn with_owner(owner: u32) -> Self {
        Self {
            owner,
            items: Vec::new(),
        }
    }

    pub fn owner(&self) -> u32 {
        self.owner
    }

    pub fn alloc(&mut self, value: T) -> Handle<T> {
        let index = self.items.len() as u32;
        self.items.push(value);
        Handle::new(self.owner, index)
    }

    /// Whether `handle` was issued by this arena and is in range
    pub fn contains(&self, handle: Handle<T>) -> bool {
        handle.owner == self.owner && handle.index() < self.items.len()
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        if handle.owner != self.owner {
            return None;
        }
        self.items.get(handle.index())
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        if handle.owner != self.owner {
            return None;
        }
        self.items.get_mut(handle.index())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Panics on a handle from another owner; use [`Arena::get`] for handles
/// of unknown origin.
impl<T> Index<Handle<T>> for Arena<T> {
    type Output = T;

    fn index(&self, handle: Handle<T>) -> &T {
        assert_eq!(handle.owner, self.owner, "handle from another arena");
        &self.items[handle.index()]
    }
}

/// Ordered list of owned children with a hard capacity
#[derive(Debug, Clone)]
pub struct Registry<T> {
    kind: RegistryKind,
    capacity: usize,
    entries: Vec<Handle<T>>,
}

impl<T> Registry<T> {
    pub fn new(kind: RegistryKind, capacity: usize) -> Self {
        Self {
            kind,
            capacity,
            entries: Vec::new(),
        }
    }

    /// Allocate `value` in `arena` and append its handle.
    ///
    /// Nothing is allocated when the registry is already full.
    pub fn append(&mut self, arena: &mut Arena<T>, value: T) -> Result<Handle<T>> {
        if self.entries.len() >= self.capacity {
            return Err(AsmError::CapacityExceeded {
                registry: self.kind,
                capacity: self.capacity,
            });
        }

        let handle = arena.alloc(value);
        self.entries.push(handle);
        Ok(handle)
    }

    pub fn kind(&self) -> RegistryKind {
        self.kind
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[Handle<T>] {
        &self.entries
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Handle<T>> + ExactSizeIterator + '_ {
        self.entries.iter().copied()
    }
}
