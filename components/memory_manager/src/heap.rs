//! Slot arena backing every garbage-collected value.
//!
//! The heap is a vector of slots. Each slot carries a generation counter and
//! a mark bit; freed slots go on a free list and are reused by later
//! allocations. A [`GcHandle`] names a slot *and* the generation it was
//! allocated in, so a handle that outlives its object resolves to nothing
//! instead of aliasing whatever reused the slot.

use crate::gc::Trace;

/// Reference to an object stored in a [`Heap`].
///
/// Handles are plain copyable indices; they keep nothing alive on their own.
/// An object survives a collection only if a handle to it is reachable from
/// the roots passed to [`Heap::collect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GcHandle {
    index: usize,
    generation: u32,
}

impl GcHandle {
    /// Slot index inside the heap
    pub fn index(&self) -> usize {
        self.index
    }

    /// Generation of the slot at allocation time
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
pub(crate) struct Slot<T> {
    pub(crate) generation: u32,
    pub(crate) marked: bool,
    pub(crate) value: Option<T>,
}

/// Statistics from one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GcStats {
    /// Objects reached from the roots
    pub marked: usize,
    /// Objects freed by the sweep
    pub freed: usize,
    /// Objects live after the sweep
    pub live: usize,
}

/// Arena of garbage-collected objects.
///
/// # Examples
///
/// ```
/// use memory_manager::{GcHandle, Heap, Trace};
///
/// struct Leaf(i32);
/// impl Trace for Leaf {
///     fn trace(&self, _visit: &mut dyn FnMut(GcHandle)) {}
/// }
///
/// let mut heap = Heap::new();
/// let kept = heap.allocate(Leaf(1));
/// let dropped = heap.allocate(Leaf(2));
///
/// let stats = heap.collect([kept]);
/// assert_eq!(stats.freed, 1);
/// assert!(heap.get(kept).is_some());
/// assert!(heap.get(dropped).is_none());
/// ```
#[derive(Debug)]
pub struct Heap<T> {
    pub(crate) slots: Vec<Slot<T>>,
    pub(crate) free: Vec<usize>,
    pub(crate) collections: u64,
}

impl<T: Trace> Heap<T> {
    /// Create an empty heap
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            collections: 0,
        }
    }

    /// Store a value and return its handle, reusing a freed slot if one exists
    pub fn allocate(&mut self, value: T) -> GcHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.value = Some(value);
            slot.marked = false;
            return GcHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len();
        self.slots.push(Slot {
            generation: 0,
            marked: false,
            value: Some(value),
        });
        GcHandle {
            index,
            generation: 0,
        }
    }

    /// Borrow the object behind a handle, `None` if it has been freed
    pub fn get(&self, handle: GcHandle) -> Option<&T> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    /// Mutably borrow the object behind a handle
    pub fn get_mut(&mut self, handle: GcHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Whether the handle still names a live object
    pub fn contains(&self, handle: GcHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live objects
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of slots, live or free
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of collections run so far
    pub fn collections(&self) -> u64 {
        self.collections
    }
}

impl<T: Trace> Default for Heap<T> {
    fn default() -> Self {
        Self::new()
    }
}
